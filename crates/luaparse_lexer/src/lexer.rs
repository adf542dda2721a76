//! The Lua lexer.
//!
//! Converts source text into tokens on demand. Each call to
//! [`Lexer::next_token`] skips whitespace and comments, then reads exactly
//! one token. The lexer never looks back, so it can be stopped after any
//! token and restarted later from a [`LexerState`] over a longer buffer.

use std::ops::Range;

use crate::char_codes::*;
use crate::comments::{CommentCollector, CommentSpan};
use crate::token::{keyword_for, Token, TokenValue};
use luaparse_ast::Comment;
use luaparse_core::text::{column_of, TextRange};
use luaparse_diagnostics::{messages, DiagnosticMessage, ParseError};
use luaparse_options::{Features, ParseOptions};
use memchr::{memchr2, memchr3};

type LexResult<T> = Result<T, ParseError>;

/// Where to continue lexing. Taken after a token with [`Lexer::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    pub pos: usize,
    pub line: u32,
    pub line_start: usize,
}

impl Default for LexerState {
    fn default() -> Self {
        Self {
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }
}

pub struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    /// Current byte offset.
    pos: usize,
    /// Current 1-based line.
    line: u32,
    /// Byte offset at which the current line begins.
    line_start: usize,
    token_start: usize,
    token_line: u32,
    token_line_start: usize,
    features: Features,
    extended_identifiers: bool,
    comments: CommentCollector,
}

impl<'s> Lexer<'s> {
    /// Create a lexer at the start of `source`, skipping a `#!` line.
    pub fn new(source: &'s str, options: &ParseOptions) -> Self {
        let mut lexer = Self::resume(source, options, LexerState::default());
        lexer.skip_shebang();
        lexer
    }

    /// Create a lexer that continues from a saved state.
    pub fn resume(source: &'s str, options: &ParseOptions, state: LexerState) -> Self {
        log::trace!(
            "lexer starting at offset {} (line {}) of {} bytes",
            state.pos,
            state.line,
            source.len()
        );
        Self {
            source,
            bytes: source.as_bytes(),
            pos: state.pos,
            line: state.line,
            line_start: state.line_start,
            token_start: state.pos,
            token_line: state.line,
            token_line_start: state.line_start,
            features: options.features(),
            extended_identifiers: options.extended_identifier_chars,
            comments: CommentCollector::new(options),
        }
    }

    /// The position just past the last token read.
    pub fn checkpoint(&self) -> LexerState {
        LexerState {
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
        }
    }

    /// Move comments read so far into `into`.
    pub fn drain_comments(&mut self, into: &mut Vec<Comment>) {
        self.comments.drain_into(into);
    }

    /// Skip a `#!` line at the very beginning of the source.
    pub fn skip_shebang(&mut self) {
        if self.pos == 0 && self.bytes.starts_with(b"#!") {
            self.pos = memchr2(LINE_FEED, CARRIAGE_RETURN, self.bytes).unwrap_or(self.bytes.len());
        }
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Read the next token. At the end of input this keeps returning an
    /// end-of-input token.
    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_trivia()?;

        self.token_start = self.pos;
        self.token_line = self.line;
        self.token_line_start = self.line_start;

        let Some(ch) = self.current_byte() else {
            return Ok(Token::end_of_input(self.pos, self.line, self.line_start));
        };

        let value = match ch {
            b'\'' | b'"' => self.scan_string(ch)?,
            b'0'..=b'9' => self.scan_number()?,
            b'.' => match self.byte_at(1) {
                Some(next) if is_dec_digit(next) => self.scan_number()?,
                Some(b'.') if self.byte_at(2) == Some(b'.') => {
                    self.pos += 3;
                    TokenValue::Vararg
                }
                Some(b'.') => self.punctuator(".."),
                _ => self.punctuator("."),
            },
            b'=' => self.one_or_two('=', "==", "="),
            b'>' => {
                if self.byte_at(1) == Some(b'=') {
                    self.punctuator(">=")
                } else if self.byte_at(1) == Some(b'>') && self.bitwise() {
                    self.punctuator(">>")
                } else {
                    self.punctuator(">")
                }
            }
            b'<' => {
                if self.byte_at(1) == Some(b'=') {
                    self.punctuator("<=")
                } else if self.byte_at(1) == Some(b'<') && self.bitwise() {
                    self.punctuator("<<")
                } else {
                    self.punctuator("<")
                }
            }
            b'~' => {
                if self.byte_at(1) == Some(b'=') {
                    self.punctuator("~=")
                } else if self.bitwise() {
                    self.punctuator("~")
                } else {
                    return Err(self.unexpected_character());
                }
            }
            b':' => {
                if self.features.labels() && self.byte_at(1) == Some(b':') {
                    self.punctuator("::")
                } else {
                    self.punctuator(":")
                }
            }
            b'[' => match self.byte_at(1) {
                Some(b'[' | b'=') => self.scan_long_string()?,
                _ => self.punctuator("["),
            },
            b'/' => {
                if self.features.contains(Features::INTEGER_DIVISION) && self.byte_at(1) == Some(b'/') {
                    self.punctuator("//")
                } else {
                    self.punctuator("/")
                }
            }
            b'&' if self.bitwise() => self.punctuator("&"),
            b'|' if self.bitwise() => self.punctuator("|"),
            b'*' => self.punctuator("*"),
            b'^' => self.punctuator("^"),
            b'%' => self.punctuator("%"),
            b',' => self.punctuator(","),
            b'{' => self.punctuator("{"),
            b'}' => self.punctuator("}"),
            b']' => self.punctuator("]"),
            b'(' => self.punctuator("("),
            b')' => self.punctuator(")"),
            b';' => self.punctuator(";"),
            b'#' => self.punctuator("#"),
            b'-' => self.punctuator("-"),
            b'+' => self.punctuator("+"),
            _ if is_identifier_start(ch) => self.scan_identifier(),
            _ if ch >= 0x80
                && self.extended_identifiers
                && self.current_char().is_some_and(is_extended_identifier_start) =>
            {
                self.scan_identifier()
            }
            _ => return Err(self.unexpected_character()),
        };

        Ok(Token::new(
            value,
            self.token_line,
            self.token_line_start,
            self.line,
            self.line_start,
            TextRange::new(self.token_start as u32, self.pos as u32),
        ))
    }

    #[inline]
    fn bitwise(&self) -> bool {
        self.features.contains(Features::BITWISE_OPERATORS)
    }

    #[inline]
    fn punctuator(&mut self, text: &'static str) -> TokenValue {
        self.pos += text.len();
        TokenValue::Punctuator(text)
    }

    fn one_or_two(&mut self, second: char, two: &'static str, one: &'static str) -> TokenValue {
        if self.byte_at(1) == Some(second as u8) {
            self.punctuator(two)
        } else {
            self.punctuator(one)
        }
    }

    fn scan_identifier(&mut self) -> TokenValue {
        let start = self.pos;
        while let Some(ch) = self.current_byte() {
            if is_identifier_part(ch) {
                self.pos += 1;
            } else if ch >= 0x80 && self.extended_identifiers {
                match self.current_char() {
                    Some(c) if is_extended_identifier_part(c) => self.pos += c.len_utf8(),
                    _ => break,
                }
            } else {
                break;
            }
        }

        let name = self.slice(start, self.pos);
        match name {
            "true" => TokenValue::Boolean(true),
            "false" => TokenValue::Boolean(false),
            "nil" => TokenValue::Nil,
            _ => match keyword_for(name, self.features) {
                Some(keyword) => TokenValue::Keyword(keyword),
                None => TokenValue::Identifier(name.to_string()),
            },
        }
    }

    // ========================================================================
    // Strings
    // ========================================================================

    fn scan_string(&mut self, delimiter: u8) -> LexResult<TokenValue> {
        let start = self.pos;
        self.pos += 1;
        let mut buf = Vec::new();
        let mut chunk_start = self.pos;

        loop {
            let Some(ch) = self.current_byte() else {
                return Err(self.error_here(&messages::UNFINISHED_STRING, &[self.slice(start, self.pos)]));
            };
            if ch == delimiter {
                buf.extend_from_slice(&self.bytes[chunk_start..self.pos]);
                self.pos += 1;
                break;
            }
            if is_line_terminator(ch) {
                return Err(self.error_here(&messages::UNFINISHED_STRING, &[self.slice(start, self.pos)]));
            }
            if ch == b'\\' {
                buf.extend_from_slice(&self.bytes[chunk_start..self.pos]);
                self.pos += 1;
                self.read_escape(&mut buf, start)?;
                chunk_start = self.pos;
            } else {
                self.pos += 1;
            }
        }

        Ok(TokenValue::String(decode_string_bytes(buf)))
    }

    /// Read the escape after a backslash, appending the bytes it denotes.
    fn read_escape(&mut self, buf: &mut Vec<u8>, string_start: usize) -> LexResult<()> {
        let escape_start = self.pos - 1;
        let Some(ch) = self.current_byte() else {
            return Err(self.error_here(
                &messages::UNFINISHED_STRING,
                &[self.slice(string_start, self.pos)],
            ));
        };

        let simple = match ch {
            b'a' => Some(0x07),
            b'b' => Some(0x08),
            b'f' => Some(FORM_FEED),
            b'n' => Some(LINE_FEED),
            b'r' => Some(CARRIAGE_RETURN),
            b't' => Some(TAB),
            b'v' => Some(VERTICAL_TAB),
            b'\\' | b'"' | b'\'' => Some(ch),
            _ => None,
        };
        if let Some(byte) = simple {
            self.pos += 1;
            buf.push(byte);
            return Ok(());
        }

        match ch {
            LINE_FEED | CARRIAGE_RETURN => {
                self.consume_eol();
                buf.push(LINE_FEED);
            }
            b'0'..=b'9' => {
                let digits_start = self.pos;
                let mut value: u32 = 0;
                while self.pos - digits_start < 3 {
                    match self.current_byte() {
                        Some(d) if is_dec_digit(d) => {
                            value = value * 10 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                if value > 255 {
                    return Err(self.error_here(
                        &messages::DECIMAL_ESCAPE_TOO_LARGE,
                        &[self.slice(escape_start, self.pos)],
                    ));
                }
                buf.push(value as u8);
            }
            b'z' if self.features.contains(Features::SKIP_WHITESPACE_ESCAPE) => {
                self.pos += 1;
                while let Some(c) = self.current_byte() {
                    if is_white_space(c) {
                        self.pos += 1;
                    } else if !self.consume_eol() {
                        break;
                    }
                }
            }
            b'x' if self.features.contains(Features::HEX_ESCAPES) => {
                self.pos += 1;
                let high = self.current_byte().and_then(hex_value);
                let low = self.byte_at(1).and_then(hex_value);
                match (high, low) {
                    (Some(high), Some(low)) => {
                        self.pos += 2;
                        buf.push((high * 16 + low) as u8);
                    }
                    _ => {
                        let truncated = self.pos + 2 > self.bytes.len();
                        return Err(self
                            .error_here(
                                &messages::HEXADECIMAL_DIGIT_EXPECTED,
                                &[self.slice(escape_start, self.pos + 2)],
                            )
                            .at_end_of_input(truncated));
                    }
                }
            }
            b'u' if self.features.contains(Features::UNICODE_ESCAPES) => {
                self.read_unicode_escape(buf, escape_start)?;
            }
            _ => {
                if self.features.contains(Features::STRICT_ESCAPES) {
                    return Err(self.error_here(
                        &messages::INVALID_ESCAPE,
                        &[self.slice(escape_start, self.pos + 1)],
                    ));
                }
                // Unknown escapes stand for the escaped character itself.
                let len = self.current_char().map_or(1, char::len_utf8);
                buf.extend_from_slice(&self.bytes[self.pos..self.pos + len]);
                self.pos += len;
            }
        }
        Ok(())
    }

    fn read_unicode_escape(&mut self, buf: &mut Vec<u8>, escape_start: usize) -> LexResult<()> {
        self.pos += 1;
        if self.current_byte() != Some(b'{') {
            return Err(self.error_here(
                &messages::BRACE_EXPECTED,
                &["{", self.slice(escape_start, self.pos + 1)],
            ));
        }
        self.pos += 1;
        if self.current_byte().and_then(hex_value).is_none() {
            return Err(self.error_here(
                &messages::HEXADECIMAL_DIGIT_EXPECTED,
                &[self.slice(escape_start, self.pos + 1)],
            ));
        }

        let mut code: u32 = 0;
        while let Some(digit) = self.current_byte().and_then(hex_value) {
            code = code * 16 + digit;
            self.pos += 1;
            if code > 0x10FFFF {
                return Err(self.error_here(
                    &messages::UTF8_VALUE_TOO_LARGE,
                    &[self.slice(escape_start, self.pos)],
                ));
            }
        }

        if self.current_byte() != Some(b'}') {
            return Err(self.error_here(
                &messages::BRACE_EXPECTED,
                &["}", self.slice(escape_start, self.pos + 1)],
            ));
        }
        self.pos += 1;
        push_utf8(buf, code);
        Ok(())
    }

    fn scan_long_string(&mut self) -> LexResult<TokenValue> {
        let start = self.pos;
        match self.read_long_bracket(false)? {
            Some(content) => Ok(TokenValue::String(self.slice(content.start, content.end).to_string())),
            None => {
                self.pos += 1;
                while self.current_byte() == Some(b'=') {
                    self.pos += 1;
                }
                Err(self.error_here(
                    &messages::INVALID_LONG_STRING_DELIMITER,
                    &[self.slice(start, self.pos)],
                ))
            }
        }
    }

    /// Read `[==[ ... ]==]` at the current `[`. Returns the content range,
    /// or `None` without consuming anything when the opener is incomplete.
    fn read_long_bracket(&mut self, is_comment: bool) -> LexResult<Option<Range<usize>>> {
        let first_line = self.line;
        let mut level = 0;
        while self.byte_at(1 + level) == Some(b'=') {
            level += 1;
        }
        if self.byte_at(1 + level) != Some(b'[') {
            return Ok(None);
        }
        self.pos += level + 2;
        // A newline directly after the opener is not part of the content.
        self.consume_eol();
        let content_start = self.pos;

        loop {
            let Some(offset) = memchr3(b']', LINE_FEED, CARRIAGE_RETURN, &self.bytes[self.pos..]) else {
                self.pos = self.bytes.len();
                let message = if is_comment {
                    &messages::UNFINISHED_LONG_COMMENT
                } else {
                    &messages::UNFINISHED_LONG_STRING
                };
                let line = first_line.to_string();
                return Err(self.error_here(message, &[line.as_str(), "<eof>"]));
            };
            self.pos += offset;
            if self.bytes[self.pos] == b']' {
                if self.closes_long_bracket(level) {
                    let content = content_start..self.pos;
                    self.pos += level + 2;
                    return Ok(Some(content));
                }
                self.pos += 1;
            } else {
                self.consume_eol();
            }
        }
    }

    fn closes_long_bracket(&self, level: usize) -> bool {
        (1..=level).all(|i| self.byte_at(i) == Some(b'=')) && self.byte_at(level + 1) == Some(b']')
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    fn scan_number(&mut self) -> LexResult<TokenValue> {
        let start = self.pos;
        let is_hex = self.current_byte() == Some(b'0') && matches!(self.byte_at(1), Some(b'x' | b'X'));
        let (value, has_fraction) = if is_hex {
            self.read_hex_literal(start)?
        } else {
            self.read_dec_literal(start)?
        };

        let imaginary = self.read_imaginary_suffix();
        let int64 = self.read_int64_suffix(start)?;
        if int64 && (imaginary || has_fraction) {
            return Err(self.malformed_number(start));
        }
        // A numeral runs through every following dot, so `3..2` is one bad token.
        if self.at_identifier_part() || self.current_byte() == Some(b'.') {
            return Err(self.malformed_number(start));
        }
        Ok(TokenValue::Number(value))
    }

    fn read_dec_literal(&mut self, start: usize) -> LexResult<(f64, bool)> {
        self.skip_dec_digits();
        let mut has_fraction = false;
        if self.current_byte() == Some(b'.') {
            has_fraction = true;
            self.pos += 1;
            self.skip_dec_digits();
        }
        if matches!(self.current_byte(), Some(b'e' | b'E')) {
            has_fraction = true;
            self.pos += 1;
            if matches!(self.current_byte(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !self.current_byte().is_some_and(is_dec_digit) {
                return Err(self.malformed_number(start));
            }
            self.skip_dec_digits();
        }

        match self.slice(start, self.pos).parse::<f64>() {
            Ok(value) => Ok((value, has_fraction)),
            Err(_) => Err(self.malformed_number(start)),
        }
    }

    fn read_hex_literal(&mut self, start: usize) -> LexResult<(f64, bool)> {
        self.pos += 2;
        let mut value = 0f64;
        let mut digits = 0usize;
        while let Some(digit) = self.current_byte().and_then(hex_value) {
            value = value * 16.0 + f64::from(digit);
            digits += 1;
            self.pos += 1;
        }

        let mut has_fraction = false;
        if self.features.contains(Features::HEX_FLOATS) {
            if self.current_byte() == Some(b'.') {
                has_fraction = true;
                self.pos += 1;
                let mut scale = 1.0 / 16.0;
                while let Some(digit) = self.current_byte().and_then(hex_value) {
                    value += f64::from(digit) * scale;
                    scale /= 16.0;
                    digits += 1;
                    self.pos += 1;
                }
            }
            if digits == 0 {
                return Err(self.malformed_number(start));
            }
            if matches!(self.current_byte(), Some(b'p' | b'P')) {
                has_fraction = true;
                self.pos += 1;
                let negative = match self.current_byte() {
                    Some(b'-') => {
                        self.pos += 1;
                        true
                    }
                    Some(b'+') => {
                        self.pos += 1;
                        false
                    }
                    _ => false,
                };
                if !self.current_byte().is_some_and(is_dec_digit) {
                    return Err(self.malformed_number(start));
                }
                let mut exponent: i32 = 0;
                while let Some(d) = self.current_byte().filter(|c| is_dec_digit(*c)) {
                    exponent = exponent.saturating_mul(10).saturating_add(i32::from(d - b'0'));
                    self.pos += 1;
                }
                value *= 2f64.powi(if negative { -exponent } else { exponent });
            }
        } else if digits == 0 {
            return Err(self.malformed_number(start));
        }

        Ok((value, has_fraction))
    }

    fn read_imaginary_suffix(&mut self) -> bool {
        if self.features.contains(Features::IMAGINARY_NUMBERS) && matches!(self.current_byte(), Some(b'i' | b'I')) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// `LL` or `ULL`, any case.
    fn read_int64_suffix(&mut self, start: usize) -> LexResult<bool> {
        if !self.features.contains(Features::INTEGER_SUFFIXES) {
            return Ok(false);
        }
        let is_l = |b: Option<u8>| matches!(b, Some(b'l' | b'L'));
        match self.current_byte() {
            Some(b'u' | b'U') => {
                if is_l(self.byte_at(1)) && is_l(self.byte_at(2)) {
                    self.pos += 3;
                    Ok(true)
                } else {
                    Err(self.malformed_number(start))
                }
            }
            Some(b'l' | b'L') => {
                if is_l(self.byte_at(1)) {
                    self.pos += 2;
                    Ok(true)
                } else {
                    Err(self.malformed_number(start))
                }
            }
            _ => Ok(false),
        }
    }

    fn skip_dec_digits(&mut self) {
        while self.current_byte().is_some_and(is_dec_digit) {
            self.pos += 1;
        }
    }

    fn at_identifier_part(&self) -> bool {
        match self.current_byte() {
            Some(ch) if is_identifier_part(ch) => true,
            Some(ch) if ch >= 0x80 && self.extended_identifiers => {
                self.current_char().is_some_and(is_extended_identifier_part)
            }
            _ => false,
        }
    }

    /// Swallow the rest of a bad numeral and report it whole. Only running
    /// out of input before the tail counts as an end-of-input failure.
    fn malformed_number(&mut self, start: usize) -> ParseError {
        let eof = self.pos >= self.bytes.len();
        while self.at_identifier_part() || self.current_byte() == Some(b'.') {
            self.pos += self.current_char().map_or(1, char::len_utf8);
        }
        self.error_at(start, &messages::MALFORMED_NUMBER, &[self.slice(start, self.pos)])
            .at_end_of_input(eof)
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn skip_trivia(&mut self) -> LexResult<()> {
        while let Some(ch) = self.current_byte() {
            if is_white_space(ch) {
                self.pos += 1;
            } else if is_line_terminator(ch) {
                self.consume_eol();
            } else if ch == b'-' && self.byte_at(1) == Some(b'-') {
                self.scan_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn scan_comment(&mut self) -> LexResult<()> {
        let start = self.pos;
        let start_line = self.line;
        let start_line_start = self.line_start;
        self.pos += 2;

        let value = match self.current_byte() {
            Some(b'[') => match self.read_long_bracket(true)? {
                Some(content) => content,
                None => self.skip_to_line_end(),
            },
            _ => self.skip_to_line_end(),
        };

        let span = CommentSpan {
            start,
            end: self.pos,
            start_line,
            start_line_start,
            end_line: self.line,
            end_line_start: self.line_start,
        };
        self.comments.record(self.source, span, value);
        Ok(())
    }

    fn skip_to_line_end(&mut self) -> Range<usize> {
        let start = self.pos;
        self.pos = match memchr2(LINE_FEED, CARRIAGE_RETURN, &self.bytes[start..]) {
            Some(offset) => start + offset,
            None => self.bytes.len(),
        };
        start..self.pos
    }

    /// Consume one line break, treating `\r\n` and `\n\r` as a single break.
    fn consume_eol(&mut self) -> bool {
        let Some(ch) = self.current_byte() else {
            return false;
        };
        if !is_line_terminator(ch) {
            return false;
        }
        if let Some(next) = self.byte_at(1) {
            if is_line_terminator(next) && next != ch {
                self.pos += 1;
            }
        }
        self.pos += 1;
        self.line += 1;
        self.line_start = self.pos;
        true
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    #[inline]
    fn current_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn byte_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn current_char(&self) -> Option<char> {
        self.source.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    /// `source[start..end]`, clamped to the buffer and widened to whole characters.
    fn slice(&self, start: usize, end: usize) -> &'s str {
        let source = self.source;
        let mut end = end.min(source.len());
        while !source.is_char_boundary(end) {
            end += 1;
        }
        let mut start = start.min(end);
        while !source.is_char_boundary(start) {
            start -= 1;
        }
        &source[start..end]
    }

    fn unexpected_character(&self) -> ParseError {
        let near = self.slice(self.pos, self.pos + 1);
        self.error_here(&messages::UNEXPECTED_CHARACTER, &[near])
    }

    fn error_here(&self, message: &DiagnosticMessage, args: &[&str]) -> ParseError {
        self.error_at(self.pos, message, args)
    }

    fn error_at(&self, offset: usize, message: &DiagnosticMessage, args: &[&str]) -> ParseError {
        let column = column_of(self.source, self.line_start, offset);
        ParseError::new(message, args, offset as u32, self.line, column)
            .at_end_of_input(self.pos >= self.bytes.len())
    }
}

/// Read every token of `source`, ending with the end-of-input token.
pub fn tokenize(source: &str, options: &ParseOptions) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(source, options);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }
    log::debug!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use luaparse_options::LuaVersion;

    fn values(source: &str, version: LuaVersion) -> Vec<TokenValue> {
        let options = ParseOptions::new().with_version(version);
        tokenize(source, &options)
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    fn lex_error(source: &str, version: LuaVersion) -> ParseError {
        let options = ParseOptions::new().with_version(version);
        tokenize(source, &options).unwrap_err()
    }

    #[test]
    fn test_simple_statement() {
        let v = values("local x = 1", LuaVersion::Lua51);
        assert_eq!(
            v,
            vec![
                TokenValue::Keyword("local"),
                TokenValue::Identifier("x".into()),
                TokenValue::Punctuator("="),
                TokenValue::Number(1.0),
                TokenValue::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_greedy_punctuators() {
        let v = values("a...b..c.d", LuaVersion::Lua51);
        assert_eq!(v[1], TokenValue::Vararg);
        assert_eq!(v[3], TokenValue::Punctuator(".."));
        assert_eq!(v[5], TokenValue::Punctuator("."));
    }

    #[test]
    fn test_dialect_gated_punctuators() {
        let v = values("a // b", LuaVersion::Lua53);
        assert_eq!(v[1], TokenValue::Punctuator("//"));
        let v = values("a // b", LuaVersion::Lua51);
        assert_eq!(v[1], TokenValue::Punctuator("/"));
        assert_eq!(v[2], TokenValue::Punctuator("/"));

        let v = values("::", LuaVersion::Lua52);
        assert_eq!(v[0], TokenValue::Punctuator("::"));
        let v = values("::", LuaVersion::Lua51);
        assert_eq!(v[0], TokenValue::Punctuator(":"));

        let err = lex_error("a & b", LuaVersion::Lua51);
        assert_eq!(err.message, "unexpected symbol near '&'");
        assert_eq!(values("a ~= b", LuaVersion::Lua51)[1], TokenValue::Punctuator("~="));
    }

    #[test]
    fn test_string_escapes() {
        let v = values(r#""a\tb\65\x41\u{48}""#, LuaVersion::Lua53);
        assert_eq!(v[0], TokenValue::String("a\tbAAH".into()));
        let v = values("'a\\z  \n  b'", LuaVersion::Lua52);
        assert_eq!(v[0], TokenValue::String("ab".into()));
    }

    #[test]
    fn test_unknown_escape_keeps_character_in_lua51() {
        let v = values(r#""\q""#, LuaVersion::Lua51);
        assert_eq!(v[0], TokenValue::String("q".into()));
        let err = lex_error(r#""\q""#, LuaVersion::Lua52);
        assert_eq!(err.message, "invalid escape sequence near '\\q'");
    }

    #[test]
    fn test_decimal_escape_too_large() {
        let err = lex_error(r#""\256""#, LuaVersion::Lua51);
        assert_eq!(err.message, "decimal escape too large near '\\256'");
    }

    #[test]
    fn test_unfinished_string() {
        let err = lex_error("x = \"abc\nfoo\"", LuaVersion::Lua51);
        assert_eq!(err.message, "unfinished string near '\"abc'");
        assert!(!err.eof);
        let err = lex_error("x = 'abc", LuaVersion::Lua51);
        assert!(err.eof);
    }

    #[test]
    fn test_long_string_skips_first_newline() {
        let v = values("[==[\nhello]]\n]==]", LuaVersion::Lua51);
        assert_eq!(v[0], TokenValue::String("hello]]\n".into()));
    }

    #[test]
    fn test_unfinished_long_string() {
        let err = lex_error("x = [[\nabc", LuaVersion::Lua51);
        assert_eq!(err.message, "unfinished long string (starting at line 1) near '<eof>'");
        assert!(err.eof);
    }

    #[test]
    fn test_invalid_long_delimiter() {
        let err = lex_error("x = [= abc", LuaVersion::Lua51);
        assert_eq!(err.message, "invalid long string delimiter near '[='");
    }

    #[test]
    fn test_numbers() {
        let v = values("3 3.0 3.1416 314.16e-2 0.31416E1 0xff 0x56 .5", LuaVersion::Lua51);
        let nums: Vec<f64> = v
            .iter()
            .filter_map(|t| match t {
                TokenValue::Number(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(nums, vec![3.0, 3.0, 3.1416, 3.1416, 3.1416, 255.0, 86.0, 0.5]);
    }

    #[test]
    fn test_hex_floats_are_gated() {
        assert_eq!(values("0x1p4", LuaVersion::Lua52)[0], TokenValue::Number(16.0));
        assert_eq!(values("0xA.8", LuaVersion::Lua53)[0], TokenValue::Number(10.5));
        let err = lex_error("0x1p4", LuaVersion::Lua51);
        assert_eq!(err.message, "malformed number near '0x1p4'");
    }

    #[test]
    fn test_luajit_suffixes() {
        assert_eq!(values("12ULL", LuaVersion::LuaJit)[0], TokenValue::Number(12.0));
        assert_eq!(values("3i", LuaVersion::LuaJit)[0], TokenValue::Number(3.0));
        assert!(tokenize("12LL", &ParseOptions::new()).is_err());
        assert!(tokenize("1.5LL", &ParseOptions::new().with_version(LuaVersion::LuaJit)).is_err());
    }

    #[test]
    fn test_malformed_number() {
        let err = lex_error("x = 3xyz + 1", LuaVersion::Lua51);
        assert_eq!(err.message, "malformed number near '3xyz'");
        assert_eq!(err.column, 5);
        assert!(!err.eof);
        assert!(lex_error("x = 1e", LuaVersion::Lua51).eof);

        let err = lex_error("x = 3..2", LuaVersion::Lua51);
        assert_eq!(err.message, "malformed number near '3..2'");
        assert_eq!(err.column, 5);
        let err = lex_error("x = 1.5.3", LuaVersion::Lua53);
        assert_eq!(err.message, "malformed number near '1.5.3'");
        assert_eq!(values("x = 3 ..2", LuaVersion::Lua51).len(), 6);
    }

    #[test]
    fn test_keywords_and_literals() {
        let v = values("true false nil goto", LuaVersion::Lua51);
        assert_eq!(v[0], TokenValue::Boolean(true));
        assert_eq!(v[1], TokenValue::Boolean(false));
        assert_eq!(v[2], TokenValue::Nil);
        assert_eq!(v[3], TokenValue::Identifier("goto".into()));
        assert_eq!(values("goto", LuaVersion::Lua52)[0], TokenValue::Keyword("goto"));
    }

    #[test]
    fn test_extended_identifiers() {
        let options = ParseOptions::new().with_extended_identifiers(true);
        let tokens = tokenize("café = 1", &options).unwrap();
        assert_eq!(tokens[0].value, TokenValue::Identifier("café".into()));
        assert!(tokenize("café = 1", &ParseOptions::new()).is_err());
    }

    #[test]
    fn test_lines_and_crlf() {
        let tokens = tokenize("a\r\nb\n\rc\n\nd", &ParseOptions::new()).unwrap();
        let lines: Vec<u32> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 5, 5]);
        assert_eq!(tokens[1].line_start, 3);
    }

    #[test]
    fn test_shebang_is_skipped() {
        let tokens = tokenize("#!/usr/bin/lua\nprint", &ParseOptions::new()).unwrap();
        assert_eq!(tokens[0].value, TokenValue::Identifier("print".into()));
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn test_comments_go_to_side_channel() {
        let mut lexer = Lexer::new("-- one\nx --[[ two ]] y", &ParseOptions::new());
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.is_eof() {
                break;
            }
            tokens.push(token.value);
        }
        assert_eq!(tokens.len(), 2);
        let mut comments = Vec::new();
        lexer.drain_comments(&mut comments);
        let values: Vec<&str> = comments.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec![" one", " two "]);
        assert_eq!(comments[1].raw, "--[[ two ]]");
    }

    #[test]
    fn test_resume_from_checkpoint() {
        let options = ParseOptions::new();
        let mut lexer = Lexer::new("local x", &options);
        lexer.next_token().unwrap();
        let state = lexer.checkpoint();

        let mut resumed = Lexer::resume("local x = 1", &options, state);
        assert_eq!(resumed.next_token().unwrap().value, TokenValue::Identifier("x".into()));
        assert_eq!(resumed.next_token().unwrap().value, TokenValue::Punctuator("="));
    }
}
