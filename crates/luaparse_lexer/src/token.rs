//! Tokens produced by the lexer.

use luaparse_core::text::TextRange;
use luaparse_options::Features;

bitflags::bitflags! {
    /// Token classes. Values match luaparse's token type codes so callers
    /// can test membership in combinations such as [`TokenKind::LITERAL`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenKind: u32 {
        const EOF             = 1;
        const STRING_LITERAL  = 2;
        const KEYWORD         = 4;
        const IDENTIFIER      = 8;
        const NUMERIC_LITERAL = 16;
        const PUNCTUATOR      = 32;
        const BOOLEAN_LITERAL = 64;
        const NIL_LITERAL     = 128;
        const VARARG_LITERAL  = 256;

        const LITERAL = Self::STRING_LITERAL.bits()
            | Self::NUMERIC_LITERAL.bits()
            | Self::BOOLEAN_LITERAL.bits()
            | Self::NIL_LITERAL.bits()
            | Self::VARARG_LITERAL.bits();
    }
}

impl TokenKind {
    /// The word used for this class in "unexpected ..." messages.
    pub fn describe(self) -> &'static str {
        if self.contains(TokenKind::STRING_LITERAL) {
            "string"
        } else if self.contains(TokenKind::KEYWORD) {
            "keyword"
        } else if self.contains(TokenKind::IDENTIFIER) {
            "identifier"
        } else if self.contains(TokenKind::NUMERIC_LITERAL) {
            "number"
        } else if self.contains(TokenKind::BOOLEAN_LITERAL) {
            "boolean"
        } else {
            "symbol"
        }
    }
}

/// The decoded value of a token, keyed by its class.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    EndOfInput,
    String(String),
    Keyword(&'static str),
    Identifier(String),
    Number(f64),
    Punctuator(&'static str),
    Boolean(bool),
    Nil,
    Vararg,
}

impl TokenValue {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenValue::EndOfInput => TokenKind::EOF,
            TokenValue::String(_) => TokenKind::STRING_LITERAL,
            TokenValue::Keyword(_) => TokenKind::KEYWORD,
            TokenValue::Identifier(_) => TokenKind::IDENTIFIER,
            TokenValue::Number(_) => TokenKind::NUMERIC_LITERAL,
            TokenValue::Punctuator(_) => TokenKind::PUNCTUATOR,
            TokenValue::Boolean(_) => TokenKind::BOOLEAN_LITERAL,
            TokenValue::Nil => TokenKind::NIL_LITERAL,
            TokenValue::Vararg => TokenKind::VARARG_LITERAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    /// Line on which the token starts.
    pub line: u32,
    /// Byte offset of the start of `line`.
    pub line_start: usize,
    /// Line on which the token ends; differs from `line` for long strings.
    pub last_line: u32,
    pub last_line_start: usize,
    pub range: TextRange,
}

impl Token {
    pub fn new(
        value: TokenValue,
        line: u32,
        line_start: usize,
        last_line: u32,
        last_line_start: usize,
        range: TextRange,
    ) -> Self {
        Self {
            kind: value.kind(),
            value,
            line,
            line_start,
            last_line,
            last_line_start,
            range,
        }
    }

    /// An end-of-input token at `offset`.
    pub fn end_of_input(offset: usize, line: u32, line_start: usize) -> Self {
        let pos = offset as u32;
        Self::new(
            TokenValue::EndOfInput,
            line,
            line_start,
            line,
            line_start,
            TextRange::empty(pos),
        )
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }

    #[inline]
    pub fn is_punctuator(&self, text: &str) -> bool {
        matches!(self.value, TokenValue::Punctuator(p) if p == text)
    }

    #[inline]
    pub fn is_keyword(&self, text: &str) -> bool {
        matches!(self.value, TokenValue::Keyword(k) if k == text)
    }

    /// Keyword or punctuator spelled `text`.
    #[inline]
    pub fn is(&self, text: &str) -> bool {
        match self.value {
            TokenValue::Keyword(v) | TokenValue::Punctuator(v) => v == text,
            _ => false,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// The source text of the token.
    pub fn raw<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.range.to_range()).unwrap_or("")
    }

    /// The text used after "near" in messages.
    pub fn near<'s>(&self, source: &'s str) -> &'s str {
        if self.is_eof() {
            "<eof>"
        } else {
            self.raw(source)
        }
    }
}

/// The reserved word spelled `name` under `features`, if any. `true`,
/// `false` and `nil` are literals and not included.
pub fn keyword_for(name: &str, features: Features) -> Option<&'static str> {
    let keyword = match name {
        "and" => "and",
        "break" => "break",
        "do" => "do",
        "else" => "else",
        "elseif" => "elseif",
        "end" => "end",
        "for" => "for",
        "function" => "function",
        "if" => "if",
        "in" => "in",
        "local" => "local",
        "not" => "not",
        "or" => "or",
        "repeat" => "repeat",
        "return" => "return",
        "then" => "then",
        "until" => "until",
        "while" => "while",
        "goto" if features.goto_is_keyword() => "goto",
        "hstructure" if features.contains(Features::HSTRUCTURE) => "hstructure",
        "hmake" if features.contains(Features::HMAKE) => "hmake",
        _ => return None,
    };
    Some(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use luaparse_options::LuaVersion;

    #[test]
    fn test_literal_mask() {
        assert!(TokenKind::LITERAL.contains(TokenKind::VARARG_LITERAL));
        assert!(!TokenKind::LITERAL.intersects(TokenKind::IDENTIFIER | TokenKind::KEYWORD));
        assert_eq!(TokenKind::PUNCTUATOR.bits(), 32);
    }

    #[test]
    fn test_goto_keyword_depends_on_version() {
        assert_eq!(keyword_for("goto", LuaVersion::Lua51.features()), None);
        assert_eq!(keyword_for("goto", LuaVersion::Lua52.features()), Some("goto"));
        assert_eq!(keyword_for("goto", LuaVersion::LuaJit.features()), None);
        assert_eq!(keyword_for("hmake", LuaVersion::Lua53.features()), None);
        assert_eq!(keyword_for("hmake", LuaVersion::HavokScript51.features()), Some("hmake"));
    }
}
