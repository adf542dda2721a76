//! Incremental parsing over text that arrives in pieces.
//!
//! Only tokens that end before the end of the current buffer are kept,
//! since more text could still extend the last one. After each write the
//! kept tokens are replayed through a fresh parser: a failure caused by
//! running out of tokens means more input is needed, while any other
//! failure is final. Calling [`StreamingParser::end`] lexes the remainder
//! and runs the real parse, with observer events.
//!
//! Lexing is incremental but the check after each write is not: it parses
//! every kept token again, so feeding a chunk in `k` pieces costs `k` parses
//! of a growing prefix, quadratic in the number of writes. Callers with
//! many small pieces should buffer them and write larger slices.

use luaparse_ast::{Chunk, Comment};
use luaparse_diagnostics::ParseError;
use luaparse_lexer::{Lexer, LexerState, Token};
use luaparse_options::ParseOptions;

use crate::observer::{NoopObserver, ParseObserver};
use crate::parser::Parser;
use crate::source::BufferedTokens;

/// What a [`StreamingParser::write`] made of the input so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The input stops in the middle of a construct.
    NeedMoreInput,
    /// The input so far is a complete chunk.
    Complete,
}

pub struct StreamingParser {
    options: ParseOptions,
    source: String,
    /// Tokens that can no longer change.
    tokens: Vec<Token>,
    /// Comments tagged with the index of the token that follows them.
    comments: Vec<(usize, Comment)>,
    /// Lexer position just past the last kept token.
    checkpoint: LexerState,
    observer: Option<Box<dyn ParseObserver>>,
}

impl StreamingParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            source: String::new(),
            tokens: Vec::new(),
            comments: Vec::new(),
            checkpoint: LexerState::default(),
            observer: None,
        }
    }

    /// A streaming parser whose final parse reports to `observer`.
    pub fn with_observer(options: ParseOptions, observer: Box<dyn ParseObserver>) -> Self {
        Self {
            observer: Some(observer),
            ..Self::new(options)
        }
    }

    /// The text written so far.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Append `text`. Fails only when the input can no longer become valid.
    ///
    /// Each call re-parses all stable tokens seen so far.
    pub fn write(&mut self, text: &str) -> Result<Progress, ParseError> {
        self.source.push_str(text);
        self.lex_stable(false)?;
        self.check_progress()
    }

    /// Append `text`, declare the input complete and parse it.
    pub fn end(mut self, text: &str) -> Result<Chunk, ParseError> {
        self.source.push_str(text);
        let eof = match self.lex_stable(true)? {
            Some(eof) => eof,
            None => self.checkpoint_eof(),
        };
        let tokens = BufferedTokens::new(&self.tokens, &self.comments, eof);
        let mut noop = NoopObserver;
        let observer: &mut dyn ParseObserver = match self.observer.as_deref_mut() {
            Some(observer) => observer,
            None => &mut noop,
        };
        let chunk = Parser::new(&self.source, tokens, &self.options, observer).parse_chunk()?;
        log::debug!(
            "streamed {} bytes into {} statements",
            self.source.len(),
            chunk.body.len()
        );
        Ok(chunk)
    }

    /// Lex from the checkpoint, keeping every token that can no longer
    /// change. With `is_final` every token is kept and the end-of-input
    /// token is returned.
    fn lex_stable(&mut self, is_final: bool) -> Result<Option<Token>, ParseError> {
        let mut lexer = if self.checkpoint == LexerState::default() {
            Lexer::new(&self.source, &self.options)
        } else {
            Lexer::resume(&self.source, &self.options, self.checkpoint)
        };
        let mut pending = Vec::new();

        loop {
            match lexer.next_token() {
                Ok(token) if token.is_eof() => {
                    if !is_final {
                        return Ok(None);
                    }
                    lexer.drain_comments(&mut pending);
                    let mark = self.tokens.len();
                    self.comments.extend(pending.drain(..).map(|c| (mark, c)));
                    self.checkpoint = lexer.checkpoint();
                    return Ok(Some(token));
                }
                Ok(token) => {
                    if !is_final && token.range.end as usize >= self.source.len() {
                        return Ok(None);
                    }
                    lexer.drain_comments(&mut pending);
                    let mark = self.tokens.len();
                    self.comments.extend(pending.drain(..).map(|c| (mark, c)));
                    self.tokens.push(token);
                    self.checkpoint = lexer.checkpoint();
                }
                Err(err) if err.eof && !is_final => return Ok(None),
                Err(err) => return Err(err),
            }
        }
    }

    /// Parse the kept tokens to tell incomplete input from invalid input.
    fn check_progress(&self) -> Result<Progress, ParseError> {
        let tokens = BufferedTokens::new(&self.tokens, &self.comments, self.checkpoint_eof());
        let mut observer = NoopObserver;
        let mut parser = Parser::new(&self.source, tokens, &self.options, &mut observer);
        match parser.parse_chunk() {
            Ok(_) => Ok(Progress::Complete),
            Err(err) if err.eof || parser.at_end_of_input() => {
                log::trace!("parse stopped at end of input: {}", err);
                Ok(Progress::NeedMoreInput)
            }
            Err(err) => Err(err),
        }
    }

    fn checkpoint_eof(&self) -> Token {
        let state = self.checkpoint;
        Token::end_of_input(state.pos, state.line, state.line_start)
    }
}
