//! luaparse: Parser front end for Lua 5.1, 5.2, 5.3, LuaJIT and HavokScript.
//!
//! Re-exports the pieces a consumer needs: the options, the AST, the error
//! type and the parse entry points. [`start`] picks one-shot or streaming
//! parsing from [`ParseOptions::incremental_input`].

pub use luaparse_ast as ast;
pub use luaparse_ast::{AstVisitor, Chunk, NodeKind, NodeRef};
pub use luaparse_core::{Position, SourceLocation, TextRange};
pub use luaparse_diagnostics::{ErrorKind, ParseError};
pub use luaparse_lexer::{tokenize, Token, TokenKind, TokenValue};
pub use luaparse_options::{Features, LuaVersion, OptionsError, ParseOptions};
pub use luaparse_parser::{
    parse, parse_with_observer, Hooks, NoopObserver, ParseObserver, Progress, StreamingParser,
};

/// The outcome of [`start`].
pub enum Started {
    /// The whole source was parsed.
    Done(Chunk),
    /// Incremental input is enabled; the source so far was accepted and the
    /// parser waits for more.
    Waiting(StreamingParser),
}

/// Begin parsing `source`. With `incremental_input` set the text is written
/// to a [`StreamingParser`], which is returned for further writes;
/// otherwise the source is parsed as a complete chunk.
pub fn start(source: &str, options: &ParseOptions) -> Result<Started, ParseError> {
    if !options.incremental_input {
        return parse(source, options).map(Started::Done);
    }
    let mut parser = StreamingParser::new(options.clone());
    let progress = parser.write(source)?;
    log::debug!("streaming parse started: {:?}", progress);
    Ok(Started::Waiting(parser))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_parses_whole_source_by_default() {
        match start("local x = 1", &ParseOptions::new()).unwrap() {
            Started::Done(chunk) => assert_eq!(chunk.body.len(), 1),
            Started::Waiting(_) => panic!("expected a finished parse"),
        }
    }

    #[test]
    fn test_start_waits_with_incremental_input() {
        let options = ParseOptions::new().with_incremental_input(true);
        let Started::Waiting(parser) = start("local x = ", &options).unwrap() else {
            panic!("expected a streaming parser");
        };
        let chunk = parser.end("1").unwrap();
        assert_eq!(chunk.body.len(), 1);
    }

    #[test]
    fn test_start_reports_definite_errors() {
        let options = ParseOptions::new().with_incremental_input(true);
        assert!(start("local 1 ", &options).is_err());
        assert!(start("local", &ParseOptions::new()).is_err());
    }
}
