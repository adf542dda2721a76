//! luaparse_parser: Recursive descent parser for Lua-family source.
//!
//! Builds a [`Chunk`] from source text in one pass. Scope tracking,
//! location annotation and control-flow checks run while parsing, and
//! each completed node is reported to a [`ParseObserver`].

mod flow;
mod locations;
mod observer;
mod parser;
mod precedence;
mod source;
mod stream;

pub use observer::{Hooks, NoopObserver, ParseObserver};
pub use parser::Parser;
pub use precedence::{get_binary_operator_precedence, OperatorPrecedence};
pub use source::{BufferedTokens, TokenSource};
pub use stream::{Progress, StreamingParser};

use luaparse_ast::Chunk;
use luaparse_diagnostics::ParseError;
use luaparse_lexer::Lexer;
use luaparse_options::ParseOptions;

/// Parse a complete chunk.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Chunk, ParseError> {
    parse_with_observer(source, options, &mut NoopObserver)
}

/// Parse a complete chunk, reporting events to `observer`.
pub fn parse_with_observer(
    source: &str,
    options: &ParseOptions,
    observer: &mut dyn ParseObserver,
) -> Result<Chunk, ParseError> {
    log::debug!(
        "parsing {} bytes as {}",
        source.len(),
        options.grammar_version
    );
    let lexer = Lexer::new(source, options);
    let chunk = Parser::new(source, lexer, options, observer).parse_chunk()?;
    log::debug!("parsed {} top-level statements", chunk.body.len());
    Ok(chunk)
}
