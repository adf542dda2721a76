//! luaparse_lexer: Lexer for Lua-family source text.
//!
//! Produces tokens lazily, one call at a time, with:
//! - greedy punctuator classification gated by dialect
//! - quoted and long-bracket strings with dialect-specific escapes
//! - decimal and hexadecimal numbers, LuaJIT suffixes
//! - comments routed to a side channel instead of the token stream

mod char_codes;
mod comments;
mod lexer;
mod token;

pub use comments::CommentCollector;
pub use lexer::{tokenize, Lexer, LexerState};
pub use token::{keyword_for, Token, TokenKind, TokenValue};
