//! luaparse_core: Core source-position types shared by every stage of the parser.
//!
//! Provides byte ranges, line/column positions and the helpers that convert
//! between them.

pub mod text;

// Re-export commonly used types
pub use text::{Position, SourceLocation, TextPos, TextRange};
