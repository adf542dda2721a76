//! luaparse_scope: Lexical scope tracking during parsing.
//!
//! The parser drives a [`ScopeTracker`] as it enters and leaves blocks and
//! as it meets declarations and uses of names. Uses are resolved on the
//! spot, so identifier nodes come out of the parser already marked local or
//! global; no second walk over the tree is needed.

mod scope;

pub use scope::{ScopeFrame, ScopeTracker};
