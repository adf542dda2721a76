//! luaparse_ast: Syntax tree definitions for Lua-family source.
//!
//! Node and field names follow the luaparse tree shape, so a serialized
//! [`Chunk`] matches what luaparse consumers expect field for field.

pub mod kind;
pub mod node;
pub mod node_ref;
pub mod visitor;

// Re-export key types
pub use kind::NodeKind;
pub use node::*;
pub use node_ref::NodeRef;
pub use visitor::AstVisitor;
