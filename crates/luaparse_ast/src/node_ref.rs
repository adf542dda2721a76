//! Borrowed view of any node, handed to observers as nodes complete.

use crate::kind::{Node, NodeKind};
use crate::node::*;

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Chunk(&'a Chunk),
    Statement(&'a Statement),
    Expression(&'a Expression),
    Identifier(&'a Identifier),
    Literal(&'a Literal),
    Table(&'a TableConstructorExpression),
    TypedIdentifier(&'a TypedIdentifier),
    Clause(&'a Clause),
    TableField(&'a TableField),
    HstructureEntry(&'a HstructureEntry),
    HmakeValue(&'a HmakeValue),
    Comment(&'a Comment),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Chunk(n) => n.kind(),
            NodeRef::Statement(n) => n.kind(),
            NodeRef::Expression(n) => n.kind(),
            NodeRef::Identifier(n) => n.kind(),
            NodeRef::Literal(n) => n.kind(),
            NodeRef::Table(n) => n.kind(),
            NodeRef::TypedIdentifier(n) => n.kind(),
            NodeRef::Clause(n) => n.kind(),
            NodeRef::TableField(n) => n.kind(),
            NodeRef::HstructureEntry(n) => n.kind(),
            NodeRef::HmakeValue(n) => n.kind(),
            NodeRef::Comment(n) => n.kind(),
        }
    }

    pub fn meta(&self) -> &'a NodeMeta {
        match *self {
            NodeRef::Chunk(n) => &n.meta,
            NodeRef::Statement(n) => n.meta(),
            NodeRef::Expression(n) => n.meta(),
            NodeRef::Identifier(n) => &n.meta,
            NodeRef::Literal(n) => &n.meta,
            NodeRef::Table(n) => &n.meta,
            NodeRef::TypedIdentifier(n) => &n.meta,
            NodeRef::Clause(n) => n.meta(),
            NodeRef::TableField(n) => n.meta(),
            NodeRef::HstructureEntry(n) => &n.meta,
            NodeRef::HmakeValue(n) => &n.meta,
            NodeRef::Comment(n) => &n.meta,
        }
    }

    /// The identifier this node is, if any.
    pub fn as_identifier(&self) -> Option<&'a Identifier> {
        match *self {
            NodeRef::Identifier(n) => Some(n),
            NodeRef::Expression(Expression::Identifier(n)) => Some(n),
            _ => None,
        }
    }
}
