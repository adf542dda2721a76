//! The closed set of node kinds and the accessors that report them.

use crate::node::*;
use std::fmt;

/// The `type` tag of every node, named as luaparse names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Chunk,
    Comment,
    // Statements
    LabelStatement,
    BreakStatement,
    GotoStatement,
    ReturnStatement,
    IfStatement,
    IfClause,
    ElseifClause,
    ElseClause,
    WhileStatement,
    DoStatement,
    RepeatStatement,
    LocalStatement,
    AssignmentStatement,
    CallStatement,
    FunctionDeclaration,
    ForNumericStatement,
    ForGenericStatement,
    // Expressions
    Identifier,
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NilLiteral,
    VarargLiteral,
    TableKey,
    TableKeyString,
    TableValue,
    TableConstructorExpression,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression,
    MemberExpression,
    IndexExpression,
    CallExpression,
    TableCallExpression,
    StringCallExpression,
    // HavokScript
    TypedIdentifier,
    HstructureDeclarationExpression,
    HstructureEntry,
    HmakeConstructorExpression,
    HmakeValue,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Chunk => "Chunk",
            NodeKind::Comment => "Comment",
            NodeKind::LabelStatement => "LabelStatement",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::GotoStatement => "GotoStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::IfClause => "IfClause",
            NodeKind::ElseifClause => "ElseifClause",
            NodeKind::ElseClause => "ElseClause",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::DoStatement => "DoStatement",
            NodeKind::RepeatStatement => "RepeatStatement",
            NodeKind::LocalStatement => "LocalStatement",
            NodeKind::AssignmentStatement => "AssignmentStatement",
            NodeKind::CallStatement => "CallStatement",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::ForNumericStatement => "ForNumericStatement",
            NodeKind::ForGenericStatement => "ForGenericStatement",
            NodeKind::Identifier => "Identifier",
            NodeKind::StringLiteral => "StringLiteral",
            NodeKind::NumericLiteral => "NumericLiteral",
            NodeKind::BooleanLiteral => "BooleanLiteral",
            NodeKind::NilLiteral => "NilLiteral",
            NodeKind::VarargLiteral => "VarargLiteral",
            NodeKind::TableKey => "TableKey",
            NodeKind::TableKeyString => "TableKeyString",
            NodeKind::TableValue => "TableValue",
            NodeKind::TableConstructorExpression => "TableConstructorExpression",
            NodeKind::BinaryExpression => "BinaryExpression",
            NodeKind::LogicalExpression => "LogicalExpression",
            NodeKind::UnaryExpression => "UnaryExpression",
            NodeKind::MemberExpression => "MemberExpression",
            NodeKind::IndexExpression => "IndexExpression",
            NodeKind::CallExpression => "CallExpression",
            NodeKind::TableCallExpression => "TableCallExpression",
            NodeKind::StringCallExpression => "StringCallExpression",
            NodeKind::TypedIdentifier => "TypedIdentifier",
            NodeKind::HstructureDeclarationExpression => "HstructureDeclarationExpression",
            NodeKind::HstructureEntry => "HstructureEntry",
            NodeKind::HmakeConstructorExpression => "HmakeConstructorExpression",
            NodeKind::HmakeValue => "HmakeValue",
        }
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::StringLiteral
                | NodeKind::NumericLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::NilLiteral
                | NodeKind::VarargLiteral
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LiteralKind> for NodeKind {
    fn from(kind: LiteralKind) -> Self {
        match kind {
            LiteralKind::StringLiteral => NodeKind::StringLiteral,
            LiteralKind::NumericLiteral => NodeKind::NumericLiteral,
            LiteralKind::BooleanLiteral => NodeKind::BooleanLiteral,
            LiteralKind::NilLiteral => NodeKind::NilLiteral,
            LiteralKind::VarargLiteral => NodeKind::VarargLiteral,
        }
    }
}

/// Common accessors of every node struct.
pub trait Node {
    fn kind(&self) -> NodeKind;
    fn meta(&self) -> &NodeMeta;
}

macro_rules! impl_node {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Node for $ty {
                #[inline]
                fn kind(&self) -> NodeKind {
                    NodeKind::$ty
                }

                #[inline]
                fn meta(&self) -> &NodeMeta {
                    &self.meta
                }
            }
        )*
    };
}

impl_node!(
    Chunk,
    Comment,
    LabelStatement,
    BreakStatement,
    GotoStatement,
    ReturnStatement,
    IfStatement,
    IfClause,
    ElseifClause,
    ElseClause,
    WhileStatement,
    DoStatement,
    RepeatStatement,
    LocalStatement,
    AssignmentStatement,
    CallStatement,
    FunctionDeclaration,
    ForNumericStatement,
    ForGenericStatement,
    Identifier,
    TableKey,
    TableKeyString,
    TableValue,
    TableConstructorExpression,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression,
    MemberExpression,
    IndexExpression,
    CallExpression,
    TableCallExpression,
    StringCallExpression,
    TypedIdentifier,
    HstructureDeclarationExpression,
    HstructureEntry,
    HmakeConstructorExpression,
    HmakeValue,
);

impl Node for Literal {
    #[inline]
    fn kind(&self) -> NodeKind {
        self.kind.into()
    }

    #[inline]
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
}

impl Statement {
    pub fn kind(&self) -> NodeKind {
        self.node().kind()
    }

    pub fn meta(&self) -> &NodeMeta {
        self.node().meta()
    }

    fn node(&self) -> &dyn Node {
        match self {
            Statement::Label(n) => n,
            Statement::Break(n) => n,
            Statement::Goto(n) => n,
            Statement::Return(n) => n,
            Statement::If(n) => n,
            Statement::While(n) => n,
            Statement::Do(n) => n,
            Statement::Repeat(n) => n,
            Statement::Local(n) => n,
            Statement::Assignment(n) => n,
            Statement::Call(n) => n,
            Statement::Function(n) => n.as_ref(),
            Statement::ForNumeric(n) => n,
            Statement::ForGeneric(n) => n,
            Statement::Hstructure(n) => n,
        }
    }
}

impl Expression {
    pub fn kind(&self) -> NodeKind {
        self.node().kind()
    }

    pub fn meta(&self) -> &NodeMeta {
        self.node().meta()
    }

    fn node(&self) -> &dyn Node {
        match self {
            Expression::Identifier(n) => n,
            Expression::Literal(n) => n,
            Expression::Function(n) => n.as_ref(),
            Expression::Table(n) => n,
            Expression::Binary(n) => n.as_ref(),
            Expression::Logical(n) => n.as_ref(),
            Expression::Unary(n) => n.as_ref(),
            Expression::Member(n) => n.as_ref(),
            Expression::Index(n) => n.as_ref(),
            Expression::Call(n) => n.as_ref(),
            Expression::TableCall(n) => n.as_ref(),
            Expression::StringCall(n) => n.as_ref(),
            Expression::Hmake(n) => n,
        }
    }
}

impl Clause {
    pub fn kind(&self) -> NodeKind {
        match self {
            Clause::If(_) => NodeKind::IfClause,
            Clause::Elseif(_) => NodeKind::ElseifClause,
            Clause::Else(_) => NodeKind::ElseClause,
        }
    }

    pub fn meta(&self) -> &NodeMeta {
        match self {
            Clause::If(n) => &n.meta,
            Clause::Elseif(n) => &n.meta,
            Clause::Else(n) => &n.meta,
        }
    }

    pub fn condition(&self) -> Option<&Expression> {
        match self {
            Clause::If(n) => Some(&n.condition),
            Clause::Elseif(n) => Some(&n.condition),
            Clause::Else(_) => None,
        }
    }

    pub fn body(&self) -> &[Statement] {
        match self {
            Clause::If(n) => &n.body,
            Clause::Elseif(n) => &n.body,
            Clause::Else(n) => &n.body,
        }
    }
}

impl TableField {
    pub fn kind(&self) -> NodeKind {
        match self {
            TableField::Key(_) => NodeKind::TableKey,
            TableField::KeyString(_) => NodeKind::TableKeyString,
            TableField::Value(_) => NodeKind::TableValue,
        }
    }

    pub fn meta(&self) -> &NodeMeta {
        match self {
            TableField::Key(n) => &n.meta,
            TableField::KeyString(n) => &n.meta,
            TableField::Value(n) => &n.meta,
        }
    }

    pub fn value(&self) -> &Expression {
        match self {
            TableField::Key(n) => &n.value,
            TableField::KeyString(n) => &n.value,
            TableField::Value(n) => &n.value,
        }
    }
}
