//! AST node definitions.
//!
//! Every node carries a [`NodeMeta`] with its optional location and byte
//! range. Statement and expression families are closed enums whose variants
//! hold one struct per node type.

use luaparse_core::text::{SourceLocation, TextRange};
use serde::{Serialize, Serializer};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Position metadata shared by every node. Both fields stay `None` unless
/// the corresponding option was enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<TextRange>,
}

impl NodeMeta {
    pub const NONE: NodeMeta = NodeMeta { loc: None, range: None };
}

/// One binding of a scope frame, as captured when the frame closed.
/// The implicit `self` of a method has no declaring node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeBinding {
    pub name: String,
    pub node: Option<Identifier>,
}

// ============================================================================
// Root
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Chunk {
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    /// Unresolved identifier uses, one per name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub globals: Option<Vec<Identifier>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub struct Comment {
    /// Text without the `--` marker or long brackets.
    pub value: String,
    pub raw: String,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statement {
    Label(LabelStatement),
    Break(BreakStatement),
    Goto(GotoStatement),
    Return(ReturnStatement),
    If(IfStatement),
    While(WhileStatement),
    Do(DoStatement),
    Repeat(RepeatStatement),
    Local(LocalStatement),
    Assignment(AssignmentStatement),
    Call(CallStatement),
    Function(Box<FunctionDeclaration>),
    ForNumeric(ForNumericStatement),
    ForGeneric(ForGenericStatement),
    Hstructure(HstructureDeclarationExpression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct LabelStatement {
    pub label: Identifier,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BreakStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct GotoStatement {
    pub label: Identifier,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ReturnStatement {
    pub arguments: Vec<Expression>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// Clauses are stored in source order: one `IfClause`, any number of
/// `ElseifClause`s, then at most one `ElseClause`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct IfStatement {
    pub clauses: Vec<Clause>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Clause {
    If(IfClause),
    Elseif(ElseifClause),
    Else(ElseClause),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct IfClause {
    pub condition: Expression,
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ElseifClause {
    pub condition: Expression,
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ElseClause {
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct DoStatement {
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct RepeatStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct LocalStatement {
    pub variables: Vec<Declarator>,
    pub init: Vec<Expression>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentStatement {
    /// Identifier, member or index expressions.
    pub variables: Vec<Expression>,
    pub init: Vec<Expression>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CallStatement {
    /// A `CallExpression`, `TableCallExpression` or `StringCallExpression`.
    pub expression: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// A named function statement or an anonymous function expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct FunctionDeclaration {
    /// `None` for function expressions; an identifier or member expression
    /// otherwise.
    pub identifier: Option<Expression>,
    pub is_local: bool,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

impl FunctionDeclaration {
    /// Whether the parameter list ends with `...`.
    pub fn is_vararg(&self) -> bool {
        matches!(self.parameters.last(), Some(Parameter::Vararg(_)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ForNumericStatement {
    pub variable: Identifier,
    pub start: Expression,
    pub end: Expression,
    /// Explicitly `None` (serialized as `null`) when omitted.
    pub step: Option<Expression>,
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ForGenericStatement {
    pub variables: Vec<Identifier>,
    pub iterators: Vec<Expression>,
    pub body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<ScopeBinding>>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    Function(Box<FunctionDeclaration>),
    Table(TableConstructorExpression),
    Binary(Box<BinaryExpression>),
    Logical(Box<LogicalExpression>),
    Unary(Box<UnaryExpression>),
    Member(Box<MemberExpression>),
    Index(Box<IndexExpression>),
    Call(Box<CallExpression>),
    TableCall(Box<TableCallExpression>),
    StringCall(Box<StringCallExpression>),
    Hmake(HmakeConstructorExpression),
}

impl Expression {
    /// Whether this expression can stand alone as a statement.
    pub fn is_call(&self) -> bool {
        matches!(
            self,
            Expression::Call(_) | Expression::TableCall(_) | Expression::StringCall(_)
        )
    }

    /// Whether this expression can be assigned to.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Expression::Identifier(_) | Expression::Member(_) | Expression::Index(_)
        )
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expression::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Identifier {
    pub name: String,
    /// Set when a visible local declaration binds this name. Declaring
    /// identifiers are local too.
    #[serde(skip_serializing_if = "is_false")]
    pub is_local: bool,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

impl Identifier {
    pub fn new(name: impl Into<String>, meta: NodeMeta) -> Self {
        Self {
            name: name.into(),
            is_local: false,
            meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralKind {
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NilLiteral,
    VarargLiteral,
}

/// The decoded value of a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Nil,
    Vararg,
}

impl Serialize for LiteralValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LiteralValue::String(value) => serializer.serialize_str(value),
            LiteralValue::Number(value) => serializer.serialize_f64(*value),
            LiteralValue::Boolean(value) => serializer.serialize_bool(*value),
            LiteralValue::Nil => serializer.serialize_none(),
            LiteralValue::Vararg => serializer.serialize_str("..."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    #[serde(rename = "type")]
    pub kind: LiteralKind,
    pub value: LiteralValue,
    /// The literal exactly as written in the source.
    pub raw: String,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TableConstructorExpression {
    pub fields: Vec<TableField>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableField {
    /// `[key] = value`
    Key(TableKey),
    /// `name = value`
    KeyString(TableKeyString),
    /// `value`
    Value(TableValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TableKey {
    pub key: Expression,
    pub value: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TableKeyString {
    pub key: Identifier,
    pub value: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TableValue {
    pub value: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// Arithmetic, bitwise, comparison and concatenation operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BinaryExpression {
    pub operator: String,
    pub left: Expression,
    pub right: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// `and` / `or`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct LogicalExpression {
    pub operator: String,
    pub left: Expression,
    pub right: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct UnaryExpression {
    pub operator: String,
    pub argument: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// `base.identifier` or `base:identifier`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct MemberExpression {
    /// `"."` or `":"`.
    pub indexer: String,
    pub identifier: Identifier,
    pub base: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct IndexExpression {
    pub base: Expression,
    pub index: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CallExpression {
    pub base: Expression,
    pub arguments: Vec<Expression>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// `f{...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TableCallExpression {
    pub base: Expression,
    pub arguments: TableConstructorExpression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// `f"..."`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct StringCallExpression {
    pub base: Expression,
    pub argument: Literal,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

// ============================================================================
// HavokScript extensions
// ============================================================================

/// A declared variable in a `local` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Declarator {
    Identifier(Identifier),
    Typed(TypedIdentifier),
}

impl Declarator {
    /// The identifier that introduces the binding.
    pub fn identifier(&self) -> &Identifier {
        match self {
            Declarator::Identifier(ident) => ident,
            Declarator::Typed(typed) => &typed.name,
        }
    }

    pub fn identifier_mut(&mut self) -> &mut Identifier {
        match self {
            Declarator::Identifier(ident) => ident,
            Declarator::Typed(typed) => &mut typed.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parameter {
    Identifier(Identifier),
    Typed(TypedIdentifier),
    /// The trailing `...`.
    Vararg(Literal),
}

impl Parameter {
    pub fn identifier(&self) -> Option<&Identifier> {
        match self {
            Parameter::Identifier(ident) => Some(ident),
            Parameter::Typed(typed) => Some(&typed.name),
            Parameter::Vararg(_) => None,
        }
    }
}

/// `name : Type`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct TypedIdentifier {
    pub name: Identifier,
    pub data_type: Identifier,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// `hstructure Name field : Type ... end`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct HstructureDeclarationExpression {
    pub name: Identifier,
    pub fields: Vec<HstructureEntry>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct HstructureEntry {
    pub key: Identifier,
    pub data_type: Identifier,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// `hmake Type { key = value, ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct HmakeConstructorExpression {
    pub data_type: Identifier,
    pub fields: Vec<HmakeValue>,
    #[serde(flatten)]
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct HmakeValue {
    pub key: Identifier,
    pub value: Expression,
    #[serde(flatten)]
    pub meta: NodeMeta,
}
