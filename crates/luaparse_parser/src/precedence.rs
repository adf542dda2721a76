//! Operator precedence for binary and unary operators.

/// Binary operator precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Or = 1,
    And = 2,
    Comparison = 3,
    BitwiseOr = 4,
    BitwiseXor = 5,
    BitwiseAnd = 6,
    Shift = 7,
    Concat = 8,
    Additive = 9,
    Multiplicative = 10,
    Power = 12,
}

/// The operand of a unary operator is parsed at this level, so `-x^2` is
/// `-(x^2)` while `-x*y` is `(-x)*y`.
pub const UNARY_OPERAND: u8 = OperatorPrecedence::Multiplicative as u8;

/// Get the precedence of a binary operator, or `None` if `operator` is not one.
pub fn get_binary_operator_precedence(operator: &str) -> Option<OperatorPrecedence> {
    let precedence = match operator {
        "^" => OperatorPrecedence::Power,
        "*" | "/" | "//" | "%" => OperatorPrecedence::Multiplicative,
        "+" | "-" => OperatorPrecedence::Additive,
        ".." => OperatorPrecedence::Concat,
        "<<" | ">>" => OperatorPrecedence::Shift,
        "&" => OperatorPrecedence::BitwiseAnd,
        "~" => OperatorPrecedence::BitwiseXor,
        "|" => OperatorPrecedence::BitwiseOr,
        "==" | "~=" | "<" | ">" | "<=" | ">=" => OperatorPrecedence::Comparison,
        "and" => OperatorPrecedence::And,
        "or" => OperatorPrecedence::Or,
        _ => return None,
    };
    Some(precedence)
}

#[inline]
pub fn is_right_associative(operator: &str) -> bool {
    matches!(operator, "^" | "..")
}

#[inline]
pub fn is_logical(operator: &str) -> bool {
    matches!(operator, "and" | "or")
}
