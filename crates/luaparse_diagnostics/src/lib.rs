//! luaparse_diagnostics: Error messages and the parse error type.
//!
//! Every failure the lexer or parser can report is listed in [`messages`]
//! as a template with `{0}`, `{1}` placeholders. A failed parse produces a
//! single [`ParseError`]; there is no recovery and no partial tree.

use luaparse_core::text::TextPos;
use std::fmt;

/// Which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A malformed token at the character level.
    Lexical,
    /// Well-formed tokens in an invalid arrangement.
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "LexicalError"),
            ErrorKind::Syntax => write!(f, "SyntaxError"),
        }
    }
}

/// A message template with a code and the stage that raises it.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub kind: ErrorKind,
    /// The message template string. May contain `{0}`, `{1}` placeholders.
    pub message: &'static str,
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
///
/// The template is scanned once, so braces inside an argument are copied
/// verbatim. A placeholder without a matching argument is left as written.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let arg = if digits > 0 && after[digits..].starts_with('}') {
            after[..digits].parse::<usize>().ok().and_then(|i| args.get(i))
        } else {
            None
        };
        match arg {
            Some(arg) => {
                result.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// The first fatal error of a parse.
///
/// `Display` renders the message prefixed by its position, as
/// `[line:column] message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{line}:{column}] {message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub code: u32,
    /// The formatted message without the position prefix.
    pub message: String,
    /// Byte offset of the offending token or character.
    pub offset: TextPos,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
    /// Set when the failure was caused by reaching the end of the
    /// currently available input.
    pub eof: bool,
}

impl ParseError {
    pub fn new(
        message: &DiagnosticMessage,
        args: &[&str],
        offset: TextPos,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            kind: message.kind,
            code: message.code,
            message: format_message(message.message, args),
            offset,
            line,
            column,
            eof: false,
        }
    }

    /// Mark the error as caused by running out of input.
    pub fn at_end_of_input(mut self, eof: bool) -> Self {
        self.eof = eof;
        self
    }

    pub fn is_lexical(&self) -> bool {
        self.kind == ErrorKind::Lexical
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ErrorKind::Syntax
    }
}

// ============================================================================
// Message catalogue
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Lexical, $msg:expr) => {
            DiagnosticMessage { code: $code, kind: ErrorKind::Lexical, message: $msg }
        };
        ($code:expr, Syntax, $msg:expr) => {
            DiagnosticMessage { code: $code, kind: ErrorKind::Syntax, message: $msg }
        };
    }

    // ========================================================================
    // Lexer errors (1000-1099)
    // ========================================================================
    pub const UNFINISHED_STRING: DiagnosticMessage = diag!(1001, Lexical, "unfinished string near '{0}'");
    pub const MALFORMED_NUMBER: DiagnosticMessage = diag!(1002, Lexical, "malformed number near '{0}'");
    pub const DECIMAL_ESCAPE_TOO_LARGE: DiagnosticMessage = diag!(1003, Lexical, "decimal escape too large near '{0}'");
    pub const INVALID_ESCAPE: DiagnosticMessage = diag!(1004, Lexical, "invalid escape sequence near '{0}'");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1005, Lexical, "hexadecimal digit expected near '{0}'");
    pub const BRACE_EXPECTED: DiagnosticMessage = diag!(1006, Lexical, "missing '{0}' in \\u{xxxx} near '{1}'");
    pub const UTF8_VALUE_TOO_LARGE: DiagnosticMessage = diag!(1007, Lexical, "UTF-8 value too large near '{0}'");
    pub const UNFINISHED_LONG_STRING: DiagnosticMessage = diag!(1008, Lexical, "unfinished long string (starting at line {0}) near '{1}'");
    pub const UNFINISHED_LONG_COMMENT: DiagnosticMessage = diag!(1009, Lexical, "unfinished long comment (starting at line {0}) near '{1}'");
    pub const INVALID_LONG_STRING_DELIMITER: DiagnosticMessage = diag!(1010, Lexical, "invalid long string delimiter near '{0}'");
    pub const UNEXPECTED_CHARACTER: DiagnosticMessage = diag!(1011, Lexical, "unexpected symbol near '{0}'");

    // ========================================================================
    // Parser errors (2000-2099)
    // ========================================================================
    pub const UNEXPECTED: DiagnosticMessage = diag!(2001, Syntax, "unexpected {0} '{1}' near '{2}'");
    pub const UNEXPECTED_EOF: DiagnosticMessage = diag!(2002, Syntax, "unexpected symbol near '<eof>'");
    pub const EXPECTED: DiagnosticMessage = diag!(2003, Syntax, "'{0}' expected near '{1}'");
    pub const EXPECTED_TOKEN: DiagnosticMessage = diag!(2004, Syntax, "{0} expected near '{1}'");
    pub const AMBIGUOUS_SYNTAX: DiagnosticMessage = diag!(2005, Syntax, "ambiguous syntax (function call x new statement) near '{0}'");
    pub const NO_LOOP_TO_BREAK: DiagnosticMessage = diag!(2006, Syntax, "no loop to break near '{0}'");
    pub const LABEL_ALREADY_DEFINED: DiagnosticMessage = diag!(2007, Syntax, "label '{0}' already defined on line {1}");
    pub const LABEL_NOT_VISIBLE: DiagnosticMessage = diag!(2008, Syntax, "no visible label '{0}' for goto");
    pub const GOTO_JUMP_IN_LOCAL_SCOPE: DiagnosticMessage = diag!(2009, Syntax, "<goto {0}> jumps into the scope of local '{1}'");
    pub const CANNOT_USE_VARARG: DiagnosticMessage = diag!(2010, Syntax, "cannot use '...' outside a vararg function near '{0}'");
    pub const TOO_MANY_SYNTAX_LEVELS: DiagnosticMessage = diag!(2011, Syntax, "chunk has too many syntax levels near '{0}'");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let text = format_message(messages::EXPECTED.message, &["end", "<eof>"]);
        assert_eq!(text, "'end' expected near '<eof>'");
    }

    #[test]
    fn test_format_message_keeps_braces_in_arguments() {
        let text = format_message(messages::UNEXPECTED.message, &["string", "'{2}'", "'{2}'"]);
        assert_eq!(text, "unexpected string ''{2}'' near ''{2}''");
        let text = format_message("{0} and {1}", &["{1}", "b"]);
        assert_eq!(text, "{1} and b");
        assert_eq!(format_message("{9} {x", &["a"]), "{9} {x");
    }

    #[test]
    fn test_display_prefixes_position() {
        let err = ParseError::new(&messages::UNEXPECTED, &["identifier", "y", "y"], 6, 1, 7);
        assert_eq!(err.to_string(), "[1:7] unexpected identifier 'y' near 'y'");
        assert!(err.is_syntax());
        assert!(!err.eof);
    }

    #[test]
    fn test_lexical_kind() {
        let err = ParseError::new(&messages::UNFINISHED_STRING, &["\"abc"], 0, 1, 1)
            .at_end_of_input(true);
        assert!(err.is_lexical());
        assert!(err.eof);
    }
}
