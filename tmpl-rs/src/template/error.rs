//! Errors raised while lexing, evaluating, or rendering a template.
//!
//! Every variant is fatal to the `execute` call that produced it: rendering
//! stops at the first failure and no partial output is returned.

use std::fmt;

/// A template failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Unlexable input, leftover tokens, unclosed `(`, or a missing operand.
    /// `offset` is the byte offset inside the action text, when known.
    Syntax { offset: Option<usize>, message: String },
    /// An unrecognised backslash sequence inside a quoted literal.
    UnsupportedEscape(char),
    /// `$name` did not resolve in any enclosing scope.
    UndefinedVariable(String),
    /// `end` with no enclosing `with`.
    UnboundedEnd,
    /// Wrong arity or operand kind for a builtin.
    InvalidArguments { func: String, message: String },
    /// The command name is neither a user function nor a builtin.
    UnknownFunction(String),
    /// The command name is reserved but not supported.
    NotImplemented(String),
    /// A field walk hit a missing key or a value without fields.
    FieldAccess { field: String, message: String },
    /// A registered user function reported an error.
    FunctionFailed { func: String, message: String },
}

/// Result alias used throughout the template engine.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax { offset: None, message: message.into() }
    }

    pub(crate) fn syntax_at(offset: usize, message: impl Into<String>) -> Self {
        Error::Syntax { offset: Some(offset), message: message.into() }
    }

    pub(crate) fn invalid_args(func: &str, message: impl Into<String>) -> Self {
        Error::InvalidArguments { func: func.to_owned(), message: message.into() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax { offset: Some(pos), message } => {
                write!(f, "syntax error at offset {pos}: {message}")
            }
            Error::Syntax { offset: None, message } => write!(f, "syntax error: {message}"),
            Error::UnsupportedEscape(c) => write!(f, "unsupported escape sequence: \\{c}"),
            Error::UndefinedVariable(name) => write!(f, "undefined variable: ${name}"),
            Error::UnboundedEnd => write!(f, "unexpected end: no enclosing with"),
            Error::InvalidArguments { func, message } => {
                write!(f, "invalid arguments to {func}: {message}")
            }
            Error::UnknownFunction(name) => write!(f, "function {name} not defined"),
            Error::NotImplemented(name) => write!(f, "{name} is not implemented"),
            Error::FieldAccess { field, message } => {
                write!(f, "can't access field {field}: {message}")
            }
            Error::FunctionFailed { func, message } => {
                write!(f, "error calling {func}: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_syntax() {
        assert_eq!(
            Error::syntax_at(3, "unexpected input \"@\"").to_string(),
            "syntax error at offset 3: unexpected input \"@\""
        );
        assert_eq!(Error::syntax("unclosed '('").to_string(), "syntax error: unclosed '('");
    }

    #[test]
    fn display_escape() {
        assert_eq!(Error::UnsupportedEscape('q').to_string(), "unsupported escape sequence: \\q");
    }

    #[test]
    fn display_lookup_failures() {
        assert_eq!(Error::UndefinedVariable("x".into()).to_string(), "undefined variable: $x");
        assert_eq!(Error::UnknownFunction("foo".into()).to_string(), "function foo not defined");
        assert_eq!(Error::NotImplemented("range".into()).to_string(), "range is not implemented");
    }
}
