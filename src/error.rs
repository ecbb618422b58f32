// ABOUTME: Error types for the scanner, parser, and evaluator

use crate::value::Value;
use thiserror::Error;

/// A lexical error: an unrecognized character or an unterminated string.
/// Fatal to the current compilation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
}

/// A syntax error: an unexpected token or a missing `end`/delimiter.
/// Fatal to the current compilation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, got {actual}")]
    UnexpectedToken {
        expected: String,
        actual: String,
        line: usize,
    },

    #[error("line {line}: expected 'end' to close '{construct}' opened at line {opened_at}")]
    MissingEnd {
        construct: String,
        opened_at: usize,
        line: usize,
    },
}

/// Everything that can go wrong while `execute`-ing a compiled program.
///
/// `break`, `continue`, and `return` are NOT error kinds — they travel as
/// `Signal` values through `eval`'s `Ok` arm, never through `Err`.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Reference to an unbound identifier or class.
    #[error("NameError: undefined name '{0}'")]
    NameError(String),

    /// A value used in an operation it does not support.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Instance lacks a requested field or method.
    #[error("AttributeError: '{class}' instance has no attribute '{attr}'")]
    AttributeError { class: String, attr: String },

    /// Out-of-range list index.
    #[error("IndexError: list index {index} out of range (len {len})")]
    IndexError { index: i64, len: usize },

    /// Missing map key.
    #[error("KeyError: {0:?}")]
    KeyError(String),

    /// `include` failed to locate, read, or compile/execute its target file.
    #[error("LoadError: {0}")]
    LoadError(String),

    /// Division or modulo by zero.
    #[error("ZeroDivisionError: division by zero")]
    ZeroDivisionError,

    /// A `LexError`/`ParseError` raised while compiling an `include`d file.
    #[error("LoadError: {0}")]
    CompileError(String),
}

/// What `compile` returns before an `EvalError` is ever possible: a lexical
/// or syntactic failure, each tagged with the `origin` name `compile` was
/// given (a file path, or `"<repl>"`).
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error("{0}")]
    Lex(String),

    #[error("{0}")]
    Parse(String),
}

impl EvalError {
    pub fn type_error(op: &str, detail: impl Into<String>) -> Self {
        EvalError::TypeError(format!("{op}: {}", detail.into()))
    }

    pub fn not_callable(value: &Value) -> Self {
        EvalError::TypeError(format!("'{}' object is not callable", value.type_name()))
    }

    pub fn not_indexable(value: &Value) -> Self {
        EvalError::TypeError(format!("'{}' object is not indexable", value.type_name()))
    }
}
