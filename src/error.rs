use crate::token::{Token, TokenKind};
use crate::value::Value;
use thiserror::Error;

/// A problem found while parsing. Reported, not thrown: the parser keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error {location}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub location: String,
    /// True when the input ran out while more was expected, either at `end`
    /// or inside a string that was never closed.
    pub at_end: bool,
}

impl SyntaxError {
    pub fn at(token: &Token, message: &str) -> SyntaxError {
        let at_end = token.kind == TokenKind::End || token.is_unterminated_string();
        SyntaxError {
            message: message.to_string(),
            line: token.line,
            location: if token.kind == TokenKind::End {
                "at end".to_string()
            } else {
                format!("at '{}'", token.text)
            },
            at_end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new<S: Into<String>>(message: S) -> RuntimeError {
        RuntimeError {
            message: message.into(),
        }
    }
    pub fn undefined_variable(name: &str) -> RuntimeError {
        RuntimeError::new(format!("Undefined variable '{}'.", name))
    }
    pub fn already_defined(name: &str) -> RuntimeError {
        RuntimeError::new(format!("Variable '{}' is already defined.", name))
    }
    pub fn arity(expected: usize, got: usize) -> RuntimeError {
        RuntimeError::new(format!(
            "Expected {} arguments but got {}.",
            expected, got
        ))
    }
    pub fn not_callable(callee: &Value) -> RuntimeError {
        RuntimeError::new(format!(
            "Can only call functions, not {} '{}'.",
            callee.type_name(),
            callee
        ))
    }
    pub fn no_property(object: &Value, name: &str) -> RuntimeError {
        RuntimeError::new(format!(
            "Cannot access property '{}' on {} '{}'.",
            name,
            object.type_name(),
            object
        ))
    }
}

/// Everything running a piece of source can fail with.
#[derive(Debug, Error)]
pub enum VoxError {
    #[error("{}", join_errors(.0))]
    Syntax(Vec<SyntaxError>),
    /// The source stopped in the middle of a statement.
    #[error("{}", join_errors(.0))]
    Incomplete(Vec<SyntaxError>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

fn join_errors(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
