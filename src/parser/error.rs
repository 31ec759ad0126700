//! Syntax error type
//!
//! [`SyntaxError`] is the only error the lexer and parser produce. All errors
//! are fatal: the first one aborts parsing and no partial tree is returned.

use crate::parser::cursor::Position;
use thiserror::Error;

/// A malformed-input error with the position it was detected at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({position})")]
pub struct SyntaxError {
    pub position: Position,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
