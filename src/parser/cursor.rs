//! Character-level source cursor
//!
//! [`SourceCursor`] walks the raw text one character at a time and keeps the
//! [`Position`] of the next unread character. It is the only place positions
//! are computed, so every [`SyntaxError`] in the crate originates here or
//! from a position it handed out.

use crate::parser::error::SyntaxError;
use serde::Serialize;
use std::fmt;

/// Location in the source text.
///
/// `line` is 1-based, `column` is 0-based and resets on every newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn start() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Forward-only cursor over the characters of a source document
pub struct SourceCursor<'a> {
    source: &'a str,
    offset: usize,
    position: Position,
}

impl<'a> SourceCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            position: Position::start(),
        }
    }

    /// Character at the current position, `None` at end of input.
    pub fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    /// Consume and return the character [`peek`](Self::peek) would return.
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();

        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }

        Some(ch)
    }

    pub fn eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Consume characters while `predicate` holds, returning them.
    pub fn read_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            out.push(ch);
            self.next();
        }
        out
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Byte offset of the current position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Build a [`SyntaxError`] at the current position.
    pub fn fail(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.position, message)
    }
}
