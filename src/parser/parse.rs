//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! the token helpers every production shares and the program entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent parser over a lazily-filled
//! [`TokenStream`], organized as:
//! - This module: Parser struct, helper methods, and `parse`
//! - `expressions`: precedence climbing, discrete expressions, invocation
//! - `declarations`: blocks and rule declarations
//!
//! # Grammar
//!
//! ```text
//! program ::= expression (";" expression)* [";"]
//! ```
//!
//! Parsing is fail-fast: the first [`SyntaxError`] aborts the whole parse.

use crate::config::ParseOptions;
use crate::parser::ast::*;
use crate::parser::cursor::Position;
use crate::parser::error::SyntaxError;
use crate::parser::lexer::{Keyword, Token, TokenKind, TokenStream};
use std::fmt;
use tracing::debug;

/// Recursive descent parser for rule programs
pub struct Parser<'a> {
    pub(crate) input: TokenStream<'a>,
    pub(crate) options: ParseOptions,
    /// Discrete expressions currently being parsed
    pub(crate) depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: &'a str, options: ParseOptions) -> Self {
        Self {
            input: TokenStream::with_options(source, options),
            options,
            depth: 0,
        }
    }

    /// Parse the entire program (top-level statements)
    pub fn parse(&mut self) -> Result<Program, SyntaxError> {
        let mut program = Program::new();

        while !self.input.eof()? {
            let node = self.parse_expression()?;
            debug!(target: "rulelang::parser", kind = node.type_name(), "parsed statement");
            program.nodes.push(node);

            if !self.input.eof()? {
                self.expect_punctuation(';', "between statements")?;
            }
        }

        debug!(target: "rulelang::parser", statements = program.len(), "parsed program");
        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn is_punctuation(&mut self, ch: char) -> Result<bool, SyntaxError> {
        Ok(self.input.peek()?.is_some_and(|t| t.is_punctuation(ch)))
    }

    pub(crate) fn is_keyword(&mut self, keyword: Keyword) -> Result<bool, SyntaxError> {
        Ok(self.input.peek()?.is_some_and(|t| t.is_keyword(keyword)))
    }

    pub(crate) fn is_identifier(&mut self) -> Result<bool, SyntaxError> {
        Ok(matches!(
            self.input.peek()?,
            Some(Token {
                kind: TokenKind::Identifier(_),
                ..
            })
        ))
    }

    /// Text of the lookahead token if it is an operator
    pub(crate) fn peek_operator(&mut self) -> Result<Option<String>, SyntaxError> {
        Ok(match self.input.peek()? {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) => Some(op.clone()),
            _ => None,
        })
    }

    /// Start position of the lookahead token, or the cursor at end of input
    pub(crate) fn lookahead_position(&mut self) -> Result<Position, SyntaxError> {
        let position = self.input.peek()?.map(|t| t.position);
        Ok(position.unwrap_or_else(|| self.input.position()))
    }

    pub(crate) fn expect_punctuation(&mut self, ch: char, context: &str) -> Result<(), SyntaxError> {
        if self.is_punctuation(ch)? {
            self.input.next()?;
            Ok(())
        } else {
            Err(self.error_expected(format_args!("'{}' {}", ch, context)))
        }
    }

    pub(crate) fn expect_identifier(&mut self, context: &str) -> Result<String, SyntaxError> {
        if self.is_identifier()? {
            if let Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) = self.input.next()?
            {
                return Ok(name);
            }
        }
        Err(self.error_expected(format_args!("identifier {}", context)))
    }

    /// "expected X, found Y" at the lookahead token
    pub(crate) fn error_expected(&mut self, expected: impl fmt::Display) -> SyntaxError {
        let found = match self.input.peek() {
            Ok(Some(token)) => token.to_string(),
            Ok(None) => "end of input".to_string(),
            Err(err) => return err,
        };
        let err = self.input.fail(format!("expected {}, found {}", expected, found));
        debug!(target: "rulelang::parser", %err, "syntax error");
        err
    }

    /// Parse `open [item (separator item)*] close`.
    ///
    /// A separator directly before `close` is only accepted when
    /// `allow_trailing` is set.
    pub(crate) fn delimited<T>(
        &mut self,
        open: char,
        close: char,
        separator: char,
        allow_trailing: bool,
        context: &str,
        mut item: impl FnMut(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<Vec<T>, SyntaxError> {
        self.expect_punctuation(open, context)?;

        let mut items = Vec::new();
        let mut first = true;
        while !self.is_punctuation(close)? {
            if first {
                first = false;
            } else {
                self.expect_punctuation(separator, context)?;
                if self.is_punctuation(close)? {
                    if allow_trailing {
                        break;
                    }
                    return Err(self.error_expected(format_args!(
                        "item after '{}' {}",
                        separator, context
                    )));
                }
            }
            items.push(item(self)?);
        }

        self.expect_punctuation(close, context)?;
        Ok(items)
    }
}
