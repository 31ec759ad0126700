//! Block and rule declaration parsing
//!
//! # Grammar
//!
//! ```text
//! block     ::= "{" [expression (";" expression)* [";"]] "}"
//! rule_decl ::= "rule" [identifier] "(" [identifier ("," identifier)*] ")" block
//! ```
//!
//! A block holding exactly one expression collapses to that expression.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::error::SyntaxError;
use crate::parser::parse::Parser;
use rustc_hash::FxHashSet;

impl<'a> Parser<'a> {
    /// Parse `{ ... }`; a single statement is returned unwrapped
    pub(crate) fn parse_block(&mut self) -> Result<Node, SyntaxError> {
        let mut body = self.delimited('{', '}', ';', true, "in block", Self::parse_expression)?;

        if body.len() == 1 {
            Ok(body.remove(0))
        } else {
            Ok(Node::Block { body })
        }
    }

    /// Parse a rule declaration; the `rule` keyword is already consumed
    pub(crate) fn parse_rule(&mut self) -> Result<Node, SyntaxError> {
        let name = if self.is_identifier()? {
            Some(self.expect_identifier("as rule name")?)
        } else {
            None
        };

        if !self.is_punctuation('(')? {
            return Err(self.error_expected("argument list '(' after 'rule'"));
        }
        let params = self.parse_rule_params()?;

        if !self.is_punctuation('{')? {
            return Err(self.error_expected("rule body '{' after argument list"));
        }
        let body = self.parse_block()?;

        Ok(Node::Rule {
            name,
            params,
            body: Box::new(body),
        })
    }

    fn parse_rule_params(&mut self) -> Result<Vec<String>, SyntaxError> {
        let params = self.delimited('(', ')', ',', false, "in argument list", |parser| {
            let position = parser.lookahead_position()?;
            let name = parser.expect_identifier("as rule parameter")?;
            Ok((name, position))
        })?;

        if self.options.reject_duplicate_params {
            let mut seen = FxHashSet::default();
            for (name, position) in &params {
                if !seen.insert(name.as_str()) {
                    return Err(SyntaxError::new(
                        *position,
                        format!("duplicate parameter '{}' in rule declaration", name),
                    ));
                }
            }
        }

        Ok(params.into_iter().map(|(name, _)| name).collect())
    }
}
