//! Expression parsing implementation
//!
//! This module handles expressions using precedence climbing for binary
//! operators and recursive descent for everything else.
//!
//! # Grammar
//!
//! ```text
//! expression ::= invocation(precedence(discrete, 0))
//! discrete   ::= "(" expression ")" | block | rule_decl | signed
//!              | NUMBER | STRING | IDENTIFIER | "true" | "false"
//! signed     ::= ("-" | "+") discrete
//! invocation ::= node ["(" (expression ("," expression)*)? ")"]
//! ```
//!
//! # Precedence
//!
//! | Operators                        | Binding power |
//! |----------------------------------|---------------|
//! | `=`                              | 1             |
//! | `\|\|`                           | 5             |
//! | `&&`                             | 10            |
//! | `<` `>` `<=` `>=` `==` `!=`      | 15            |
//! | `+` `-`                          | 20            |
//! | `*` `/` `%`                      | 25            |
//!
//! All operators group left to right, `=` included.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::error::SyntaxError;
use crate::parser::lexer::{Keyword, TokenKind};
use crate::parser::parse::Parser;

/// Binding power of an infix operator; higher binds tighter
pub fn binding_power(op: &str) -> Option<u8> {
    match op {
        "=" => Some(1),
        "||" => Some(5),
        "&&" => Some(10),
        "<" | ">" | "<=" | ">=" | "==" | "!=" => Some(15),
        "+" | "-" => Some(20),
        "*" | "/" | "%" => Some(25),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Node, SyntaxError> {
        let left = self.parse_discrete()?;
        let expr = self.parse_precedence(left, 0)?;
        self.maybe_invocation(expr)
    }

    /// Climb while the next operator binds tighter than `min_bp`
    fn parse_precedence(&mut self, mut left: Node, min_bp: u8) -> Result<Node, SyntaxError> {
        while let Some(op) = self.peek_operator()? {
            let Some(bp) = binding_power(&op) else {
                return Err(self.input.fail(format!("unknown operator '{}'", op)));
            };
            if bp <= min_bp {
                break;
            }
            self.input.next()?;

            let operand = self.parse_discrete()?;
            let right = self.parse_precedence(operand, bp)?;

            left = if op == "=" {
                Node::assign(left, right)
            } else {
                Node::binary(op, left, right)
            };
        }

        Ok(left)
    }

    /// Parse a discrete expression and any call applied directly to it
    pub(crate) fn parse_discrete(&mut self) -> Result<Node, SyntaxError> {
        if self.depth >= self.options.max_depth {
            return Err(self.input.fail(format!(
                "expression nested more than {} levels deep",
                self.options.max_depth
            )));
        }

        self.depth += 1;
        let node = self.parse_atom().and_then(|node| self.maybe_invocation(node));
        self.depth -= 1;
        node
    }

    fn parse_atom(&mut self) -> Result<Node, SyntaxError> {
        // Parenthesized expression
        if self.is_punctuation('(')? {
            self.input.next()?;
            let expr = self.parse_expression()?;
            self.expect_punctuation(')', "after parenthesized expression")?;
            return Ok(expr);
        }

        if self.is_punctuation('{')? {
            return self.parse_block();
        }

        if self.is_keyword(Keyword::Rule)? {
            self.input.next()?;
            return self.parse_rule();
        }

        let signed = self
            .input
            .peek()?
            .is_some_and(|t| t.is_operator("-") || t.is_operator("+"));
        if signed {
            let negate = self.input.next()?.is_some_and(|t| t.is_operator("-"));
            return self.parse_signed(negate);
        }

        let Some(token) = self.input.next()? else {
            return Err(self.input.fail("unexpected end of input"));
        };

        match token.kind {
            TokenKind::Number(value) => Ok(Node::number(value)),
            TokenKind::String(value) => Ok(Node::string(value)),
            TokenKind::Identifier(name) => Ok(Node::identifier(name)),
            TokenKind::Keyword(Keyword::True) => Ok(Node::boolean(true)),
            TokenKind::Keyword(Keyword::False) => Ok(Node::boolean(false)),
            _ => Err(SyntaxError::new(
                token.position,
                format!("unexpected token: {}", token),
            )),
        }
    }

    /// `-x` becomes `-1 * x`; `+x` is just `x`
    fn parse_signed(&mut self, negate: bool) -> Result<Node, SyntaxError> {
        let operand = self.parse_discrete()?;
        if negate {
            Ok(Node::binary("*", Node::number(-1.0), operand))
        } else {
            Ok(operand)
        }
    }

    /// Wrap `node` in a call if an argument list follows
    pub(crate) fn maybe_invocation(&mut self, node: Node) -> Result<Node, SyntaxError> {
        if !self.is_punctuation('(')? {
            return Ok(node);
        }

        let args = self.delimited('(', ')', ',', false, "in argument list", Self::parse_expression)?;
        Ok(Node::call(node, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;

    fn parse_one(source: &str) -> Node {
        let mut program = Parser::new(source).parse().unwrap();
        assert_eq!(program.len(), 1, "expected a single statement");
        program.nodes.remove(0)
    }

    fn num(n: f64) -> Node {
        Node::number(n)
    }

    fn id(name: &str) -> Node {
        Node::identifier(name)
    }

    #[test]
    fn test_precedence_mul_over_add() {
        assert_eq!(
            parse_one("1 + 2 * 3"),
            Node::binary("+", num(1.0), Node::binary("*", num(2.0), num(3.0)))
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            parse_one("(1 + 2) * 3"),
            Node::binary("*", Node::binary("+", num(1.0), num(2.0)), num(3.0))
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse_one("10 - 4 - 3"),
            Node::binary("-", Node::binary("-", num(10.0), num(4.0)), num(3.0))
        );
    }

    #[test]
    fn test_assignment_binds_loosest() {
        assert_eq!(
            parse_one("a = b + 1"),
            Node::assign(id("a"), Node::binary("+", id("b"), num(1.0)))
        );
    }

    #[test]
    fn test_logical_and_comparison_levels() {
        assert_eq!(
            parse_one("a < 1 || b >= 2 && c"),
            Node::binary(
                "||",
                Node::binary("<", id("a"), num(1.0)),
                Node::binary("&&", Node::binary(">=", id("b"), num(2.0)), id("c"))
            )
        );
    }

    #[test]
    fn test_negation_desugars_to_multiplication() {
        assert_eq!(parse_one("-5"), Node::binary("*", num(-1.0), num(5.0)));
        assert_eq!(parse_one("+x"), id("x"));
    }

    #[test]
    fn test_negation_binds_to_discrete_only() {
        assert_eq!(
            parse_one("-a * b"),
            Node::binary("*", Node::binary("*", num(-1.0), id("a")), id("b"))
        );
    }

    #[test]
    fn test_call() {
        assert_eq!(
            parse_one("foo(1, 2)"),
            Node::call(id("foo"), vec![num(1.0), num(2.0)])
        );
        assert_eq!(parse_one("foo()"), Node::call(id("foo"), vec![]));
    }

    #[test]
    fn test_call_inside_binary() {
        assert_eq!(
            parse_one("1 + f(x)"),
            Node::binary("+", num(1.0), Node::call(id("f"), vec![id("x")]))
        );
    }

    #[test]
    fn test_parenthesized_callee() {
        assert_eq!(
            parse_one("(f)(1)"),
            Node::call(id("f"), vec![num(1.0)])
        );
    }

    #[test]
    fn test_block_callee() {
        assert_eq!(parse_one("{ g }(1)"), Node::call(id("g"), vec![num(1.0)]));
        assert_eq!(
            parse_one("{ a; b }(1)"),
            Node::call(
                Node::Block {
                    body: vec![id("a"), id("b")]
                },
                vec![num(1.0)]
            )
        );
    }

    #[test]
    fn test_trailing_comma_in_call_is_rejected() {
        let err = Parser::new("f(1,)").parse().unwrap_err();
        assert_eq!(
            err.message(),
            "expected item after ',' in argument list, found punctuation ')'"
        );
        assert_eq!(err.column(), 4);
    }

    #[test]
    fn test_chained_assignment_groups_left() {
        assert_eq!(
            parse_one("a = b = c"),
            Node::assign(Node::assign(id("a"), id("b")), id("c"))
        );
    }

    #[test]
    fn test_nesting_limit() {
        let source = "(".repeat(10_000);
        let err = Parser::new(&source).parse().unwrap_err();
        assert_eq!(err.message(), "expression nested more than 128 levels deep");
        assert_eq!((err.line(), err.column()), (1, 128));

        let options = ParseOptions::default().with_max_depth(4);
        assert!(Parser::with_options("((1))", options).parse().is_ok());
        assert!(Parser::with_options("-(-(1))", options).parse().is_err());
    }

    #[test]
    fn test_booleans_and_strings() {
        assert_eq!(parse_one("true"), Node::boolean(true));
        assert_eq!(parse_one("false"), Node::boolean(false));
        assert_eq!(parse_one("\"hi\""), Node::string("hi"));
    }

    #[test]
    fn test_unknown_operator() {
        let err = Parser::new("a +- b").parse().unwrap_err();
        assert_eq!(err.message(), "unknown operator '+-'");
        assert_eq!(err.column(), 2);
    }

    #[test]
    fn test_unexpected_token() {
        let err = Parser::new("conform").parse().unwrap_err();
        assert_eq!(err.message(), "unexpected token: keyword 'conform'");

        let err = Parser::new(")").parse().unwrap_err();
        assert_eq!(err.message(), "unexpected token: punctuation ')'");
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let err = Parser::new("1 +").parse().unwrap_err();
        assert_eq!(err.message(), "unexpected end of input");
        assert_eq!(err.column(), 3);
    }

    #[test]
    fn test_binding_power_table() {
        assert_eq!(binding_power("="), Some(1));
        assert_eq!(binding_power("%"), Some(25));
        assert_eq!(binding_power("!"), None);
    }
}
