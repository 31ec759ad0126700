//! # Introduction
//!
//! `rulelang` turns source text of a small rule language into an AST.
//!
//! ## Pipeline
//!
//! ```text
//! Source → SourceCursor → TokenStream → Parser → Program (Vec<Node>)
//! ```
//!
//! 1. [`parser::cursor`] tracks line/column and hands out characters.
//! 2. [`parser::lexer`] classifies characters into tokens on demand.
//! 3. [`parser::parse`] builds [`Node`] trees by recursive descent with
//!    precedence climbing.
//!
//! Any malformed input aborts with a single [`SyntaxError`] carrying the
//! line and column it was detected at. The resulting [`Program`] serializes
//! to JSON as a tree tagged by each node's `type`.
//!
//! ## Language
//!
//! ```text
//! # comments run to end of line
//! rule add(a, b) { a + b };
//! total = add(1, 2) * 3;
//! rule(x) { x }(5)
//! ```

pub mod config;
pub mod parser;

pub use config::ParseOptions;
pub use parser::ast::{Node, Program};
pub use parser::cursor::Position;
pub use parser::error::SyntaxError;
pub use parser::lexer::{Keyword, Token, TokenKind, TokenStream};
pub use parser::parse::Parser;

/// Parse a whole document with default options.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    Parser::new(source).parse()
}

pub fn parse_with(source: &str, options: ParseOptions) -> Result<Program, SyntaxError> {
    Parser::with_options(source, options).parse()
}

/// Tokenize a whole document with default options.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    TokenStream::new(source).tokenize()
}
