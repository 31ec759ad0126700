//! Rule language parser
//!
//! This module transforms rule source text into an Abstract Syntax Tree (AST):
//! - [`cursor`]: Character cursor with line/column tracking
//! - [`lexer`]: Tokenization (characters → tokens), one token of lookahead
//! - [`parse`]: Parser coordinator (tokens → AST)
//! - [`ast`]: AST node definitions
//! - [`error`]: The single [`error::SyntaxError`] type
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary
//! operators. The stages form a pull chain: the parser asks the token stream
//! for tokens, which asks the cursor for characters. Nothing is buffered
//! beyond one token and one character, and nothing is ever un-consumed.

pub mod ast;
pub mod cursor;
mod declarations;
pub mod error;
pub mod expressions;
pub mod lexer;
pub mod parse;
