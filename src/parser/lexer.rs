//! Lexer (token stream) for rule source text
//!
//! [`TokenStream`] pulls characters from a [`SourceCursor`] on demand and
//! classifies them into [`Token`]s. Exactly one token of lookahead is cached;
//! nothing else is buffered.
//!
//! Classification is tried in a fixed order against the next character:
//! whitespace, `#` comments, `"` strings, digits, identifiers/keywords,
//! punctuation, then operator runs. Anything else is an illegal character.
//! Operators are recognised by character class alone, so `==` and `+-` are
//! both single operator tokens.

use crate::config::ParseOptions;
use crate::parser::cursor::{Position, SourceCursor};
use crate::parser::error::SyntaxError;
use serde::Serialize;
use std::fmt;
use tracing::{trace, warn};

/// Reserved words of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    Rule,
    Conform,
    True,
    False,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "rule" => Some(Keyword::Rule),
            "conform" => Some(Keyword::Conform),
            "true" => Some(Keyword::True),
            "false" => Some(Keyword::False),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Rule => "rule",
            Keyword::Conform => "conform",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }
}

/// Token classification together with its value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TokenKind {
    String(String),
    Number(f64),
    Identifier(String),
    Keyword(Keyword),
    Operator(String),
    Punctuation(char),
}

impl TokenKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TokenKind::String(_) => "string",
            TokenKind::Number(_) => "number",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Operator(_) => "operator",
            TokenKind::Punctuation(_) => "punctuation",
        }
    }
}

/// A lexical unit and the position of its first character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(flatten)]
    pub kind: TokenKind,
    #[serde(flatten)]
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn is_punctuation(&self, ch: char) -> bool {
        matches!(self.kind, TokenKind::Punctuation(c) if c == ch)
    }

    pub fn is_operator(&self, op: &str) -> bool {
        matches!(&self.kind, TokenKind::Operator(o) if o == op)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.kind_name();
        match &self.kind {
            TokenKind::String(s) => write!(f, "{} \"{}\"", kind, s),
            TokenKind::Number(n) => write!(f, "{} {}", kind, n),
            TokenKind::Identifier(s) | TokenKind::Operator(s) => write!(f, "{} '{}'", kind, s),
            TokenKind::Keyword(k) => write!(f, "{} '{}'", kind, k.as_str()),
            TokenKind::Punctuation(c) => write!(f, "{} '{}'", kind, c),
        }
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '?' | '!')
}

fn is_punctuation(ch: char) -> bool {
    matches!(ch, ',' | ':' | ';' | '(' | ')' | '{' | '}' | '[' | ']')
}

fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '*' | '/' | '%' | '=' | '&' | '|' | '<' | '>' | '!' | '~' | '^'
    )
}

/// Lazily tokenizes a source document with one token of lookahead
pub struct TokenStream<'a> {
    cursor: SourceCursor<'a>,
    current: Option<Token>,
    options: ParseOptions,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: &'a str, options: ParseOptions) -> Self {
        Self {
            cursor: SourceCursor::new(source),
            current: None,
            options,
        }
    }

    /// Look at the next token without consuming it.
    ///
    /// Repeated calls return the same cached token until [`next`](Self::next)
    /// is called. `None` means end of input.
    pub fn peek(&mut self) -> Result<Option<&Token>, SyntaxError> {
        if self.current.is_none() {
            self.current = self.read_next_token()?;
        }
        Ok(self.current.as_ref())
    }

    /// Consume the next token.
    pub fn next(&mut self) -> Result<Option<Token>, SyntaxError> {
        match self.current.take() {
            Some(token) => Ok(Some(token)),
            None => self.read_next_token(),
        }
    }

    pub fn eof(&mut self) -> Result<bool, SyntaxError> {
        Ok(self.peek()?.is_none())
    }

    /// Build a [`SyntaxError`] at the lookahead token, or at the cursor when
    /// nothing is cached (end of input).
    pub fn fail(&self, message: impl Into<String>) -> SyntaxError {
        match &self.current {
            Some(token) => SyntaxError::new(token.position, message),
            None => self.cursor.fail(message),
        }
    }

    /// Position of the next unread character.
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Build a [`SyntaxError`] at the raw cursor position.
    pub fn fail_here(&self, message: impl Into<String>) -> SyntaxError {
        self.cursor.fail(message)
    }

    /// Drain the remaining input into a vector of tokens.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn read_next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        loop {
            self.cursor.read_while(is_whitespace);

            let Some(ch) = self.cursor.peek() else {
                return Ok(None);
            };

            if ch == '#' {
                self.skip_comment();
                continue;
            }

            let start = self.cursor.position();
            let kind = if ch == '"' {
                self.read_string(start)?
            } else if ch.is_ascii_digit() {
                self.read_number(start)?
            } else if is_identifier_start(ch) {
                self.read_identifier()
            } else if is_punctuation(ch) {
                self.cursor.next();
                TokenKind::Punctuation(ch)
            } else if is_operator_char(ch) {
                TokenKind::Operator(self.cursor.read_while(is_operator_char))
            } else {
                return Err(self.cursor.fail(format!("illegal character '{}'", ch)));
            };

            let token = Token::new(kind, start);
            trace!(target: "rulelang::lexer", %token, line = start.line, column = start.column, "token");
            return Ok(Some(token));
        }
    }

    /// Skip a `#` comment through the end of the line, newline included
    fn skip_comment(&mut self) {
        self.cursor.read_while(|ch| ch != '\n');
        self.cursor.next();
    }

    fn read_string(&mut self, start: Position) -> Result<TokenKind, SyntaxError> {
        self.cursor.next(); // opening quote
        let mut value = String::new();
        let mut escaped = false;

        while let Some(ch) = self.cursor.next() {
            if escaped {
                value.push(ch);
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                return Ok(TokenKind::String(value));
            } else {
                value.push(ch);
            }
        }

        if self.options.strict_strings {
            Err(SyntaxError::new(start, "unterminated string literal"))
        } else {
            warn!(target: "rulelang::lexer", %start, "string literal runs to end of input");
            Ok(TokenKind::String(value))
        }
    }

    /// Digits with at most one `.`; a second `.` is left unread
    fn read_number(&mut self, start: Position) -> Result<TokenKind, SyntaxError> {
        let mut seen_dot = false;
        let text = self.cursor.read_while(|ch| {
            if ch == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
                true
            } else {
                ch.is_ascii_digit()
            }
        });

        let value = text
            .parse::<f64>()
            .map_err(|_| SyntaxError::new(start, format!("invalid number literal '{}'", text)))?;
        if !value.is_finite() {
            return Err(SyntaxError::new(start, "number literal out of range"));
        }
        Ok(TokenKind::Number(value))
    }

    fn read_identifier(&mut self) -> TokenKind {
        let word = self.cursor.read_while(is_identifier_char);
        match Keyword::from_word(&word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        TokenStream::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds("rule add(a, b) { a + b }");

        assert_eq!(tokens[0], TokenKind::Keyword(Keyword::Rule));
        assert_eq!(tokens[1], TokenKind::Identifier("add".into()));
        assert_eq!(tokens[2], TokenKind::Punctuation('('));
        assert_eq!(tokens[3], TokenKind::Identifier("a".into()));
        assert_eq!(tokens[4], TokenKind::Punctuation(','));
        assert_eq!(tokens[5], TokenKind::Identifier("b".into()));
        assert_eq!(tokens[6], TokenKind::Punctuation(')'));
        assert_eq!(tokens[7], TokenKind::Punctuation('{'));
        assert_eq!(tokens[8], TokenKind::Identifier("a".into()));
        assert_eq!(tokens[9], TokenKind::Operator("+".into()));
        assert_eq!(tokens[10], TokenKind::Identifier("b".into()));
        assert_eq!(tokens[11], TokenKind::Punctuation('}'));
        assert_eq!(tokens.len(), 12);
    }

    #[test]
    fn test_operators_are_greedy() {
        let tokens = kinds("== <= && || != +- =");
        let ops: Vec<_> = tokens
            .iter()
            .map(|k| match k {
                TokenKind::Operator(op) => op.as_str(),
                other => panic!("Expected operator, got {:?}", other),
            })
            .collect();
        assert_eq!(ops, ["==", "<=", "&&", "||", "!=", "+-", "="]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("3.14"), vec![TokenKind::Number(3.14)]);
        assert_eq!(kinds("42"), vec![TokenKind::Number(42.0)]);
        assert_eq!(kinds("7."), vec![TokenKind::Number(7.0)]);
    }

    #[test]
    fn test_second_dot_is_not_absorbed() {
        let mut stream = TokenStream::new("3.14.15");
        let first = stream.next().unwrap().unwrap();
        assert_eq!(first.kind, TokenKind::Number(3.14));

        // '.' belongs to no token class
        let err = stream.next().unwrap_err();
        assert_eq!(err.column(), 4);
        assert!(err.message().contains("illegal character '.'"));
    }

    #[test]
    fn test_number_out_of_range() {
        let source = format!("x = {}", "9".repeat(400));
        let err = TokenStream::new(&source).tokenize().unwrap_err();
        assert_eq!(err.message(), "number literal out of range");
        assert_eq!(err.column(), 4);
    }

    #[test]
    fn test_token_display() {
        let tokens = TokenStream::new("rule x \"s\" 2 <= ;").tokenize().unwrap();
        let shown: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            shown,
            [
                "keyword 'rule'",
                "identifier 'x'",
                "string \"s\"",
                "number 2",
                "operator '<='",
                "punctuation ';'"
            ]
        );
        assert!(tokens[4].is_operator("<="));
        assert!(!tokens[4].is_operator("<"));
    }

    #[test]
    fn test_keyword_maximal_munch() {
        assert_eq!(kinds("true"), vec![TokenKind::Keyword(Keyword::True)]);
        assert_eq!(kinds("truee"), vec![TokenKind::Identifier("truee".into())]);
        assert_eq!(kinds("conform"), vec![TokenKind::Keyword(Keyword::Conform)]);
    }

    #[test]
    fn test_identifier_chars() {
        assert_eq!(
            kinds("valid? set! kebab-case _x1"),
            vec![
                TokenKind::Identifier("valid?".into()),
                TokenKind::Identifier("set!".into()),
                TokenKind::Identifier("kebab-case".into()),
                TokenKind::Identifier("_x1".into()),
            ]
        );
    }

    #[test]
    fn test_comments() {
        let tokens = kinds("# leading\nx # trailing\n# only comment");
        assert_eq!(tokens, vec![TokenKind::Identifier("x".into())]);
    }

    #[test]
    fn test_string_literal_escapes() {
        let tokens = kinds(r#""say \"hi\" \\ \n""#);
        assert_eq!(tokens, vec![TokenKind::String(r#"say "hi" \ n"#.into())]);
    }

    #[test]
    fn test_unterminated_string_strict() {
        let err = TokenStream::new("x = \"abc").tokenize().unwrap_err();
        assert_eq!(err.message(), "unterminated string literal");
        assert_eq!((err.line(), err.column()), (1, 4));
    }

    #[test]
    fn test_unterminated_string_permissive() {
        let options = ParseOptions::default().permissive_strings();
        let tokens = TokenStream::with_options("\"abc", options).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String("abc".into()));
    }

    #[test]
    fn test_illegal_character_position() {
        let err = TokenStream::new("a\n  @").tokenize().unwrap_err();
        assert_eq!((err.line(), err.column()), (2, 2));
        assert_eq!(err.message(), "illegal character '@'");
    }

    #[test]
    fn test_peek_caches_one_token() {
        let mut stream = TokenStream::new("a b");
        let first = stream.peek().unwrap().unwrap() as *const Token;
        let second = stream.peek().unwrap().unwrap() as *const Token;
        assert!(std::ptr::eq(first, second));

        let taken = stream.next().unwrap().unwrap();
        assert_eq!(taken.kind, TokenKind::Identifier("a".into()));
        assert_eq!(
            stream.peek().unwrap().map(|t| t.kind.clone()),
            Some(TokenKind::Identifier("b".into()))
        );
        stream.next().unwrap();
        assert!(stream.eof().unwrap());
        assert!(stream.next().unwrap().is_none());
    }

    #[test]
    fn test_token_positions() {
        let tokens = TokenStream::new("foo\n  bar").tokenize().unwrap();
        assert_eq!(tokens[0].position, Position::new(1, 0));
        assert_eq!(tokens[1].position, Position::new(2, 2));
    }

    #[test]
    fn test_fail_reports_at_lookahead_token() {
        let mut stream = TokenStream::new("a   {");
        stream.next().unwrap();
        stream.peek().unwrap();
        let err = stream.fail("nope");
        assert_eq!(err.column(), 4);
        assert_eq!(stream.fail_here("nope").column(), 5);
    }

    #[test]
    fn test_whitespace_and_comments_only() {
        assert!(kinds("  \n\t# nothing here\n  ").is_empty());
    }
}
