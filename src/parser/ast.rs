// AST (Abstract Syntax Tree) definitions for rule programs

use serde::Serialize;

/// AST nodes for expressions and declarations.
///
/// Serializes as a tagged tree: every node is an object whose `type` field
/// names the variant and whose remaining fields are the variant's fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Two or more statements between braces
    Block { body: Vec<Node> },
    Call { callee: Box<Node>, args: Vec<Node> },
    /// `rule [name](params) { body }`; `name` is `None` for anonymous rules
    Rule {
        name: Option<String>,
        params: Vec<String>,
        body: Box<Node>,
    },
    #[serde(rename = "binary")]
    BinaryExpr {
        op: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    Assign { left: Box<Node>, right: Box<Node> },
    #[serde(rename = "bool")]
    BoolLiteral { value: bool },

    // Leaf tokens
    Number { value: f64 },
    String { value: String },
    Identifier { value: String },
}

impl Node {
    pub fn number(value: f64) -> Self {
        Node::Number { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::String {
            value: value.into(),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier { value: name.into() }
    }

    pub fn boolean(value: bool) -> Self {
        Node::BoolLiteral { value }
    }

    pub fn binary(op: impl Into<String>, left: Node, right: Node) -> Self {
        Node::BinaryExpr {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn assign(left: Node, right: Node) -> Self {
        Node::Assign {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(callee: Node, args: Vec<Node>) -> Self {
        Node::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn rule(name: Option<&str>, params: &[&str], body: Node) -> Self {
        Node::Rule {
            name: name.map(str::to_string),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Box::new(body),
        }
    }

    /// Variant tag as it appears in serialized output
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Block { .. } => "block",
            Node::Call { .. } => "call",
            Node::Rule { .. } => "rule",
            Node::BinaryExpr { .. } => "binary",
            Node::Assign { .. } => "assign",
            Node::BoolLiteral { .. } => "bool",
            Node::Number { .. } => "number",
            Node::String { .. } => "string",
            Node::Identifier { .. } => "identifier",
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Program {
    pub nodes: Vec<Node>, // Top-level statements in source order
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
