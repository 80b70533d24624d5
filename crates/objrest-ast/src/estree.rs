//! ESTree JSON loader.
//!
//! Accepts the ESTree shapes produced by common JavaScript parsers, plus the
//! Babel spellings of the same nodes (`File`, `ObjectProperty`,
//! `RestProperty`, `SpreadProperty`, typed literals). Anything outside the
//! node set of [`Node`] is rejected with the offending `type` in the message.

use crate::arena::NodeArena;
use crate::node::{DeclarationKind, FunctionData, FunctionKind, Node, NodeIndex, PropertyData};
use serde::Deserialize;
use std::fmt;

#[derive(Debug)]
pub enum EstreeError {
    Json(serde_json::Error),
    /// The document root is not a `Program` (or a Babel `File` wrapping one).
    NotAProgram(String),
    /// A `Literal` whose value has no counterpart in the tree (regex, bigint).
    UnsupportedLiteral(String),
}

impl fmt::Display for EstreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstreeError::Json(err) => write!(f, "invalid ESTree JSON: {err}"),
            EstreeError::NotAProgram(kind) => {
                write!(f, "expected a Program at the document root, found {kind}")
            }
            EstreeError::UnsupportedLiteral(value) => {
                write!(f, "unsupported literal value {value}")
            }
        }
    }
}

impl std::error::Error for EstreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EstreeError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EstreeError {
    fn from(err: serde_json::Error) -> Self {
        EstreeError::Json(err)
    }
}

type Child = Box<EstreeNode>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum EstreeNode {
    File {
        program: Child,
    },
    Program {
        body: Vec<EstreeNode>,
    },
    BlockStatement {
        body: Vec<EstreeNode>,
    },
    ExpressionStatement {
        expression: Child,
    },
    ReturnStatement {
        #[serde(default)]
        argument: Option<Child>,
    },
    VariableDeclaration {
        kind: DeclarationKind,
        declarations: Vec<EstreeNode>,
    },
    VariableDeclarator {
        id: Child,
        #[serde(default)]
        init: Option<Child>,
    },
    FunctionDeclaration {
        #[serde(default)]
        id: Option<Child>,
        params: Vec<EstreeNode>,
        body: Child,
    },
    FunctionExpression {
        #[serde(default)]
        id: Option<Child>,
        params: Vec<EstreeNode>,
        body: Child,
    },
    ArrowFunctionExpression {
        params: Vec<EstreeNode>,
        body: Child,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: serde_json::Value,
        #[serde(default)]
        raw: Option<String>,
    },
    StringLiteral {
        value: String,
    },
    NumericLiteral {
        value: serde_json::Number,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral {},
    ArrayExpression {
        elements: Vec<Option<EstreeNode>>,
    },
    ObjectExpression {
        properties: Vec<EstreeNode>,
    },
    #[serde(alias = "ObjectProperty")]
    Property {
        key: Child,
        value: Child,
        #[serde(default)]
        computed: bool,
        #[serde(default)]
        shorthand: bool,
    },
    #[serde(alias = "SpreadProperty")]
    SpreadElement {
        argument: Child,
    },
    MemberExpression {
        object: Child,
        property: Child,
        #[serde(default)]
        computed: bool,
    },
    CallExpression {
        callee: Child,
        arguments: Vec<EstreeNode>,
    },
    AssignmentExpression {
        operator: String,
        left: Child,
        right: Child,
    },
    #[serde(alias = "LogicalExpression")]
    BinaryExpression {
        operator: String,
        left: Child,
        right: Child,
    },
    ConditionalExpression {
        test: Child,
        consequent: Child,
        alternate: Child,
    },
    UnaryExpression {
        operator: String,
        argument: Child,
    },
    ObjectPattern {
        properties: Vec<EstreeNode>,
    },
    ArrayPattern {
        elements: Vec<Option<EstreeNode>>,
    },
    #[serde(alias = "RestProperty")]
    RestElement {
        argument: Child,
    },
    AssignmentPattern {
        left: Child,
        right: Child,
    },
}

impl EstreeNode {
    fn type_name(&self) -> &'static str {
        match self {
            EstreeNode::File { .. } => "File",
            EstreeNode::Program { .. } => "Program",
            EstreeNode::BlockStatement { .. } => "BlockStatement",
            EstreeNode::ExpressionStatement { .. } => "ExpressionStatement",
            EstreeNode::ReturnStatement { .. } => "ReturnStatement",
            EstreeNode::VariableDeclaration { .. } => "VariableDeclaration",
            EstreeNode::VariableDeclarator { .. } => "VariableDeclarator",
            EstreeNode::FunctionDeclaration { .. } => "FunctionDeclaration",
            EstreeNode::FunctionExpression { .. } => "FunctionExpression",
            EstreeNode::ArrowFunctionExpression { .. } => "ArrowFunctionExpression",
            EstreeNode::Identifier { .. } => "Identifier",
            EstreeNode::Literal { .. }
            | EstreeNode::StringLiteral { .. }
            | EstreeNode::NumericLiteral { .. }
            | EstreeNode::BooleanLiteral { .. }
            | EstreeNode::NullLiteral {} => "Literal",
            EstreeNode::ArrayExpression { .. } => "ArrayExpression",
            EstreeNode::ObjectExpression { .. } => "ObjectExpression",
            EstreeNode::Property { .. } => "Property",
            EstreeNode::SpreadElement { .. } => "SpreadElement",
            EstreeNode::MemberExpression { .. } => "MemberExpression",
            EstreeNode::CallExpression { .. } => "CallExpression",
            EstreeNode::AssignmentExpression { .. } => "AssignmentExpression",
            EstreeNode::BinaryExpression { .. } => "BinaryExpression",
            EstreeNode::ConditionalExpression { .. } => "ConditionalExpression",
            EstreeNode::UnaryExpression { .. } => "UnaryExpression",
            EstreeNode::ObjectPattern { .. } => "ObjectPattern",
            EstreeNode::ArrayPattern { .. } => "ArrayPattern",
            EstreeNode::RestElement { .. } => "RestElement",
            EstreeNode::AssignmentPattern { .. } => "AssignmentPattern",
        }
    }
}

/// Parse an ESTree program from JSON text into a fresh arena.
pub fn load_program(json: &str) -> Result<(NodeArena, NodeIndex), EstreeError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    load_program_value(value)
}

/// Lower an already-parsed ESTree JSON document into a fresh arena.
pub fn load_program_value(value: serde_json::Value) -> Result<(NodeArena, NodeIndex), EstreeError> {
    let mut node = EstreeNode::deserialize(value)?;
    if let EstreeNode::File { program } = node {
        node = *program;
    }
    if !matches!(node, EstreeNode::Program { .. }) {
        return Err(EstreeError::NotAProgram(node.type_name().to_string()));
    }
    let mut arena = NodeArena::new();
    let root = lower(&mut arena, node)?;
    tracing::debug!(nodes = arena.len(), "[estree] loaded program");
    Ok((arena, root))
}

fn lower(arena: &mut NodeArena, node: EstreeNode) -> Result<NodeIndex, EstreeError> {
    let lowered = match node {
        EstreeNode::File { program } => return lower(arena, *program),
        EstreeNode::Program { body } => Node::Program {
            body: lower_all(arena, body)?,
        },
        EstreeNode::BlockStatement { body } => Node::BlockStatement {
            body: lower_all(arena, body)?,
        },
        EstreeNode::ExpressionStatement { expression } => Node::ExpressionStatement {
            expression: lower(arena, *expression)?,
        },
        EstreeNode::ReturnStatement { argument } => Node::ReturnStatement {
            argument: lower_opt(arena, argument)?,
        },
        EstreeNode::VariableDeclaration { kind, declarations } => Node::VariableDeclaration {
            kind,
            declarations: lower_all(arena, declarations)?,
        },
        EstreeNode::VariableDeclarator { id, init } => Node::VariableDeclarator {
            id: lower(arena, *id)?,
            init: lower_opt(arena, init)?,
        },
        EstreeNode::FunctionDeclaration { id, params, body } => {
            lower_function(arena, id, params, *body, FunctionKind::Declaration)?
        }
        EstreeNode::FunctionExpression { id, params, body } => {
            lower_function(arena, id, params, *body, FunctionKind::Expression)?
        }
        EstreeNode::ArrowFunctionExpression { params, body } => {
            lower_function(arena, None, params, *body, FunctionKind::Arrow)?
        }
        EstreeNode::Identifier { name } => Node::Identifier { name },
        EstreeNode::Literal { value, raw } => lower_literal(value, raw)?,
        EstreeNode::StringLiteral { value } => Node::StringLiteral { value },
        EstreeNode::NumericLiteral { value } => Node::NumericLiteral {
            raw: number_text(&value),
        },
        EstreeNode::BooleanLiteral { value } => Node::BooleanLiteral { value },
        EstreeNode::NullLiteral {} => Node::NullLiteral,
        EstreeNode::ArrayExpression { elements } => Node::ArrayExpression {
            elements: lower_holes(arena, elements)?,
        },
        EstreeNode::ObjectExpression { properties } => Node::ObjectExpression {
            properties: lower_all(arena, properties)?,
        },
        EstreeNode::Property {
            key,
            value,
            computed,
            shorthand,
        } => Node::Property(PropertyData {
            key: lower(arena, *key)?,
            value: lower(arena, *value)?,
            computed,
            shorthand,
        }),
        EstreeNode::SpreadElement { argument } => Node::SpreadElement {
            argument: lower(arena, *argument)?,
        },
        EstreeNode::MemberExpression {
            object,
            property,
            computed,
        } => Node::MemberExpression {
            object: lower(arena, *object)?,
            property: lower(arena, *property)?,
            computed,
        },
        EstreeNode::CallExpression { callee, arguments } => Node::CallExpression {
            callee: lower(arena, *callee)?,
            arguments: lower_all(arena, arguments)?,
        },
        EstreeNode::AssignmentExpression {
            operator,
            left,
            right,
        } => Node::AssignmentExpression {
            operator,
            left: lower(arena, *left)?,
            right: lower(arena, *right)?,
        },
        EstreeNode::BinaryExpression {
            operator,
            left,
            right,
        } => Node::BinaryExpression {
            operator,
            left: lower(arena, *left)?,
            right: lower(arena, *right)?,
        },
        EstreeNode::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => Node::ConditionalExpression {
            test: lower(arena, *test)?,
            consequent: lower(arena, *consequent)?,
            alternate: lower(arena, *alternate)?,
        },
        EstreeNode::UnaryExpression { operator, argument } => Node::UnaryExpression {
            operator,
            argument: lower(arena, *argument)?,
        },
        EstreeNode::ObjectPattern { properties } => Node::ObjectPattern {
            properties: lower_all(arena, properties)?,
        },
        EstreeNode::ArrayPattern { elements } => Node::ArrayPattern {
            elements: lower_holes(arena, elements)?,
        },
        EstreeNode::RestElement { argument } => Node::RestElement {
            argument: lower(arena, *argument)?,
        },
        EstreeNode::AssignmentPattern { left, right } => Node::AssignmentPattern {
            left: lower(arena, *left)?,
            right: lower(arena, *right)?,
        },
    };
    Ok(arena.add(lowered))
}

fn lower_all(arena: &mut NodeArena, nodes: Vec<EstreeNode>) -> Result<Vec<NodeIndex>, EstreeError> {
    nodes.into_iter().map(|node| lower(arena, node)).collect()
}

fn lower_opt(arena: &mut NodeArena, node: Option<Child>) -> Result<NodeIndex, EstreeError> {
    match node {
        Some(node) => lower(arena, *node),
        None => Ok(NodeIndex::NONE),
    }
}

fn lower_holes(
    arena: &mut NodeArena,
    nodes: Vec<Option<EstreeNode>>,
) -> Result<Vec<NodeIndex>, EstreeError> {
    nodes
        .into_iter()
        .map(|node| match node {
            Some(node) => lower(arena, node),
            None => Ok(NodeIndex::NONE),
        })
        .collect()
}

fn lower_function(
    arena: &mut NodeArena,
    id: Option<Child>,
    params: Vec<EstreeNode>,
    body: EstreeNode,
    kind: FunctionKind,
) -> Result<Node, EstreeError> {
    Ok(Node::Function(FunctionData {
        name: lower_opt(arena, id)?,
        params: lower_all(arena, params)?,
        body: lower(arena, body)?,
        kind,
    }))
}

fn lower_literal(value: serde_json::Value, raw: Option<String>) -> Result<Node, EstreeError> {
    match value {
        serde_json::Value::String(value) => Ok(Node::StringLiteral { value }),
        serde_json::Value::Number(number) => Ok(Node::NumericLiteral {
            raw: raw.unwrap_or_else(|| number_text(&number)),
        }),
        serde_json::Value::Bool(value) => Ok(Node::BooleanLiteral { value }),
        serde_json::Value::Null if raw.as_deref().is_none_or(|raw| raw == "null") => {
            Ok(Node::NullLiteral)
        }
        other => Err(EstreeError::UnsupportedLiteral(
            raw.unwrap_or_else(|| other.to_string()),
        )),
    }
}

/// Source text for a JSON number: integral floats print without `.0`.
fn number_text(number: &serde_json::Number) -> String {
    let text = number.to_string();
    match text.strip_suffix(".0") {
        Some(integral) => integral.to_string(),
        None => text,
    }
}
