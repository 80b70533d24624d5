//! Node definitions.
//!
//! The tree is a closed set of node kinds: exactly the shapes the object
//! rest/spread pass and its delegated destructuring lowering inspect or
//! produce. Children are referenced by [`NodeIndex`] into a
//! [`NodeArena`](crate::NodeArena); `NodeIndex::NONE` marks an absent child
//! (anonymous function name, missing initializer, array hole).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Stable index of a node inside a [`NodeArena`](crate::NodeArena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionData {
    /// Binding identifier, `NONE` when anonymous.
    pub name: NodeIndex,
    pub params: Vec<NodeIndex>,
    /// A `BlockStatement`, or any expression for a concise arrow body.
    pub body: NodeIndex,
    pub kind: FunctionKind,
}

/// Object literal or object pattern member: `key: value`, `[key]: value`, `key`.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyData {
    pub key: NodeIndex,
    pub value: NodeIndex,
    pub computed: bool,
    pub shorthand: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Program {
        body: Vec<NodeIndex>,
    },
    BlockStatement {
        body: Vec<NodeIndex>,
    },
    ExpressionStatement {
        expression: NodeIndex,
    },
    ReturnStatement {
        argument: NodeIndex,
    },
    VariableDeclaration {
        kind: DeclarationKind,
        declarations: Vec<NodeIndex>,
    },
    VariableDeclarator {
        id: NodeIndex,
        init: NodeIndex,
    },
    Function(FunctionData),
    Identifier {
        name: String,
    },
    StringLiteral {
        value: String,
    },
    /// Numeric literal, kept as its source text.
    NumericLiteral {
        raw: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    ArrayExpression {
        elements: Vec<NodeIndex>,
    },
    /// Entries are `Property` or `SpreadElement`.
    ObjectExpression {
        properties: Vec<NodeIndex>,
    },
    Property(PropertyData),
    SpreadElement {
        argument: NodeIndex,
    },
    MemberExpression {
        object: NodeIndex,
        property: NodeIndex,
        computed: bool,
    },
    CallExpression {
        callee: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    AssignmentExpression {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    BinaryExpression {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    ConditionalExpression {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    UnaryExpression {
        operator: String,
        argument: NodeIndex,
    },
    /// Entries are `Property` or a trailing `RestElement`.
    ObjectPattern {
        properties: Vec<NodeIndex>,
    },
    ArrayPattern {
        elements: Vec<NodeIndex>,
    },
    RestElement {
        argument: NodeIndex,
    },
    AssignmentPattern {
        left: NodeIndex,
        right: NodeIndex,
    },
}

/// Fieldless mirror of [`Node`] used for dispatch and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    BlockStatement,
    ExpressionStatement,
    ReturnStatement,
    VariableDeclaration,
    VariableDeclarator,
    Function,
    Identifier,
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NullLiteral,
    ArrayExpression,
    ObjectExpression,
    Property,
    SpreadElement,
    MemberExpression,
    CallExpression,
    AssignmentExpression,
    BinaryExpression,
    ConditionalExpression,
    UnaryExpression,
    ObjectPattern,
    ArrayPattern,
    RestElement,
    AssignmentPattern,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program { .. } => NodeKind::Program,
            Node::BlockStatement { .. } => NodeKind::BlockStatement,
            Node::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            Node::ReturnStatement { .. } => NodeKind::ReturnStatement,
            Node::VariableDeclaration { .. } => NodeKind::VariableDeclaration,
            Node::VariableDeclarator { .. } => NodeKind::VariableDeclarator,
            Node::Function(_) => NodeKind::Function,
            Node::Identifier { .. } => NodeKind::Identifier,
            Node::StringLiteral { .. } => NodeKind::StringLiteral,
            Node::NumericLiteral { .. } => NodeKind::NumericLiteral,
            Node::BooleanLiteral { .. } => NodeKind::BooleanLiteral,
            Node::NullLiteral => NodeKind::NullLiteral,
            Node::ArrayExpression { .. } => NodeKind::ArrayExpression,
            Node::ObjectExpression { .. } => NodeKind::ObjectExpression,
            Node::Property(_) => NodeKind::Property,
            Node::SpreadElement { .. } => NodeKind::SpreadElement,
            Node::MemberExpression { .. } => NodeKind::MemberExpression,
            Node::CallExpression { .. } => NodeKind::CallExpression,
            Node::AssignmentExpression { .. } => NodeKind::AssignmentExpression,
            Node::BinaryExpression { .. } => NodeKind::BinaryExpression,
            Node::ConditionalExpression { .. } => NodeKind::ConditionalExpression,
            Node::UnaryExpression { .. } => NodeKind::UnaryExpression,
            Node::ObjectPattern { .. } => NodeKind::ObjectPattern,
            Node::ArrayPattern { .. } => NodeKind::ArrayPattern,
            Node::RestElement { .. } => NodeKind::RestElement,
            Node::AssignmentPattern { .. } => NodeKind::AssignmentPattern,
        }
    }

    /// Present children in source order.
    pub fn children(&self) -> SmallVec<[NodeIndex; 4]> {
        let mut out = SmallVec::new();
        self.for_each_child(|child| {
            if child.is_some() {
                out.push(child);
            }
        });
        out
    }

    fn for_each_child(&self, mut f: impl FnMut(NodeIndex)) {
        match self {
            Node::Program { body } | Node::BlockStatement { body } => body.iter().for_each(|&c| f(c)),
            Node::ExpressionStatement { expression } => f(*expression),
            Node::ReturnStatement { argument }
            | Node::SpreadElement { argument }
            | Node::RestElement { argument }
            | Node::UnaryExpression { argument, .. } => f(*argument),
            Node::VariableDeclaration { declarations, .. } => {
                declarations.iter().for_each(|&c| f(c));
            }
            Node::VariableDeclarator { id, init } => {
                f(*id);
                f(*init);
            }
            Node::Function(func) => {
                f(func.name);
                func.params.iter().for_each(|&c| f(c));
                f(func.body);
            }
            Node::ArrayExpression { elements } | Node::ArrayPattern { elements } => {
                elements.iter().for_each(|&c| f(c));
            }
            Node::ObjectExpression { properties } | Node::ObjectPattern { properties } => {
                properties.iter().for_each(|&c| f(c));
            }
            Node::Property(prop) => {
                f(prop.key);
                f(prop.value);
            }
            Node::MemberExpression {
                object, property, ..
            } => {
                f(*object);
                f(*property);
            }
            Node::CallExpression { callee, arguments } => {
                f(*callee);
                arguments.iter().for_each(|&c| f(c));
            }
            Node::AssignmentExpression { left, right, .. }
            | Node::BinaryExpression { left, right, .. }
            | Node::AssignmentPattern { left, right } => {
                f(*left);
                f(*right);
            }
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                f(*test);
                f(*consequent);
                f(*alternate);
            }
            Node::Identifier { .. }
            | Node::StringLiteral { .. }
            | Node::NumericLiteral { .. }
            | Node::BooleanLiteral { .. }
            | Node::NullLiteral => {}
        }
    }

    /// Every child slot, including `NONE` slots, in source order.
    pub(crate) fn child_slots_mut(&mut self) -> Vec<&mut NodeIndex> {
        match self {
            Node::Program { body } | Node::BlockStatement { body } => body.iter_mut().collect(),
            Node::ExpressionStatement { expression } => vec![expression],
            Node::ReturnStatement { argument }
            | Node::SpreadElement { argument }
            | Node::RestElement { argument }
            | Node::UnaryExpression { argument, .. } => vec![argument],
            Node::VariableDeclaration { declarations, .. } => declarations.iter_mut().collect(),
            Node::VariableDeclarator { id, init } => vec![id, init],
            Node::Function(func) => {
                let mut slots: Vec<&mut NodeIndex> = vec![&mut func.name];
                slots.extend(func.params.iter_mut());
                slots.push(&mut func.body);
                slots
            }
            Node::ArrayExpression { elements } | Node::ArrayPattern { elements } => {
                elements.iter_mut().collect()
            }
            Node::ObjectExpression { properties } | Node::ObjectPattern { properties } => {
                properties.iter_mut().collect()
            }
            Node::Property(prop) => vec![&mut prop.key, &mut prop.value],
            Node::MemberExpression {
                object, property, ..
            } => vec![object, property],
            Node::CallExpression { callee, arguments } => {
                let mut slots: Vec<&mut NodeIndex> = vec![callee];
                slots.extend(arguments.iter_mut());
                slots
            }
            Node::AssignmentExpression { left, right, .. }
            | Node::BinaryExpression { left, right, .. }
            | Node::AssignmentPattern { left, right } => vec![left, right],
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => vec![test, consequent, alternate],
            Node::Identifier { .. }
            | Node::StringLiteral { .. }
            | Node::NumericLiteral { .. }
            | Node::BooleanLiteral { .. }
            | Node::NullLiteral => Vec::new(),
        }
    }

    /// The single ordered child list of a node, if it has one.
    ///
    /// Function nodes expose their parameter list and call expressions their
    /// argument list; the fixed slots next to those lists are not part of it.
    pub(crate) fn child_list_mut(&mut self) -> Option<&mut Vec<NodeIndex>> {
        match self {
            Node::Program { body } | Node::BlockStatement { body } => Some(body),
            Node::VariableDeclaration { declarations, .. } => Some(declarations),
            Node::Function(func) => Some(&mut func.params),
            Node::ArrayExpression { elements } | Node::ArrayPattern { elements } => Some(elements),
            Node::ObjectExpression { properties } | Node::ObjectPattern { properties } => {
                Some(properties)
            }
            Node::CallExpression { arguments, .. } => Some(arguments),
            _ => None,
        }
    }

    /// Lists where removing an entry must leave a hole to keep positions stable.
    pub(crate) fn has_positional_list(&self) -> bool {
        matches!(self, Node::ArrayExpression { .. } | Node::ArrayPattern { .. })
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Node::ObjectPattern { .. } | Node::ArrayPattern { .. })
    }

    pub fn is_statement_list(&self) -> bool {
        matches!(self, Node::Program { .. } | Node::BlockStatement { .. })
    }
}
