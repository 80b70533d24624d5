//! Builder helpers for tree construction.
//!
//! Every helper appends a node bottom-up and returns its index, so nested
//! calls read like the JavaScript they build:
//!
//! ```
//! use objrest_ast::{DeclarationKind, NodeArena};
//!
//! let mut arena = NodeArena::new();
//! // const a = obj.a;
//! let obj = arena.ident("obj");
//! let init = arena.member(obj, "a");
//! let id = arena.ident("a");
//! let declarator = arena.declarator(id, init);
//! let decl = arena.var_declaration(DeclarationKind::Const, vec![declarator]);
//! let root = arena.program(vec![decl]);
//! assert_eq!(objrest_ast::Printer::print(&arena, root), "const a = obj.a;\n");
//! ```

use crate::arena::NodeArena;
use crate::node::{DeclarationKind, FunctionData, FunctionKind, Node, NodeIndex, PropertyData};

impl NodeArena {
    // =========================================================================
    // Literals and names
    // =========================================================================

    pub fn ident(&mut self, name: impl Into<String>) -> NodeIndex {
        self.add(Node::Identifier { name: name.into() })
    }

    pub fn string_literal(&mut self, value: impl Into<String>) -> NodeIndex {
        self.add(Node::StringLiteral {
            value: value.into(),
        })
    }

    pub fn number(&mut self, raw: impl Into<String>) -> NodeIndex {
        self.add(Node::NumericLiteral { raw: raw.into() })
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.add(Node::BooleanLiteral { value })
    }

    pub fn null(&mut self) -> NodeIndex {
        self.add(Node::NullLiteral)
    }

    /// `void 0`
    pub fn void_0(&mut self) -> NodeIndex {
        let zero = self.number("0");
        self.unary("void", zero)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// `object.name`
    pub fn member(&mut self, object: NodeIndex, name: &str) -> NodeIndex {
        let property = self.ident(name);
        self.add(Node::MemberExpression {
            object,
            property,
            computed: false,
        })
    }

    /// `object[index]`
    pub fn computed_member(&mut self, object: NodeIndex, index: NodeIndex) -> NodeIndex {
        self.add(Node::MemberExpression {
            object,
            property: index,
            computed: true,
        })
    }

    pub fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::CallExpression { callee, arguments })
    }

    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::ArrayExpression { elements })
    }

    pub fn object(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::ObjectExpression { properties })
    }

    /// `name: value` with a plain identifier key.
    pub fn property(&mut self, name: &str, value: NodeIndex) -> NodeIndex {
        let key = self.ident(name);
        self.add(Node::Property(PropertyData {
            key,
            value,
            computed: false,
            shorthand: false,
        }))
    }

    /// `name` (shorthand). In a pattern this binds `name`.
    pub fn shorthand(&mut self, name: &str) -> NodeIndex {
        let key = self.ident(name);
        let value = self.ident(name);
        self.add(Node::Property(PropertyData {
            key,
            value,
            computed: false,
            shorthand: true,
        }))
    }

    /// `name = default` (shorthand with default, patterns only).
    pub fn shorthand_with_default(&mut self, name: &str, default: NodeIndex) -> NodeIndex {
        let key = self.ident(name);
        let target = self.ident(name);
        let value = self.assignment_pattern(target, default);
        self.add(Node::Property(PropertyData {
            key,
            value,
            computed: false,
            shorthand: true,
        }))
    }

    /// `[key]: value`
    pub fn computed_property(&mut self, key: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.add(Node::Property(PropertyData {
            key,
            value,
            computed: true,
            shorthand: false,
        }))
    }

    /// `key: value` with an arbitrary non-computed key node (string or number).
    pub fn keyed_property(&mut self, key: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.add(Node::Property(PropertyData {
            key,
            value,
            computed: false,
            shorthand: false,
        }))
    }

    pub fn spread(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add(Node::SpreadElement { argument })
    }

    pub fn assign(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(Node::AssignmentExpression {
            operator: "=".to_string(),
            left,
            right,
        })
    }

    pub fn binary(&mut self, left: NodeIndex, operator: &str, right: NodeIndex) -> NodeIndex {
        self.add(Node::BinaryExpression {
            operator: operator.to_string(),
            left,
            right,
        })
    }

    pub fn conditional(
        &mut self,
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    ) -> NodeIndex {
        self.add(Node::ConditionalExpression {
            test,
            consequent,
            alternate,
        })
    }

    pub fn unary(&mut self, operator: &str, argument: NodeIndex) -> NodeIndex {
        self.add(Node::UnaryExpression {
            operator: operator.to_string(),
            argument,
        })
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    pub fn object_pattern(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::ObjectPattern { properties })
    }

    pub fn array_pattern(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::ArrayPattern { elements })
    }

    pub fn rest(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add(Node::RestElement { argument })
    }

    /// `...name`
    pub fn rest_ident(&mut self, name: &str) -> NodeIndex {
        let argument = self.ident(name);
        self.rest(argument)
    }

    pub fn assignment_pattern(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(Node::AssignmentPattern { left, right })
    }

    // =========================================================================
    // Statements and declarations
    // =========================================================================

    pub fn program(&mut self, body: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::Program { body })
    }

    pub fn block(&mut self, body: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::BlockStatement { body })
    }

    pub fn expr_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(Node::ExpressionStatement { expression })
    }

    pub fn ret(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add(Node::ReturnStatement { argument })
    }

    pub fn declarator(&mut self, id: NodeIndex, init: NodeIndex) -> NodeIndex {
        self.add(Node::VariableDeclarator { id, init })
    }

    pub fn var_declaration(
        &mut self,
        kind: DeclarationKind,
        declarations: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.add(Node::VariableDeclaration { kind, declarations })
    }

    /// `function name(params) { body }`
    pub fn function_decl(
        &mut self,
        name: &str,
        params: Vec<NodeIndex>,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.ident(name);
        let body = self.block(body);
        self.add(Node::Function(FunctionData {
            name,
            params,
            body,
            kind: FunctionKind::Declaration,
        }))
    }

    /// `function (params) { body }`
    pub fn function_expr(&mut self, params: Vec<NodeIndex>, body: Vec<NodeIndex>) -> NodeIndex {
        let body = self.block(body);
        self.add(Node::Function(FunctionData {
            name: NodeIndex::NONE,
            params,
            body,
            kind: FunctionKind::Expression,
        }))
    }

    /// `(params) => body`, where `body` is a block or a concise expression.
    pub fn arrow(&mut self, params: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.add(Node::Function(FunctionData {
            name: NodeIndex::NONE,
            params,
            body,
            kind: FunctionKind::Arrow,
        }))
    }
}
