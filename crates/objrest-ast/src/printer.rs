//! JavaScript printer for arena trees.
//!
//! Output is deterministic: four-space indentation, one statement per line,
//! `{ a: 1 }` object spacing and `{}` for empty objects and blocks. Parentheses
//! are inserted only where precedence or statement position requires them.

use crate::arena::NodeArena;
use crate::node::{FunctionData, FunctionKind, Node, NodeIndex, NodeKind};
use std::fmt::Write;

mod prec {
    pub(super) const ASSIGNMENT: u8 = 2;
    pub(super) const CONDITIONAL: u8 = 3;
    pub(super) const UNARY: u8 = 15;
    pub(super) const CALL: u8 = 18;
    pub(super) const PRIMARY: u8 = 20;
}

pub struct Printer<'a> {
    arena: &'a NodeArena,
    output: String,
    indent_level: u32,
    indent_str: &'static str,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        Printer {
            arena,
            output: String::new(),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Print `root`: a program or statement as statement text (each line
    /// ending in a newline), anything else as a bare expression.
    pub fn print(arena: &NodeArena, root: NodeIndex) -> String {
        let mut printer = Printer::new(arena);
        printer.emit_root(root);
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn emit_root(&mut self, root: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(root) else {
            return;
        };
        match node {
            Node::Program { body } => {
                for &stmt in body {
                    self.write_indent();
                    self.emit_statement(stmt);
                    self.write_line();
                }
            }
            _ if is_statement(node) => {
                self.emit_statement(root);
                self.write_line();
            }
            _ => self.emit_expression(root, 0),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn emit_statement(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            self.write(";");
            return;
        };
        match node {
            Node::Program { body } | Node::BlockStatement { body } => self.emit_block(body),
            Node::ExpressionStatement { expression } => {
                if self.starts_ambiguously(*expression) {
                    self.write("(");
                    self.emit_expression(*expression, 0);
                    self.write(")");
                } else {
                    self.emit_expression(*expression, 0);
                }
                self.write(";");
            }
            Node::ReturnStatement { argument } => {
                self.write("return");
                if argument.is_some() {
                    self.write(" ");
                    self.emit_expression(*argument, 0);
                }
                self.write(";");
            }
            Node::VariableDeclaration { kind, declarations } => {
                self.write(kind.as_str());
                self.write(" ");
                for (i, &decl) in declarations.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_declarator(decl);
                }
                self.write(";");
            }
            Node::Function(func) if func.kind == FunctionKind::Declaration => {
                self.emit_function(func);
            }
            _ => {
                self.emit_expression(idx, 0);
                self.write(";");
            }
        }
    }

    fn emit_block(&mut self, body: &[NodeIndex]) {
        if body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for &stmt in body {
            self.write_indent();
            self.emit_statement(stmt);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_declarator(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        match arena.get(idx) {
            Some(Node::VariableDeclarator { id, init }) => {
                self.emit_expression(*id, prec::ASSIGNMENT);
                if init.is_some() {
                    self.write(" = ");
                    self.emit_expression(*init, prec::ASSIGNMENT);
                }
            }
            _ => self.emit_expression(idx, prec::ASSIGNMENT),
        }
    }

    fn emit_function(&mut self, func: &FunctionData) {
        let arena = self.arena;
        if func.kind == FunctionKind::Arrow {
            self.write("(");
            self.emit_list(&func.params);
            self.write(") => ");
            match arena.get(func.body) {
                Some(Node::BlockStatement { body }) => self.emit_block(body),
                _ => {
                    if self.starts_with_object(func.body) {
                        self.write("(");
                        self.emit_expression(func.body, 0);
                        self.write(")");
                    } else {
                        self.emit_expression(func.body, prec::ASSIGNMENT);
                    }
                }
            }
            return;
        }
        self.write("function ");
        if let Some(name) = arena.identifier_text(func.name) {
            self.write(name);
        }
        self.write("(");
        self.emit_list(&func.params);
        self.write(") ");
        match arena.get(func.body) {
            Some(Node::BlockStatement { body }) => self.emit_block(body),
            _ => self.write("{}"),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Emit `idx`, wrapping it in parentheses when it binds looser than `min`.
    fn emit_expression(&mut self, idx: NodeIndex, min: u8) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        if precedence(node) < min {
            self.write("(");
            self.emit_node(node);
            self.write(")");
        } else {
            self.emit_node(node);
        }
    }

    fn emit_node(&mut self, node: &Node) {
        match node {
            Node::Identifier { name } => self.write(name),
            Node::StringLiteral { value } => {
                self.write("\"");
                self.write_escaped(value);
                self.write("\"");
            }
            Node::NumericLiteral { raw } => self.write(raw),
            Node::BooleanLiteral { value } => self.write(if *value { "true" } else { "false" }),
            Node::NullLiteral => self.write("null"),
            Node::ArrayExpression { elements } | Node::ArrayPattern { elements } => {
                self.write("[");
                for (i, &element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expression(element, prec::ASSIGNMENT);
                }
                if elements.last().is_some_and(|last| last.is_none()) {
                    self.write(",");
                }
                self.write("]");
            }
            Node::ObjectExpression { properties } | Node::ObjectPattern { properties } => {
                if properties.is_empty() {
                    self.write("{}");
                } else {
                    self.write("{ ");
                    self.emit_list(properties);
                    self.write(" }");
                }
            }
            Node::Property(prop) => {
                if prop.shorthand {
                    self.emit_expression(prop.value, prec::ASSIGNMENT);
                    return;
                }
                if prop.computed {
                    self.write("[");
                    self.emit_expression(prop.key, prec::ASSIGNMENT);
                    self.write("]");
                } else {
                    self.emit_expression(prop.key, prec::PRIMARY);
                }
                self.write(": ");
                self.emit_expression(prop.value, prec::ASSIGNMENT);
            }
            Node::SpreadElement { argument } | Node::RestElement { argument } => {
                self.write("...");
                self.emit_expression(*argument, prec::ASSIGNMENT);
            }
            Node::MemberExpression {
                object,
                property,
                computed,
            } => {
                self.emit_expression(*object, prec::CALL);
                if *computed {
                    self.write("[");
                    self.emit_expression(*property, 0);
                    self.write("]");
                } else {
                    self.write(".");
                    self.emit_expression(*property, prec::PRIMARY);
                }
            }
            Node::CallExpression { callee, arguments } => {
                self.emit_expression(*callee, prec::CALL);
                self.write("(");
                self.emit_list(arguments);
                self.write(")");
            }
            Node::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                self.emit_expression(*left, prec::CALL);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expression(*right, prec::ASSIGNMENT);
            }
            Node::BinaryExpression {
                operator,
                left,
                right,
            } => {
                let level = binary_precedence(operator);
                let (left_min, right_min) = if operator == "**" {
                    (level + 1, level)
                } else {
                    (level, level + 1)
                };
                self.emit_expression(*left, left_min);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expression(*right, right_min);
            }
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.emit_expression(*test, prec::CONDITIONAL + 1);
                self.write(" ? ");
                self.emit_expression(*consequent, prec::ASSIGNMENT);
                self.write(" : ");
                self.emit_expression(*alternate, prec::ASSIGNMENT);
            }
            Node::UnaryExpression { operator, argument } => {
                self.write(operator);
                if operator.chars().all(|c| c.is_ascii_alphabetic()) {
                    self.write(" ");
                }
                self.emit_expression(*argument, prec::UNARY);
            }
            Node::AssignmentPattern { left, right } => {
                self.emit_expression(*left, prec::CALL);
                self.write(" = ");
                self.emit_expression(*right, prec::ASSIGNMENT);
            }
            Node::Function(func) => self.emit_function(func),
            Node::VariableDeclarator { id, init } => {
                self.emit_expression(*id, prec::ASSIGNMENT);
                if init.is_some() {
                    self.write(" = ");
                    self.emit_expression(*init, prec::ASSIGNMENT);
                }
            }
            Node::Program { body } | Node::BlockStatement { body } => self.emit_block(body),
            Node::ExpressionStatement { .. }
            | Node::ReturnStatement { .. }
            | Node::VariableDeclaration { .. } => {
                // Statement in expression position; printed without the
                // terminator so malformed trees stay readable.
                self.emit_statement_node(node);
            }
        }
    }

    fn emit_statement_node(&mut self, node: &Node) {
        match node {
            Node::ReturnStatement { argument } => {
                self.write("return");
                if argument.is_some() {
                    self.write(" ");
                    self.emit_expression(*argument, 0);
                }
            }
            Node::ExpressionStatement { expression } => self.emit_expression(*expression, 0),
            Node::VariableDeclaration { kind, declarations } => {
                self.write(kind.as_str());
                self.write(" ");
                for (i, &decl) in declarations.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_declarator(decl);
                }
            }
            other => self.emit_node(other),
        }
    }

    fn emit_list(&mut self, items: &[NodeIndex]) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression(item, prec::ASSIGNMENT);
        }
    }

    /// Leftmost token of an expression statement would read as a block or a
    /// function declaration.
    fn starts_ambiguously(&self, idx: NodeIndex) -> bool {
        match self.arena.get(self.leftmost(idx)) {
            Some(Node::ObjectExpression { .. }) => true,
            Some(Node::Function(func)) => func.kind != FunctionKind::Arrow,
            _ => false,
        }
    }

    fn starts_with_object(&self, idx: NodeIndex) -> bool {
        matches!(
            self.arena.get(self.leftmost(idx)).map(Node::kind),
            Some(NodeKind::ObjectExpression)
        )
    }

    fn leftmost(&self, idx: NodeIndex) -> NodeIndex {
        let mut current = idx;
        loop {
            let Some(node) = self.arena.get(current) else {
                return current;
            };
            let next = match node {
                Node::MemberExpression { object, .. } => *object,
                Node::CallExpression { callee, .. } => *callee,
                Node::AssignmentExpression { left, .. } | Node::BinaryExpression { left, .. } => {
                    *left
                }
                Node::ConditionalExpression { test, .. } => *test,
                _ => return current,
            };
            // A wrapped child starts with `(`, which is never ambiguous.
            if self.arena.get(next).map(precedence) < Some(precedence(node)) {
                return next;
            }
            current = next;
        }
    }

    // =========================================================================
    // Output buffer
    // =========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\0' => self.output.push_str("\\0"),
                c if (c as u32) < 0x20 || c == '\x7F' => {
                    let _ = write!(self.output, "\\u{:04X}", c as u32);
                }
                _ => self.output.push(c),
            }
        }
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

fn is_statement(node: &Node) -> bool {
    match node {
        Node::BlockStatement { .. }
        | Node::ExpressionStatement { .. }
        | Node::ReturnStatement { .. }
        | Node::VariableDeclaration { .. } => true,
        Node::Function(func) => func.kind == FunctionKind::Declaration,
        _ => false,
    }
}

fn precedence(node: &Node) -> u8 {
    match node {
        Node::AssignmentExpression { .. } | Node::AssignmentPattern { .. } => prec::ASSIGNMENT,
        Node::Function(func) if func.kind == FunctionKind::Arrow => prec::ASSIGNMENT,
        Node::ConditionalExpression { .. } => prec::CONDITIONAL,
        Node::BinaryExpression { operator, .. } => binary_precedence(operator),
        Node::UnaryExpression { .. } => prec::UNARY,
        Node::CallExpression { .. } | Node::MemberExpression { .. } => prec::CALL,
        _ => prec::PRIMARY,
    }
}

fn binary_precedence(operator: &str) -> u8 {
    match operator {
        "??" | "||" => 4,
        "&&" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" | "===" | "!==" => 9,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 10,
        "<<" | ">>" | ">>>" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        "**" => 14,
        _ => prec::CONDITIONAL + 1,
    }
}
