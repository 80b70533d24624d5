//! Delegated destructuring lowering.
//!
//! Object rest extraction only splits the rest binding off a pattern; the
//! rest of the pattern is lowered into sequential property and element reads
//! by a [`DestructuringLowering`]. The pass is generic over it so a host can
//! plug in its own; [`Es2015Destructuring`] is the default:
//!
//! - `{ a, b: c } = obj` → `a = obj.a, c = obj.b`
//! - `{ a = 1 } = obj` → `_ref = obj.a, a = _ref === void 0 ? 1 : _ref`
//! - `[x, ...ys] = arr` → `x = arr[0], ys = arr.slice(1)`
//!
//! An object pattern that still ends in a rest element is emitted as its own
//! declarator so the rest handler picks it up on its next visit.

use crate::object_rest::find_rest;
use crate::traverse::TraversalContext;
use objrest_ast::{DeclarationKind, Node, NodeArena, NodeIndex, NodeKind};
use objrest_common::limits::MAX_AST_DEPTH;
use smallvec::SmallVec;

pub trait DestructuringLowering {
    /// Lower the pattern bound by `declarator` into replacement declarators.
    ///
    /// Returns `None` when the declarator binds a plain name, or when its
    /// pattern ends in an object rest (the rest handler owns those).
    fn lower_declarator(
        &mut self,
        cx: &mut TraversalContext<'_>,
        declarator: NodeIndex,
    ) -> Option<Vec<NodeIndex>>;

    /// Replace a destructuring parameter of `function` that the parameter
    /// normalizer does not handle itself (array patterns, defaulted patterns)
    /// with a fresh name, returning the `let` declaration to hoist into the
    /// body.
    fn lower_parameter(
        &mut self,
        cx: &mut TraversalContext<'_>,
        function: NodeIndex,
        param: NodeIndex,
    ) -> Option<NodeIndex>;
}

/// Sequential property access lowering in the style of ES2015 compilers.
#[derive(Debug, Default, Clone, Copy)]
pub struct Es2015Destructuring;

impl DestructuringLowering for Es2015Destructuring {
    fn lower_declarator(
        &mut self,
        cx: &mut TraversalContext<'_>,
        declarator: NodeIndex,
    ) -> Option<Vec<NodeIndex>> {
        let Some(Node::VariableDeclarator { id, init }) = cx.arena.get(declarator) else {
            return None;
        };
        let (id, init) = (*id, *init);
        if !cx.arena.get(id).is_some_and(Node::is_pattern) {
            return None;
        }
        if matches!(find_rest(cx.arena, id), Ok(Some(_)) | Err(_)) {
            return None;
        }

        let value = if init.is_some() {
            init
        } else {
            cx.arena.void_0()
        };
        let mut out = Vec::new();
        bind(cx, id, value, 0, &mut out);
        tracing::debug!(
            "[destructuring] {declarator}: lowered into {} declarator(s)",
            out.len()
        );
        Some(out)
    }

    fn lower_parameter(
        &mut self,
        cx: &mut TraversalContext<'_>,
        function: NodeIndex,
        param: NodeIndex,
    ) -> Option<NodeIndex> {
        let (pattern, default) = match cx.arena.get(param)? {
            Node::ArrayPattern { .. } => (param, NodeIndex::NONE),
            Node::AssignmentPattern { left, right }
                if cx.arena.get(*left).is_some_and(Node::is_pattern) =>
            {
                (*left, *right)
            }
            _ => return None,
        };

        let name = cx.fresh_name("ref");
        let replacement = cx.arena.ident(name.as_str());
        if !cx.arena.replace_child(function, param, replacement) {
            return None;
        }
        let mut value = cx.arena.ident(name.as_str());
        if default.is_some() {
            value = default_or(cx.arena, &name, default);
        }
        let declarator = cx.arena.declarator(pattern, value);
        Some(
            cx.arena
                .var_declaration(DeclarationKind::Let, vec![declarator]),
        )
    }
}

/// `name === void 0 ? fallback : name`
fn default_or(arena: &mut NodeArena, name: &str, fallback: NodeIndex) -> NodeIndex {
    let tested = arena.ident(name);
    let undefined = arena.void_0();
    let test = arena.binary(tested, "===", undefined);
    let otherwise = arena.ident(name);
    arena.conditional(test, fallback, otherwise)
}

/// Hands out `value` for its first use and deep copies afterwards, since a
/// node has exactly one parent.
struct Reuse {
    value: NodeIndex,
    used: bool,
}

impl Reuse {
    fn next(&mut self, arena: &mut NodeArena) -> NodeIndex {
        if self.used {
            arena.clone_subtree(self.value)
        } else {
            self.used = true;
            self.value
        }
    }
}

/// Append declarators binding `target` to `value`.
fn bind(
    cx: &mut TraversalContext<'_>,
    target: NodeIndex,
    value: NodeIndex,
    depth: u32,
    out: &mut Vec<NodeIndex>,
) {
    let kind = cx.arena.get(target).map(Node::kind);
    if depth >= MAX_AST_DEPTH {
        out.push(cx.arena.declarator(target, value));
        return;
    }
    match kind {
        Some(NodeKind::AssignmentPattern) => {
            let Some(Node::AssignmentPattern { left, right }) = cx.arena.get(target) else {
                return;
            };
            let (left, right) = (*left, *right);
            let name = cx.fresh_name("ref");
            let temp = cx.arena.ident(name.as_str());
            out.push(cx.arena.declarator(temp, value));
            let defaulted = default_or(cx.arena, &name, right);
            bind(cx, left, defaulted, depth + 1, out);
        }
        Some(NodeKind::ObjectPattern) => {
            if matches!(find_rest(cx.arena, target), Ok(Some(_)) | Err(_)) {
                out.push(cx.arena.declarator(target, value));
                return;
            }
            let properties: SmallVec<[NodeIndex; 8]> = cx
                .arena
                .object_members(target)
                .map(|members| members.iter().copied().collect())
                .unwrap_or_default();
            let mut source = bind_source(cx, value, properties.len(), out);
            for prop in properties {
                let Some(data) = cx.arena.get_property(prop) else {
                    continue;
                };
                let (key, sub_target, computed) = (data.key, data.value, data.computed);
                let key_name = cx
                    .arena
                    .identifier_text(key)
                    .filter(|_| !computed)
                    .map(str::to_string);
                let object = source.next(cx.arena);
                let access = match key_name {
                    Some(name) => cx.arena.member(object, &name),
                    None => {
                        let key = cx.arena.clone_subtree(key);
                        cx.arena.computed_member(object, key)
                    }
                };
                bind(cx, sub_target, access, depth + 1, out);
            }
        }
        Some(NodeKind::ArrayPattern) => {
            let elements: SmallVec<[NodeIndex; 8]> = match cx.arena.get(target) {
                Some(Node::ArrayPattern { elements }) => elements.iter().copied().collect(),
                _ => SmallVec::new(),
            };
            let mut source = bind_source(cx, value, elements.len(), out);
            for (position, element) in elements.into_iter().enumerate() {
                if element.is_none() {
                    continue;
                }
                let object = source.next(cx.arena);
                let index = cx.arena.number(position.to_string());
                let rest_argument = match cx.arena.get(element) {
                    Some(Node::RestElement { argument }) => Some(*argument),
                    _ => None,
                };
                if let Some(argument) = rest_argument {
                    let slice = cx.arena.member(object, "slice");
                    let access = cx.arena.call(slice, vec![index]);
                    bind(cx, argument, access, depth + 1, out);
                } else {
                    let access = cx.arena.computed_member(object, index);
                    bind(cx, element, access, depth + 1, out);
                }
            }
        }
        _ => out.push(cx.arena.declarator(target, value)),
    }
}

/// A pattern with `uses` entries reads its source once per entry. A source
/// that is not a plain name is bound to a temporary unless read exactly once.
fn bind_source(
    cx: &mut TraversalContext<'_>,
    value: NodeIndex,
    uses: usize,
    out: &mut Vec<NodeIndex>,
) -> Reuse {
    let is_name = matches!(cx.arena.get(value), Some(Node::Identifier { .. }));
    if is_name || uses == 1 {
        return Reuse { value, used: false };
    }
    let name = cx.fresh_name("ref");
    let temp = cx.arena.ident(name.as_str());
    out.push(cx.arena.declarator(temp, value));
    Reuse {
        value: cx.arena.ident(name.as_str()),
        used: false,
    }
}
