//! Destructuring parameter normalization.
//!
//! `function f({ a, ...rest }, [b], ...args) {}` becomes
//!
//! ```text
//! function f(_ref, _ref2, ...args) {
//!     let { a, ...rest } = _ref;
//!     let [b] = _ref2;
//! }
//! ```
//!
//! after which the hoisted declarations are lowered like any other.

use crate::destructuring::DestructuringLowering;
use crate::traverse::{TraversalContext, VisitOutcome};
use objrest_ast::{DeclarationKind, Node, NodeIndex};
use smallvec::SmallVec;

pub fn normalize_params<D: DestructuringLowering + ?Sized>(
    cx: &mut TraversalContext<'_>,
    function: NodeIndex,
    destructuring: &mut D,
) -> VisitOutcome {
    let Some(func) = cx.arena.get_function(function) else {
        return VisitOutcome::Unchanged;
    };
    let params = func.params.clone();

    // A trailing rest collector gathers arguments; it never destructures.
    let collects_rest = params
        .last()
        .is_some_and(|&last| matches!(cx.arena.get(last), Some(Node::RestElement { .. })));
    let output_len = params.len() - usize::from(collects_rest);

    let mut hoisted: SmallVec<[NodeIndex; 4]> = SmallVec::new();
    for &param in &params[..output_len] {
        if matches!(cx.arena.get(param), Some(Node::ObjectPattern { .. })) {
            let name = cx.fresh_name("ref");
            let replacement = cx.arena.ident(name.as_str());
            if !cx.arena.replace_child(function, param, replacement) {
                continue;
            }
            let init = cx.arena.ident(name.as_str());
            let declarator = cx.arena.declarator(param, init);
            hoisted.push(
                cx.arena
                    .var_declaration(DeclarationKind::Let, vec![declarator]),
            );
        } else if let Some(declaration) = destructuring.lower_parameter(cx, function, param) {
            hoisted.push(declaration);
        }
    }
    if hoisted.is_empty() {
        return VisitOutcome::Unchanged;
    }

    let body = ensure_block(cx, function);
    cx.arena.prepend_children(body, &hoisted);
    for &declaration in &hoisted {
        cx.enqueue(declaration);
    }
    tracing::debug!(
        "[parameters] {function}: hoisted {} destructuring declaration(s)",
        hoisted.len()
    );
    VisitOutcome::Rewritten
}

/// Body block of `function`, wrapping a concise arrow body in
/// `{ return body; }` first.
fn ensure_block(cx: &mut TraversalContext<'_>, function: NodeIndex) -> NodeIndex {
    let Some(body) = cx.arena.get_function(function).map(|func| func.body) else {
        return NodeIndex::NONE;
    };
    if body.is_none() || matches!(cx.arena.get(body), Some(Node::BlockStatement { .. })) {
        return body;
    }
    let argument = body;
    let ret = cx.arena.ret(argument);
    let block = cx.arena.block(vec![ret]);
    cx.arena.replace_child(function, argument, block);
    block
}
