//! Object spread lowering.
//!
//! `{ a: 1, ...b, c: 2 }` becomes `_extends({ a: 1 }, b, { c: 2 })`, or
//! `Object.assign(...)` with `useBuiltIns`. A literal that starts with a
//! spread gets a fresh `{}` target so the merge never mutates a spread source:
//!
//! - `{ ...a }` → `_extends({}, a)`
//! - `{ ...a, b: 1, ...c }` → `_extends({}, a, { b: 1 }, c)`

use crate::helpers::{Helper, HelperProvider};
use crate::traverse::{TraversalContext, VisitOutcome};
use objrest_ast::{Node, NodeArena, NodeIndex};
use smallvec::SmallVec;

/// One argument of the merge call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Chunk {
    /// A maximal run of plain properties, in source order.
    Properties(SmallVec<[NodeIndex; 4]>),
    /// The argument of a single spread element.
    Spread(NodeIndex),
}

pub fn has_spread(arena: &NodeArena, properties: &[NodeIndex]) -> bool {
    properties
        .iter()
        .any(|&prop| matches!(arena.get(prop), Some(Node::SpreadElement { .. })))
}

/// Split object literal entries around spread boundaries.
///
/// Flattening the result yields the original entries in their original
/// order; no `Properties` chunk is empty.
pub fn partition(arena: &NodeArena, properties: &[NodeIndex]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut pending: SmallVec<[NodeIndex; 4]> = SmallVec::new();

    for &prop in properties {
        match arena.get(prop) {
            Some(Node::SpreadElement { argument }) => {
                if !pending.is_empty() {
                    chunks.push(Chunk::Properties(std::mem::take(&mut pending)));
                }
                chunks.push(Chunk::Spread(*argument));
            }
            _ => pending.push(prop),
        }
    }
    if !pending.is_empty() {
        chunks.push(Chunk::Properties(pending));
    }
    chunks
}

/// Rewrite the object literal at `idx` into a merge call, in place.
pub fn lower_object_spread<H: HelperProvider + ?Sized>(
    cx: &mut TraversalContext<'_>,
    idx: NodeIndex,
    use_built_ins: bool,
    helpers: &mut H,
) -> VisitOutcome {
    let Some(Node::ObjectExpression { properties }) = cx.arena.get(idx) else {
        return VisitOutcome::Unchanged;
    };
    if !has_spread(cx.arena, properties) {
        return VisitOutcome::Unchanged;
    }
    let chunks = partition(cx.arena, properties);
    if let [Chunk::Properties(_)] = chunks.as_slice() {
        return VisitOutcome::Unchanged;
    }

    let mut arguments = Vec::with_capacity(chunks.len() + 1);
    if !matches!(chunks.first(), Some(Chunk::Properties(_))) {
        arguments.push(cx.arena.object(Vec::new()));
    }
    for chunk in chunks {
        let argument = match chunk {
            Chunk::Properties(props) => cx.arena.object(props.into_vec()),
            Chunk::Spread(argument) => argument,
        };
        arguments.push(argument);
    }

    let callee = if use_built_ins {
        let object = cx.arena.ident("Object");
        cx.arena.member(object, "assign")
    } else {
        helpers.request_helper(cx.arena, cx.names, Helper::Extends)
    };

    tracing::debug!(
        "[object-spread] {idx}: merging {} arguments (use_built_ins={use_built_ins})",
        arguments.len()
    );
    cx.arena
        .replace(idx, Node::CallExpression { callee, arguments });
    VisitOutcome::Rewritten
}
