//! Fixed-point traversal engine.
//!
//! The engine owns a LIFO worklist seeded with the root. Popping a node hands
//! it to the [`Visitor`]:
//!
//! - `Unchanged`: the node's children are pushed (reversed, so they pop in
//!   source order) and traversal continues depth-first, pre-order.
//! - `Rewritten`: the node itself is pushed again, on top of everything the
//!   handler enqueued, so the rewritten shape is revisited before its new
//!   children and before its original siblings.
//!
//! Nodes a handler inserts outside the visited subtree (a sibling statement,
//! a hoisted declaration) must be passed to [`TraversalContext::enqueue`].
//! Nodes that a rewrite detached are skipped when popped. The drain ends when
//! the worklist is empty, i.e. when no handler matches anywhere.

use crate::error::TransformError;
use objrest_ast::{NodeArena, NodeIndex, UniqueNames};
use objrest_common::limits::{DRAIN_VISITS_PER_NODE, MAX_DRAIN_VISITS};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitOutcome {
    Unchanged,
    Rewritten,
}

/// Everything a handler may touch during one visit.
pub struct TraversalContext<'a> {
    pub arena: &'a mut NodeArena,
    pub names: &'a mut UniqueNames,
    root: NodeIndex,
    enqueued: SmallVec<[NodeIndex; 4]>,
}

impl<'a> TraversalContext<'a> {
    pub fn new(arena: &'a mut NodeArena, names: &'a mut UniqueNames, root: NodeIndex) -> Self {
        TraversalContext {
            arena,
            names,
            root,
            enqueued: SmallVec::new(),
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Schedule `idx` for a visit after the current one.
    pub fn enqueue(&mut self, idx: NodeIndex) {
        if idx.is_some() {
            self.enqueued.push(idx);
        }
    }

    /// Fresh binding name, unique across the compilation unit.
    pub fn fresh_name(&mut self, hint: &str) -> String {
        self.names.generate(hint)
    }

    pub fn take_enqueued(&mut self) -> SmallVec<[NodeIndex; 4]> {
        std::mem::take(&mut self.enqueued)
    }
}

pub trait Visitor {
    fn visit(
        &mut self,
        cx: &mut TraversalContext<'_>,
        idx: NodeIndex,
    ) -> Result<VisitOutcome, TransformError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes handed to the visitor.
    pub visits: usize,
    /// Visits that returned `Rewritten`.
    pub rewrites: usize,
    /// Worklist entries dropped because they were no longer attached.
    pub skipped: usize,
}

/// Visit budget for an arena of `node_count` nodes. Rewrites grow the arena,
/// so the budget is re-read on every pop.
pub fn visit_limit(node_count: usize) -> usize {
    MAX_DRAIN_VISITS.max(node_count.saturating_mul(DRAIN_VISITS_PER_NODE))
}

/// Drive `visitor` over the tree under `root` until no handler matches.
pub fn drain<V: Visitor + ?Sized>(
    arena: &mut NodeArena,
    names: &mut UniqueNames,
    root: NodeIndex,
    visitor: &mut V,
) -> Result<TraversalStats, TransformError> {
    let mut stats = TraversalStats::default();
    let mut worklist: Vec<NodeIndex> = vec![root];

    while let Some(idx) = worklist.pop() {
        if !arena.is_attached(idx, root) {
            stats.skipped += 1;
            continue;
        }
        stats.visits += 1;
        if stats.visits > visit_limit(arena.len()) {
            return Err(TransformError::DidNotConverge {
                visits: stats.visits,
            });
        }

        let mut cx = TraversalContext::new(arena, names, root);
        let outcome = visitor.visit(&mut cx, idx)?;
        let enqueued = cx.take_enqueued();

        // Enqueued nodes pop in the order they were scheduled.
        worklist.extend(enqueued.iter().rev().copied());
        match outcome {
            VisitOutcome::Rewritten => {
                stats.rewrites += 1;
                tracing::trace!("[traverse] rewrote {idx}, revisiting");
                worklist.push(idx);
            }
            VisitOutcome::Unchanged => {
                if let Some(node) = arena.get(idx) {
                    worklist.extend(node.children().into_iter().rev());
                }
            }
        }
    }

    tracing::debug!(
        "[traverse] drained: {} visits, {} rewrites, {} skipped",
        stats.visits,
        stats.rewrites,
        stats.skipped
    );
    Ok(stats)
}
