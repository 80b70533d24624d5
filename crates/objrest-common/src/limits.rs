//! Centralized limits and thresholds for the objrest workspace.
//!
//! Every loop that walks parent links or drains a worklist is bounded by one
//! of these constants so a malformed tree degrades into an error instead of a
//! hang or a stack overflow.

/// Floor on the number of worklist pops in one drain of the traversal engine.
///
/// Each rewrite strictly removes a rest element, a spread element or a
/// destructuring pattern, so a well-formed tree converges in a small multiple
/// of its node count. The effective cap is the larger of this floor and
/// [`DRAIN_VISITS_PER_NODE`] times the current node count; exceeding it is
/// reported as an internal error.
pub const MAX_DRAIN_VISITS: usize = 2_000_000;

/// Visits allowed per arena node before a drain counts as non-converging.
pub const DRAIN_VISITS_PER_NODE: usize = 8;

/// Maximum number of parent links followed when checking whether a node is
/// still attached to the tree or when walking a pattern's ancestry.
pub const MAX_PARENT_WALK: usize = 10_000;

/// Maximum nesting followed when the transform recurses into patterns
/// (`{a: {b: {c: ...}}}`).
pub const MAX_AST_DEPTH: u32 = 500;

/// Maximum number of candidates tried when generating a fresh binding name.
pub const MAX_UNIQUE_NAME_ATTEMPTS: u32 = 1_000_000;
