//! Fresh binding names.
//!
//! Generated names follow the `_ref`, `_ref2`, `_ref3` scheme and never
//! collide with an identifier that already occurs anywhere in the arena or
//! with a name handed out earlier. Uniqueness is file-wide, which is stronger
//! than the per-scope guarantee callers need.

use crate::arena::NodeArena;
use crate::node::Node;
use objrest_common::limits::MAX_UNIQUE_NAME_ATTEMPTS;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Default, Clone)]
pub struct UniqueNames {
    used: FxHashSet<String>,
    /// Next suffix to try per hint, so repeated requests stay linear.
    next_suffix: FxHashMap<String, u32>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with every identifier stored in `arena`.
    pub fn from_arena(arena: &NodeArena) -> Self {
        let mut names = Self::new();
        for (_, node) in arena.iter() {
            if let Node::Identifier { name } = node {
                names.reserve(name);
            }
        }
        names
    }

    /// Mark `name` as taken.
    pub fn reserve(&mut self, name: &str) {
        if !self.used.contains(name) {
            self.used.insert(name.to_string());
        }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Generate a fresh name from `hint`: `_hint`, then `_hint2`, `_hint3`, ...
    pub fn generate(&mut self, hint: &str) -> String {
        let base = format!("_{}", hint.trim_start_matches('_'));
        let start = self.next_suffix.get(&base).copied().unwrap_or(1);
        let mut suffix = start;
        while suffix < start.saturating_add(MAX_UNIQUE_NAME_ATTEMPTS) {
            let candidate = if suffix == 1 {
                base.clone()
            } else {
                format!("{base}{suffix}")
            };
            suffix += 1;
            if !self.used.contains(&candidate) {
                self.next_suffix.insert(base, suffix);
                self.used.insert(candidate.clone());
                return candidate;
            }
        }
        // Unreachable in practice: a file would need a million `_hintN` names.
        let fallback = format!("{base}_{}", self.used.len());
        self.used.insert(fallback.clone());
        fallback
    }
}
