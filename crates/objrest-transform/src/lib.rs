//! Object rest/spread lowering.
//!
//! Rewrites object rest in destructuring and object spread in literals into
//! plain assignments, helper calls and object literals:
//!
//! ```text
//! const { a, ...rest } = obj;     const a = obj.a;
//!                             →   const rest = _objectWithoutProperties(obj, ["a"]);
//!
//! const o = { ...a, b: 1 };   →   const o = _extends({}, a, { b: 1 });
//! ```
//!
//! The pass composes four handlers over one fixed-point traversal: the
//! parameter normalizer for functions, the rest handler and the delegated
//! destructuring lowering for variable declarators, and the spread handler
//! for object literals. Nodes produced by one handler are revisited until
//! none of them matches.
//!
//! ```
//! use objrest_ast::{DeclarationKind, NodeArena, Printer};
//! use objrest_transform::{HelperRegistry, ObjectRestSpread, ObjectRestSpreadOptions};
//!
//! let mut arena = NodeArena::new();
//! let a = arena.shorthand("a");
//! let rest = arena.rest_ident("rest");
//! let pattern = arena.object_pattern(vec![a, rest]);
//! let obj = arena.ident("obj");
//! let declarator = arena.declarator(pattern, obj);
//! let decl = arena.var_declaration(DeclarationKind::Const, vec![declarator]);
//! let root = arena.program(vec![decl]);
//!
//! let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
//! pass.run(&mut arena, root).unwrap();
//! assert_eq!(
//!     Printer::print(&arena, root),
//!     "const a = obj.a;\nconst rest = _objectWithoutProperties(obj, [\"a\"]);\n"
//! );
//! ```

pub mod destructuring;
pub mod error;
pub mod helpers;
pub mod keys;
pub mod object_rest;
pub mod object_spread;
pub mod options;
pub mod parameters;
pub mod traverse;

pub use destructuring::{DestructuringLowering, Es2015Destructuring};
pub use error::TransformError;
pub use helpers::{Helper, HelperProvider, HelperRegistry};
pub use options::ObjectRestSpreadOptions;
pub use traverse::{TraversalContext, TraversalStats, VisitOutcome, Visitor};

use objrest_ast::{NodeArena, NodeIndex, NodeKind, UniqueNames};

/// Identity of the pass within a plugin pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PluginManifest {
    pub name: &'static str,
    /// Passes that must run first (the syntax extension that lets the parser
    /// accept rest/spread in object positions).
    pub inherits: &'static [&'static str],
}

pub const MANIFEST: PluginManifest = PluginManifest {
    name: "transform-object-rest-spread",
    inherits: &["syntax-object-rest-spread"],
};

pub struct ObjectRestSpread<H, D = Es2015Destructuring> {
    options: ObjectRestSpreadOptions,
    helpers: H,
    destructuring: D,
}

impl<H: HelperProvider> ObjectRestSpread<H> {
    pub fn new(options: ObjectRestSpreadOptions, helpers: H) -> Self {
        Self::with_destructuring(options, helpers, Es2015Destructuring)
    }

    /// Build the pass from raw plugin options, rejecting invalid ones.
    pub fn from_json(options: &serde_json::Value, helpers: H) -> Result<Self, TransformError> {
        Ok(Self::new(ObjectRestSpreadOptions::from_json(options)?, helpers))
    }
}

impl<H: HelperProvider, D: DestructuringLowering> ObjectRestSpread<H, D> {
    pub fn with_destructuring(options: ObjectRestSpreadOptions, helpers: H, destructuring: D) -> Self {
        ObjectRestSpread {
            options,
            helpers,
            destructuring,
        }
    }

    pub fn manifest() -> PluginManifest {
        MANIFEST
    }

    pub fn options(&self) -> ObjectRestSpreadOptions {
        self.options
    }

    pub fn helpers(&self) -> &H {
        &self.helpers
    }

    pub fn destructuring(&self) -> &D {
        &self.destructuring
    }

    pub fn into_helpers(self) -> H {
        self.helpers
    }

    /// Lower every object rest and object spread under `root`.
    pub fn run(&mut self, arena: &mut NodeArena, root: NodeIndex) -> Result<TraversalStats, TransformError> {
        let mut names = UniqueNames::from_arena(arena);
        tracing::debug!(
            "[objrest] running on {} nodes (use_built_ins={})",
            arena.len(),
            self.options.use_built_ins
        );
        let stats = traverse::drain(arena, &mut names, root, self)?;
        tracing::debug!(
            "[objrest] done: {} visits, {} rewrites",
            stats.visits,
            stats.rewrites
        );
        Ok(stats)
    }
}

impl<H: HelperProvider, D: DestructuringLowering> Visitor for ObjectRestSpread<H, D> {
    fn visit(
        &mut self,
        cx: &mut TraversalContext<'_>,
        idx: NodeIndex,
    ) -> Result<VisitOutcome, TransformError> {
        let Some(kind) = cx.arena.get(idx).map(|node| node.kind()) else {
            return Ok(VisitOutcome::Unchanged);
        };
        match kind {
            NodeKind::Function => Ok(parameters::normalize_params(
                cx,
                idx,
                &mut self.destructuring,
            )),
            NodeKind::VariableDeclarator => {
                let outcome = object_rest::lower_rest_declarator(cx, idx, &mut self.helpers)?;
                if outcome == VisitOutcome::Rewritten {
                    return Ok(outcome);
                }
                Ok(self.lower_declarator(cx, idx))
            }
            NodeKind::ObjectExpression => Ok(object_spread::lower_object_spread(
                cx,
                idx,
                self.options.use_built_ins,
                &mut self.helpers,
            )),
            _ => Ok(VisitOutcome::Unchanged),
        }
    }
}

impl<H, D: DestructuringLowering> ObjectRestSpread<H, D> {
    /// Hand a declarator to the delegated destructuring lowering and splice
    /// its replacements into the declaration.
    fn lower_declarator(&mut self, cx: &mut TraversalContext<'_>, declarator: NodeIndex) -> VisitOutcome {
        let Some(replacements) = self.destructuring.lower_declarator(cx, declarator) else {
            return VisitOutcome::Unchanged;
        };
        if replacements.is_empty() {
            object_rest::remove_declarator(cx.arena, declarator);
            return VisitOutcome::Rewritten;
        }
        if !cx.arena.splice(declarator, &replacements) {
            return VisitOutcome::Unchanged;
        }
        for &replacement in &replacements {
            cx.enqueue(replacement);
        }
        VisitOutcome::Rewritten
    }
}
