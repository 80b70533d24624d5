//! Object rest extraction for variable declarators.
//!
//! For every object pattern in a declarator that ends in a rest element (a
//! "rest site"), the rest binding is split off into a new declaration placed
//! right after the original statement:
//!
//! ```text
//! const { a, b: { c, ...inner }, ...rest } = obj;
//! ```
//!
//! becomes
//!
//! ```text
//! const { a, b: { c } } = obj;
//! const rest = _objectWithoutProperties(obj, ["a", "b"]),
//!     inner = _objectWithoutProperties(obj.b, ["c"]);
//! ```
//!
//! and the remaining pattern is left to the destructuring lowering.

use crate::error::TransformError;
use crate::helpers::{Helper, HelperProvider};
use crate::keys::normalize_key;
use crate::traverse::{TraversalContext, VisitOutcome};
use objrest_ast::{Node, NodeArena, NodeIndex, UniqueNames};
use objrest_common::limits::{MAX_AST_DEPTH, MAX_PARENT_WALK};
use smallvec::SmallVec;

/// Locate the rest element of an object pattern.
///
/// Fails when a pattern carries more than one rest element or a rest element
/// in any position but the last.
pub fn find_rest(arena: &NodeArena, pattern: NodeIndex) -> Result<Option<NodeIndex>, TransformError> {
    let Some(Node::ObjectPattern { properties }) = arena.get(pattern) else {
        return Ok(None);
    };
    let mut rests = properties
        .iter()
        .copied()
        .filter(|&prop| matches!(arena.get(prop), Some(Node::RestElement { .. })));
    let Some(rest) = rests.next() else {
        return Ok(None);
    };
    if rests.next().is_some() {
        return Err(TransformError::DuplicateRestElement { pattern });
    }
    if properties.last() != Some(&rest) {
        return Err(TransformError::MisplacedRestElement { rest });
    }
    Ok(Some(rest))
}

/// Object patterns under `pattern` (itself included) that end in a rest
/// element, in pre-order.
///
/// The walk descends into property values and array-pattern elements but
/// never through a default (`AssignmentPattern`) or an array rest: those
/// values only exist once the destructuring lowering has bound them.
pub fn collect_rest_sites(
    arena: &NodeArena,
    pattern: NodeIndex,
) -> Result<SmallVec<[NodeIndex; 2]>, TransformError> {
    let mut sites = SmallVec::new();
    collect_into(arena, pattern, 0, &mut sites)?;
    Ok(sites)
}

fn collect_into(
    arena: &NodeArena,
    pattern: NodeIndex,
    depth: u32,
    sites: &mut SmallVec<[NodeIndex; 2]>,
) -> Result<(), TransformError> {
    if depth >= MAX_AST_DEPTH {
        tracing::warn!("[object-rest] pattern nesting exceeds {MAX_AST_DEPTH}, not descending");
        return Ok(());
    }
    match arena.get(pattern) {
        Some(Node::ObjectPattern { properties }) => {
            if find_rest(arena, pattern)?.is_some() {
                sites.push(pattern);
            }
            for &prop in properties {
                if let Some(data) = arena.get_property(prop) {
                    collect_into(arena, data.value, depth + 1, sites)?;
                }
            }
        }
        Some(Node::ArrayPattern { elements }) => {
            for &element in elements {
                collect_into(arena, element, depth + 1, sites)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Expression evaluating to the object destructured by `site`: the member
/// chain from `source_name` down through every enclosing property or array
/// element, up to (not including) `top`.
pub fn source_for(arena: &mut NodeArena, site: NodeIndex, top: NodeIndex, source_name: &str) -> NodeIndex {
    enum Step {
        Name(String),
        Computed(NodeIndex),
        Index(usize),
    }

    let mut steps = Vec::new();
    let mut current = site;
    for _ in 0..MAX_PARENT_WALK {
        if current == top {
            break;
        }
        let parent = arena.parent(current);
        match arena.get(parent) {
            Some(Node::Property(prop)) => {
                let step = match arena.get(prop.key) {
                    Some(Node::Identifier { name }) if !prop.computed => Step::Name(name.clone()),
                    _ => Step::Computed(prop.key),
                };
                steps.push(step);
                // Property -> enclosing object pattern.
                current = arena.parent(parent);
            }
            Some(Node::ArrayPattern { elements }) => {
                let position = elements.iter().position(|&e| e == current).unwrap_or(0);
                steps.push(Step::Index(position));
                current = parent;
            }
            _ => break,
        }
    }

    let mut expr = arena.ident(source_name);
    for step in steps.into_iter().rev() {
        expr = match step {
            Step::Name(name) => arena.member(expr, &name),
            Step::Computed(key) => {
                let key = arena.clone_subtree(key);
                arena.computed_member(expr, key)
            }
            Step::Index(position) => {
                let index = arena.number(position.to_string());
                arena.computed_member(expr, index)
            }
        };
    }
    expr
}

/// Split the rest element off `pattern`.
///
/// Returns the declarator `target = _objectWithoutProperties(source, keys)`
/// and whether the pattern is left without entries. The rest element is
/// removed from the pattern; the exclusion keys are the normalized keys of
/// every remaining entry, in order.
pub fn extract_rest<H: HelperProvider + ?Sized>(
    arena: &mut NodeArena,
    names: &mut UniqueNames,
    pattern: NodeIndex,
    source: NodeIndex,
    helpers: &mut H,
) -> Result<Option<(NodeIndex, bool)>, TransformError> {
    let Some(rest) = find_rest(arena, pattern)? else {
        return Ok(None);
    };
    let target = match arena.get(rest) {
        Some(Node::RestElement { argument }) => *argument,
        _ => return Ok(None),
    };
    let siblings: SmallVec<[NodeIndex; 8]> = arena
        .object_members(pattern)
        .map(|members| members.iter().copied().filter(|&m| m != rest).collect())
        .unwrap_or_default();

    let keys = siblings
        .iter()
        .map(|&prop| normalize_key(arena, prop))
        .filter(|key| key.is_some())
        .collect();
    let keys = arena.array(keys);
    let callee = helpers.request_helper(arena, names, Helper::ObjectWithoutProperties);
    let call = arena.call(callee, vec![source, keys]);
    let declarator = arena.declarator(target, call);
    arena.remove(rest);

    Ok(Some((declarator, siblings.is_empty())))
}

/// Rest handler for a variable declarator whose binding is an object pattern.
pub fn lower_rest_declarator<H: HelperProvider + ?Sized>(
    cx: &mut TraversalContext<'_>,
    declarator: NodeIndex,
    helpers: &mut H,
) -> Result<VisitOutcome, TransformError> {
    let Some(Node::VariableDeclarator { id, init }) = cx.arena.get(declarator) else {
        return Ok(VisitOutcome::Unchanged);
    };
    let (id, init) = (*id, *init);
    if !matches!(cx.arena.get(id), Some(Node::ObjectPattern { .. })) {
        return Ok(VisitOutcome::Unchanged);
    }
    let sites = collect_rest_sites(cx.arena, id)?;
    if sites.is_empty() {
        return Ok(VisitOutcome::Unchanged);
    }

    let declaration = cx.arena.parent(declarator);
    let Some(Node::VariableDeclaration { kind, .. }) = cx.arena.get(declaration) else {
        return Ok(VisitOutcome::Unchanged);
    };
    let kind = *kind;
    if !cx
        .arena
        .get(cx.arena.parent(declaration))
        .is_some_and(Node::is_statement_list)
    {
        return Ok(VisitOutcome::Unchanged);
    }

    // The source is referenced once per rest site plus once by the residual
    // pattern; anything but a plain name is bound to a temporary first.
    let source_name = match cx.arena.identifier_text(init) {
        Some(name) => name.to_string(),
        None => {
            let name = cx.fresh_name("ref");
            let value = if init.is_some() {
                init
            } else {
                cx.arena.void_0()
            };
            let temp_id = cx.arena.ident(name.as_str());
            let temp = cx.arena.declarator(temp_id, value);
            let reference = cx.arena.ident(name.as_str());
            cx.arena.replace(
                declarator,
                Node::VariableDeclarator {
                    id,
                    init: reference,
                },
            );
            cx.arena.insert_before(declarator, temp);
            cx.enqueue(temp);
            tracing::debug!("[object-rest] {declarator}: bound rest source to {name}");
            name
        }
    };

    let mut extracted = Vec::with_capacity(sites.len());
    let mut emptied: SmallVec<[NodeIndex; 2]> = SmallVec::new();
    for &site in &sites {
        let source = source_for(cx.arena, site, id, &source_name);
        if let Some((binding, is_empty)) = extract_rest(cx.arena, cx.names, site, source, helpers)? {
            extracted.push(binding);
            if is_empty {
                emptied.push(site);
            }
        }
    }
    tracing::debug!(
        "[object-rest] {declarator}: extracted {} rest binding(s) from {source_name}",
        extracted.len()
    );

    let rest_declaration = cx.arena.var_declaration(kind, extracted);
    cx.arena.insert_after(declaration, rest_declaration);
    cx.enqueue(rest_declaration);

    // Deepest first, so an emptied inner pattern can empty its holder.
    for &site in emptied.iter().rev() {
        if cx.arena.is_attached(site, cx.root()) {
            prune_empty_pattern(cx.arena, site, &sites);
        }
    }

    Ok(VisitOutcome::Rewritten)
}

/// Remove an object pattern left without entries.
///
/// The property holding it goes away (an array pattern keeps a hole instead);
/// when that leaves an enclosing rest site empty too, it is removed in turn.
/// An emptied top-level pattern removes its declarator.
fn prune_empty_pattern(arena: &mut NodeArena, pattern: NodeIndex, sites: &[NodeIndex]) {
    let mut current = pattern;
    for _ in 0..MAX_PARENT_WALK {
        let parent = arena.parent(current);
        let holder = match arena.get(parent) {
            Some(Node::Property(_)) => {
                let holder = arena.parent(parent);
                arena.remove(parent);
                holder
            }
            Some(Node::ArrayPattern { .. }) => {
                arena.remove(current);
                return;
            }
            Some(Node::VariableDeclarator { .. }) => {
                remove_declarator(arena, parent);
                return;
            }
            _ => return,
        };
        let holder_is_empty = arena
            .object_members(holder)
            .is_some_and(|members| members.is_empty());
        if !(sites.contains(&holder) && holder_is_empty) {
            return;
        }
        current = holder;
    }
}

/// Remove a declarator, and its declaration statement once no declarator is
/// left.
pub(crate) fn remove_declarator(arena: &mut NodeArena, declarator: NodeIndex) {
    let declaration = arena.parent(declarator);
    arena.remove(declarator);
    if let Some(Node::VariableDeclaration { declarations, .. }) = arena.get(declaration) {
        if declarations.is_empty() {
            tracing::trace!("[object-rest] removing empty declaration {declaration}");
            arena.remove(declaration);
        }
    }
}
