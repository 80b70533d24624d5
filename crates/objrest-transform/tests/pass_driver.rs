use objrest_ast::{DeclarationKind, Node, NodeArena, NodeIndex, Printer, UniqueNames, load_program};
use objrest_transform::traverse::{drain, visit_limit};
use objrest_transform::{
    Es2015Destructuring, Helper, HelperRegistry, MANIFEST, ObjectRestSpread,
    ObjectRestSpreadOptions, TransformError, TraversalContext, VisitOutcome, Visitor,
};
use objrest_common::limits::MAX_DRAIN_VISITS;
use serde_json::json;

#[test]
fn test_manifest_inherits_syntax_plugin() {
    assert_eq!(MANIFEST.name, "transform-object-rest-spread");
    assert_eq!(MANIFEST.inherits, &["syntax-object-rest-spread"]);
    assert_eq!(
        ObjectRestSpread::<HelperRegistry, Es2015Destructuring>::manifest(),
        MANIFEST
    );
}

#[test]
fn test_options_default_to_helper_merge() {
    for raw in [json!(null), json!({}), json!({ "useBuiltIns": null })] {
        let pass = ObjectRestSpread::from_json(&raw, HelperRegistry::new()).expect("valid options");
        assert!(!pass.options().use_built_ins, "{raw}");
    }
    let pass = ObjectRestSpread::from_json(&json!({ "useBuiltIns": false, "loose": true }), HelperRegistry::new())
        .expect("unknown keys are ignored");
    assert_eq!(pass.options(), ObjectRestSpreadOptions::new(false));
}

#[test]
fn test_non_boolean_use_built_ins_is_rejected() {
    let Err(err) = ObjectRestSpread::from_json(&json!({ "useBuiltIns": "yes" }), HelperRegistry::new()) else {
        panic!("string option must be rejected");
    };
    assert!(err.is_config_error());
    assert_eq!(err.code(), 9001);
    assert_eq!(
        err,
        TransformError::InvalidOption {
            option: "useBuiltIns".to_string(),
            found: "string \"yes\"".to_string(),
        }
    );
    let diagnostic = err.to_diagnostic();
    assert!(diagnostic.is_error());
    assert!(diagnostic.message_text.contains("'useBuiltIns'"), "{diagnostic}");
    assert!(diagnostic.message_text.contains("string \"yes\""), "{diagnostic}");
}

#[test]
fn test_non_object_options_are_rejected() {
    let Err(err) = ObjectRestSpread::from_json(&json!([1]), HelperRegistry::new()) else {
        panic!("array options must be rejected");
    };
    assert_eq!(err.code(), 9002);
    assert_eq!(err.to_string(), "transform-object-rest-spread options must be an object, found an array.");
}

#[test]
fn test_rest_and_spread_in_one_program() {
    let source = r#"{
        "type": "Program",
        "body": [{
            "type": "VariableDeclaration",
            "kind": "const",
            "declarations": [{
                "type": "VariableDeclarator",
                "id": {
                    "type": "ObjectPattern",
                    "properties": [
                        {
                            "type": "Property",
                            "key": { "type": "Identifier", "name": "a" },
                            "value": { "type": "Identifier", "name": "a" },
                            "computed": false,
                            "shorthand": true
                        },
                        { "type": "RestElement", "argument": { "type": "Identifier", "name": "rest" } }
                    ]
                },
                "init": {
                    "type": "ObjectExpression",
                    "properties": [
                        { "type": "SpreadElement", "argument": { "type": "Identifier", "name": "b" } },
                        {
                            "type": "Property",
                            "key": { "type": "Identifier", "name": "c" },
                            "value": { "type": "Literal", "value": 1, "raw": "1" },
                            "computed": false,
                            "shorthand": false
                        }
                    ]
                }
            }]
        }]
    }"#;
    let (mut arena, root) = load_program(source).expect("valid ESTree");

    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    let stats = pass.run(&mut arena, root).expect("pass succeeds");
    assert!(stats.rewrites > 0);
    assert_eq!(
        Printer::print(&arena, root),
        "const _ref = _extends({}, b, { c: 1 }), a = _ref.a;\n\
         const rest = _objectWithoutProperties(_ref, [\"a\"]);\n"
    );

    let helpers = pass.into_helpers();
    let used: Vec<Helper> = helpers.used().collect();
    assert_eq!(used, vec![Helper::ObjectWithoutProperties, Helper::Extends]);
    let prelude = helpers.prelude();
    assert!(prelude.starts_with("function _objectWithoutProperties("), "{prelude}");
    assert!(prelude.contains("var _extends = "), "{prelude}");

    // A second run over lowered output finds nothing to do.
    let before = Printer::print(&arena, root);
    let mut again = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    let stats = again.run(&mut arena, root).expect("pass succeeds");
    assert_eq!(stats.rewrites, 0);
    assert_eq!(Printer::print(&arena, root), before);
}

#[test]
fn test_fresh_names_avoid_existing_bindings() {
    let mut arena = NodeArena::new();
    let a = arena.shorthand("a");
    let rest = arena.rest_ident("rest");
    let pattern = arena.object_pattern(vec![a, rest]);
    let f = arena.ident("f");
    let init = arena.call(f, vec![]);
    let declarator = arena.declarator(pattern, init);
    let decl = arena.var_declaration(DeclarationKind::Const, vec![declarator]);
    let taken = arena.ident("_ref");
    let zero = arena.number("0");
    let taken_decl = arena.declarator(taken, zero);
    let taken_stmt = arena.var_declaration(DeclarationKind::Let, vec![taken_decl]);
    let root = arena.program(vec![taken_stmt, decl]);

    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    pass.run(&mut arena, root).expect("pass succeeds");
    assert_eq!(
        Printer::print(&arena, root),
        "let _ref = 0;\n\
         const _ref2 = f(), a = _ref2.a;\n\
         const rest = _objectWithoutProperties(_ref2, [\"a\"]);\n"
    );
}

#[test]
fn test_helper_callees_are_distinct_nodes() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let spread_x = arena.spread(x);
    let first = arena.object(vec![spread_x]);
    let y = arena.ident("y");
    let spread_y = arena.spread(y);
    let second = arena.object(vec![spread_y]);
    let first_stmt = arena.expr_stmt(first);
    let second_stmt = arena.expr_stmt(second);
    let root = arena.program(vec![first_stmt, second_stmt]);

    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    pass.run(&mut arena, root).expect("pass succeeds");
    assert_eq!(
        Printer::print(&arena, root),
        "_extends({}, x);\n_extends({}, y);\n"
    );
    assert_eq!(pass.helpers().used().count(), 1);
}

#[test]
fn test_helper_binding_avoids_existing_name() {
    let mut arena = NodeArena::new();
    let taken = arena.ident("_extends");
    let one = arena.number("1");
    let taken_decl = arena.declarator(taken, one);
    let taken_stmt = arena.var_declaration(DeclarationKind::Const, vec![taken_decl]);
    let mut statements = vec![taken_stmt];
    for (target, source) in [("o", "a"), ("p", "b")] {
        let source = arena.ident(source);
        let spread = arena.spread(source);
        let merged = arena.object(vec![spread]);
        let target = arena.ident(target);
        let declarator = arena.declarator(target, merged);
        statements.push(arena.var_declaration(DeclarationKind::Const, vec![declarator]));
    }
    let root = arena.program(statements);

    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    pass.run(&mut arena, root).expect("pass succeeds");
    assert_eq!(
        Printer::print(&arena, root),
        "const _extends = 1;
         const o = _extends2({}, a);
         const p = _extends2({}, b);
"
    );

    let helpers = pass.into_helpers();
    assert_eq!(helpers.binding_of(Helper::Extends), Some("_extends2"));
    assert_eq!(helpers.binding_of(Helper::ObjectWithoutProperties), None);
    let prelude = helpers.prelude();
    assert!(prelude.starts_with("var _extends2 = Object.assign || "), "{prelude}");
    assert!(!prelude.contains("var _extends ="), "{prelude}");
}

#[test]
fn test_drain_budget_scales_with_program_size() {
    let mut arena = NodeArena::new();
    let mut elements: Vec<NodeIndex> = (0..=MAX_DRAIN_VISITS).map(|_| arena.boolean(true)).collect();
    let a = arena.ident("a");
    let spread = arena.spread(a);
    let merged = arena.object(vec![spread]);
    elements.push(merged);
    let list = arena.array(elements);
    let stmt = arena.expr_stmt(list);
    let root = arena.program(vec![stmt]);

    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    let stats = pass.run(&mut arena, root).expect("large programs still converge");
    assert!(stats.visits > MAX_DRAIN_VISITS);
    assert!(stats.visits <= visit_limit(arena.len()));
    assert_eq!(stats.rewrites, 1);
    assert!(matches!(arena.get(merged), Some(Node::CallExpression { .. })));
}

#[test]
fn test_visit_limit_has_a_floor() {
    assert_eq!(visit_limit(0), MAX_DRAIN_VISITS);
    assert_eq!(visit_limit(1), MAX_DRAIN_VISITS);
    assert!(visit_limit(MAX_DRAIN_VISITS) > MAX_DRAIN_VISITS);
}

/// Claims to rewrite the root forever.
struct Restless;

impl Visitor for Restless {
    fn visit(
        &mut self,
        _cx: &mut TraversalContext<'_>,
        _idx: NodeIndex,
    ) -> Result<VisitOutcome, TransformError> {
        Ok(VisitOutcome::Rewritten)
    }
}

#[test]
fn test_drain_reports_non_convergence() {
    let mut arena = NodeArena::new();
    let root = arena.program(vec![]);
    let mut names = UniqueNames::new();
    let err = drain(&mut arena, &mut names, root, &mut Restless).expect_err("never settles");
    assert_eq!(
        err,
        TransformError::DidNotConverge {
            visits: MAX_DRAIN_VISITS + 1
        }
    );
    assert_eq!(err.code(), 9201);
}

/// Detaches the first statement it sees, then leaves everything alone.
#[derive(Default)]
struct DropFirst {
    dropped: bool,
}

impl Visitor for DropFirst {
    fn visit(
        &mut self,
        cx: &mut TraversalContext<'_>,
        idx: NodeIndex,
    ) -> Result<VisitOutcome, TransformError> {
        if idx == cx.root() || self.dropped {
            return Ok(VisitOutcome::Unchanged);
        }
        self.dropped = true;
        let next = cx.arena.position_in_parent(idx).map(|position| position + 1);
        let sibling = match (next, cx.arena.get(cx.root())) {
            (Some(next), Some(Node::Program { body })) => body.get(next).copied(),
            _ => None,
        };
        cx.arena.remove(idx);
        if let Some(sibling) = sibling {
            cx.arena.remove(sibling);
        }
        Ok(VisitOutcome::Rewritten)
    }
}

#[test]
fn test_drain_skips_detached_nodes() {
    let mut arena = NodeArena::new();
    let a = arena.ident("a");
    let first = arena.expr_stmt(a);
    let b = arena.ident("b");
    let second = arena.expr_stmt(b);
    let c = arena.ident("c");
    let third = arena.expr_stmt(c);
    let root = arena.program(vec![first, second, third]);

    let mut names = UniqueNames::new();
    let stats = drain(&mut arena, &mut names, root, &mut DropFirst::default()).expect("settles");
    assert_eq!(Printer::print(&arena, root), "c;\n");
    assert_eq!(stats.rewrites, 1);
    // The revisit of `first` and the pending `second` were both dropped.
    assert_eq!(stats.skipped, 2);
}
