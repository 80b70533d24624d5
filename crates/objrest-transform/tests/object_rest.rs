use objrest_ast::{DeclarationKind, Node, NodeArena, NodeIndex, Printer};
use objrest_transform::keys::normalize_key;
use objrest_transform::object_rest::{collect_rest_sites, find_rest};
use objrest_transform::{
    Helper, HelperRegistry, ObjectRestSpread, ObjectRestSpreadOptions, TransformError,
};

fn declare(arena: &mut NodeArena, kind: DeclarationKind, id: NodeIndex, init: NodeIndex) -> NodeIndex {
    let declarator = arena.declarator(id, init);
    let decl = arena.var_declaration(kind, vec![declarator]);
    arena.program(vec![decl])
}

fn lower(arena: &mut NodeArena, root: NodeIndex) -> String {
    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    pass.run(arena, root).expect("pass succeeds");
    Printer::print(arena, root)
}

/// `{ a, ...rest }`
fn a_and_rest(arena: &mut NodeArena) -> NodeIndex {
    let a = arena.shorthand("a");
    let rest = arena.rest_ident("rest");
    arena.object_pattern(vec![a, rest])
}

#[test]
fn test_rest_after_named_property() {
    let mut arena = NodeArena::new();
    let pattern = a_and_rest(&mut arena);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);

    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    pass.run(&mut arena, root).expect("pass succeeds");
    assert_eq!(
        Printer::print(&arena, root),
        "const a = obj.a;\nconst rest = _objectWithoutProperties(obj, [\"a\"]);\n"
    );
    let used: Vec<Helper> = pass.helpers().used().collect();
    assert_eq!(used, vec![Helper::ObjectWithoutProperties]);
}

#[test]
fn test_literal_source_is_bound_to_temporary() {
    let mut arena = NodeArena::new();
    let pattern = a_and_rest(&mut arena);
    let one = arena.number("1");
    let a = arena.property("a", one);
    let init = arena.object(vec![a]);
    let root = declare(&mut arena, DeclarationKind::Const, pattern, init);
    assert_eq!(
        lower(&mut arena, root),
        "const _ref = { a: 1 }, a = _ref.a;\nconst rest = _objectWithoutProperties(_ref, [\"a\"]);\n"
    );
}

#[test]
fn test_call_source_is_evaluated_once_for_lone_rest() {
    let mut arena = NodeArena::new();
    let rest = arena.rest_ident("rest");
    let pattern = arena.object_pattern(vec![rest]);
    let f = arena.ident("f");
    let init = arena.call(f, vec![]);
    let root = declare(&mut arena, DeclarationKind::Const, pattern, init);
    assert_eq!(
        lower(&mut arena, root),
        "const _ref = f();\nconst rest = _objectWithoutProperties(_ref, []);\n"
    );
}

#[test]
fn test_lone_rest_removes_original_declaration() {
    let mut arena = NodeArena::new();
    let rest = arena.rest_ident("rest");
    let pattern = arena.object_pattern(vec![rest]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);
    assert_eq!(
        lower(&mut arena, root),
        "const rest = _objectWithoutProperties(obj, []);\n"
    );
}

#[test]
fn test_nested_rest_uses_member_chain_source() {
    let mut arena = NodeArena::new();
    let y = arena.shorthand("y");
    let rest = arena.rest_ident("rest");
    let inner = arena.object_pattern(vec![y, rest]);
    let x = arena.property("x", inner);
    let pattern = arena.object_pattern(vec![x]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);
    assert_eq!(
        lower(&mut arena, root),
        "const y = obj.x.y;\nconst rest = _objectWithoutProperties(obj.x, [\"y\"]);\n"
    );
}

#[test]
fn test_outer_and_inner_rest_sites() {
    let mut arena = NodeArena::new();
    let a = arena.shorthand("a");
    let inner_rest = arena.rest_ident("inner");
    let inner = arena.object_pattern(vec![inner_rest]);
    let b = arena.property("b", inner);
    let rest = arena.rest_ident("rest");
    let pattern = arena.object_pattern(vec![a, b, rest]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);

    let sites = collect_rest_sites(&arena, pattern).expect("well-formed pattern");
    assert_eq!(sites.as_slice(), [pattern, inner]);

    assert_eq!(
        lower(&mut arena, root),
        "const a = obj.a;\n\
         const rest = _objectWithoutProperties(obj, [\"a\", \"b\"]), \
         inner = _objectWithoutProperties(obj.b, []);\n"
    );
}

#[test]
fn test_only_nested_rest_empties_outer_pattern() {
    let mut arena = NodeArena::new();
    let r = arena.rest_ident("r");
    let inner = arena.object_pattern(vec![r]);
    let x = arena.property("x", inner);
    let pattern = arena.object_pattern(vec![x]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Let, pattern, obj);
    assert_eq!(
        lower(&mut arena, root),
        "let r = _objectWithoutProperties(obj.x, []);\n"
    );
}

#[test]
fn test_rest_behind_default_is_extracted_after_lowering() {
    let mut arena = NodeArena::new();
    let y = arena.shorthand("y");
    let r = arena.rest_ident("r");
    let inner = arena.object_pattern(vec![y, r]);
    let fallback = arena.object(vec![]);
    let defaulted = arena.assignment_pattern(inner, fallback);
    let x = arena.property("x", defaulted);
    let pattern = arena.object_pattern(vec![x]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);

    let sites = collect_rest_sites(&arena, pattern).expect("well-formed pattern");
    assert!(sites.is_empty());

    assert_eq!(
        lower(&mut arena, root),
        "const _ref = obj.x, _ref2 = _ref === void 0 ? {} : _ref, y = _ref2.y;\n\
         const r = _objectWithoutProperties(_ref2, [\"y\"]);\n"
    );
}

#[test]
fn test_rest_inside_array_element() {
    let mut arena = NodeArena::new();
    let a = arena.shorthand("a");
    let r = arena.rest_ident("r");
    let inner = arena.object_pattern(vec![a, r]);
    let array = arena.array_pattern(vec![NodeIndex::NONE, inner]);
    let x = arena.property("x", array);
    let pattern = arena.object_pattern(vec![x]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);
    assert_eq!(
        lower(&mut arena, root),
        "const _ref = obj.x, a = _ref[1].a;\n\
         const r = _objectWithoutProperties(obj.x[1], [\"a\"]);\n"
    );
}

#[test]
fn test_computed_key_is_excluded_by_value() {
    let mut arena = NodeArena::new();
    let k = arena.ident("k");
    let v = arena.ident("v");
    let computed = arena.computed_property(k, v);
    let rest = arena.rest_ident("rest");
    let pattern = arena.object_pattern(vec![computed, rest]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);
    assert_eq!(
        lower(&mut arena, root),
        "const v = obj[k];\nconst rest = _objectWithoutProperties(obj, [k]);\n"
    );
}

#[test]
fn test_literal_keys_are_excluded_as_strings() {
    let mut arena = NodeArena::new();
    let key_one = arena.number("1");
    let one = arena.ident("one");
    let numeric = arena.keyed_property(key_one, one);
    let key_bc = arena.string_literal("b-c");
    let bc = arena.ident("bc");
    let string = arena.keyed_property(key_bc, bc);
    let rest = arena.rest_ident("rest");
    let pattern = arena.object_pattern(vec![numeric, string, rest]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Var, pattern, obj);
    assert_eq!(
        lower(&mut arena, root),
        "var one = obj[1], bc = obj[\"b-c\"];\n\
         var rest = _objectWithoutProperties(obj, [\"1\", \"b-c\"]);\n"
    );
}

#[test]
fn test_numeric_keys_are_excluded_by_property_name() {
    for (raw, expected) in [
        ("1.50", "1.5"),
        ("0x10", "16"),
        ("0b101", "5"),
        ("1e3", "1000"),
        ("1e21", "1e+21"),
        ("1e-7", "1e-7"),
        (".5", "0.5"),
        ("010", "8"),
        ("019", "19"),
        ("1_000", "1000"),
    ] {
        let mut arena = NodeArena::new();
        let key = arena.number(raw);
        let value = arena.ident("v");
        let property = arena.keyed_property(key, value);
        let normalized = normalize_key(&mut arena, property);
        assert_eq!(
            arena.get(normalized),
            Some(&Node::StringLiteral {
                value: expected.to_string()
            }),
            "{raw}"
        );
    }
}

#[test]
fn test_declaration_kind_is_preserved() {
    let mut arena = NodeArena::new();
    let pattern = a_and_rest(&mut arena);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Let, pattern, obj);
    assert_eq!(
        lower(&mut arena, root),
        "let a = obj.a;\nlet rest = _objectWithoutProperties(obj, [\"a\"]);\n"
    );
}

#[test]
fn test_misplaced_rest_is_rejected() {
    let mut arena = NodeArena::new();
    let rest = arena.rest_ident("rest");
    let a = arena.shorthand("a");
    let pattern = arena.object_pattern(vec![rest, a]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);

    assert!(matches!(
        find_rest(&arena, pattern),
        Err(TransformError::MisplacedRestElement { rest: found }) if found == rest
    ));
    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    let err = pass.run(&mut arena, root).expect_err("misplaced rest");
    assert_eq!(err.code(), 9101);
    assert!(!err.is_config_error());
}

#[test]
fn test_duplicate_rest_is_rejected() {
    let mut arena = NodeArena::new();
    let first = arena.rest_ident("first");
    let second = arena.rest_ident("second");
    let pattern = arena.object_pattern(vec![first, second]);
    let obj = arena.ident("obj");
    let root = declare(&mut arena, DeclarationKind::Const, pattern, obj);

    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    let err = pass.run(&mut arena, root).expect_err("duplicate rest");
    assert!(matches!(err, TransformError::DuplicateRestElement { pattern: found } if found == pattern));
    assert_eq!(err.code(), 9102);
}

#[test]
fn test_second_run_is_a_no_op() {
    let mut arena = NodeArena::new();
    let pattern = a_and_rest(&mut arena);
    let f = arena.ident("f");
    let init = arena.call(f, vec![]);
    let root = declare(&mut arena, DeclarationKind::Const, pattern, init);
    let first = lower(&mut arena, root);

    let mut pass = ObjectRestSpread::new(ObjectRestSpreadOptions::default(), HelperRegistry::new());
    let stats = pass.run(&mut arena, root).expect("pass succeeds");
    assert_eq!(stats.rewrites, 0);
    assert_eq!(Printer::print(&arena, root), first);
    assert!(pass.helpers().is_empty());
}
