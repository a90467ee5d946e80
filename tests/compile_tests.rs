// tests/compile_tests.rs

use chainql::assemble::{CompileOptions, Compiled, Documents, compile, compile_str};
use chainql::ast::{BinOp, Expr};
use chainql::error::CompileError;
use chainql::recognize::SourceRef;
use serde_json::{Value, json};

fn compile_ok(chain: &str) -> Compiled {
    compile_str(chain, &CompileOptions::default())
        .unwrap_or_else(|e| panic!("failed to compile {:?}: {}", chain, e))
}

fn compile_err(chain: &str) -> CompileError {
    compile_str(chain, &CompileOptions::default()).unwrap_err()
}

fn doc(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

// ============================================================================
// Modes
// ============================================================================

#[test]
fn test_immediate_query() {
    assert_eq!(
        compile_ok("$people.where(@p => @p.age > 18)"),
        Compiled::Query {
            query: doc(json!({"age": {"$gt": 18}})),
            source: Some(SourceRef::Named("people".to_string())),
        }
    );
}

#[test]
fn test_immediate_update() {
    assert_eq!(
        compile_ok("$.where(@p => @p.id == 7).update().set(@p => @p.name, \"Ann\")"),
        Compiled::Update {
            query: doc(json!({"id": 7})),
            update: doc(json!({"$set": {"name": "Ann"}})),
            source: Some(SourceRef::Root),
        }
    );
}

#[test]
fn test_deferred_query() {
    assert_eq!(
        compile_ok("$people.where(@p => @p.vip).defer()"),
        Compiled::Deferred(Documents::Query(doc(json!({"vip": true}))))
    );
}

#[test]
fn test_deferred_update() {
    let Compiled::Deferred(documents) = compile_ok("$people.inc(@p => @p.visits, 1).defer()") else {
        panic!("expected deferred documents");
    };
    assert_eq!(
        documents.to_value(),
        json!({"query": {}, "update": {"$inc": {"visits": 1}}})
    );
}

#[test]
fn test_update_marker_alone_is_a_query() {
    assert!(matches!(
        compile_ok("$people.where(@p => @p.a == 1).update()"),
        Compiled::Query { .. }
    ));
}

#[test]
fn test_mixed_steps_in_any_order() {
    let Compiled::Update { query, update, .. } = compile_ok(
        "$.inc(@p => @p.n, 1).where(@p => @p.a == 1).push(@p => @p.xs, 2).where(@p => @p.b == 2)",
    ) else {
        panic!("expected update");
    };
    assert_eq!(query, doc(json!({"a": 1, "b": 2})));
    assert_eq!(update, doc(json!({"$inc": {"n": 1}, "$push": {"xs": 2}})));
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn test_literal_source() {
    let chain = "[{\"a\": 1}, {\"a\": 2}].where(@p => @p.a == 1)";
    assert_eq!(
        compile_ok(chain),
        Compiled::Query {
            query: doc(json!({"a": 1})),
            source: Some(SourceRef::Literal(vec![json!({"a": 1}), json!({"a": 2})])),
        }
    );
}

#[test]
fn test_literal_source_must_be_constant() {
    assert!(matches!(
        compile_err("[@p.a].where(@p => @p.a == 1)"),
        CompileError::UnrecognizedShape { .. }
    ));
}

#[test]
fn test_bare_source() {
    assert_eq!(
        compile_ok("$"),
        Compiled::Query {
            query: doc(json!({})),
            source: Some(SourceRef::Root),
        }
    );
}

// ============================================================================
// Built trees
// ============================================================================

#[test]
fn test_compiles_a_tree_built_in_code() {
    let chain = Expr::call(
        Expr::call(
            Expr::Collection("people".to_string()),
            "where",
            vec![Expr::lambda(
                "p",
                Expr::binary(
                    BinOp::GreaterEqual,
                    Expr::access(Expr::binding("p"), Expr::String("age".to_string())),
                    Expr::Integer(21),
                ),
            )],
        ),
        "defer",
        vec![],
    );

    let compiled = compile(&chain, &CompileOptions::default()).unwrap();
    assert_eq!(
        compiled,
        Compiled::Deferred(Documents::Query(doc(json!({"age": {"$gte": 21}}))))
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_method() {
    assert_eq!(
        compile_err("$.select(@p => @p.a)"),
        CompileError::UnrecognizedShape {
            node: "$.select(@p => @p.a)".to_string()
        }
    );
}

#[test]
fn test_wrong_argument_count() {
    assert!(matches!(
        compile_err("$.set(@p => @p.a)"),
        CompileError::UnrecognizedShape { .. }
    ));
    assert!(matches!(
        compile_err("$.pop_back(@p => @p.a, 1)"),
        CompileError::UnrecognizedShape { .. }
    ));
    assert!(matches!(
        compile_err("$.defer(1)"),
        CompileError::UnrecognizedShape { .. }
    ));
}

#[test]
fn test_where_needs_a_lambda() {
    assert!(matches!(
        compile_err("$.where(true)"),
        CompileError::UnrecognizedShape { .. }
    ));
}

#[test]
fn test_unresolvable_target_stops_compilation() {
    assert!(matches!(
        compile_err("$.set(@p => @p, 1)"),
        CompileError::UnresolvablePath { .. }
    ));
    assert!(matches!(
        compile_err("$.push_each(@p => @p.xs, [1]).sort_by(@e => 1)"),
        CompileError::UnresolvablePath { .. }
    ));
}

#[test]
fn test_misplaced_defer() {
    assert_eq!(
        compile_err("$.defer().set(@p => @p.a, 1)"),
        CompileError::MisplacedDefer
    );
}

#[test]
fn test_then_sort_without_sort() {
    assert_eq!(
        compile_err("$.push_each(@p => @p.xs, [1]).then_sort_by(@e => @e.a)"),
        CompileError::ThenSortWithoutSort
    );
    assert_eq!(
        compile_err("$.push_each(@p => @p.xs, [1]).slice(2).then_sort_by_descending(@e => @e.a)"),
        CompileError::ThenSortWithoutSort
    );
}

#[test]
fn test_modifier_needs_push_each() {
    assert!(matches!(
        compile_err("$.where(@p => @p.a == 1).slice(2)"),
        CompileError::UnrecognizedShape { .. }
    ));
}

#[test]
fn test_not_a_chain() {
    assert!(matches!(
        compile_err("1 + 2"),
        CompileError::UnrecognizedShape { .. }
    ));
}

#[test]
fn test_parse_errors_are_compile_errors() {
    assert!(matches!(compile_err("$.where("), CompileError::Parse(_)));
}
