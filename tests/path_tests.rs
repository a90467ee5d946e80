// tests/path_tests.rs

use chainql::ast::Expr;
use chainql::error::CompileError;
use chainql::parser::parse_str;
use chainql::path::{Binding, PathSegment, references, resolve, resolve_on};

fn dotted(input: &str) -> String {
    let (_, path) = resolve(&parse_str(input).unwrap()).unwrap();
    path.dotted()
}

fn unresolvable(input: &str) -> bool {
    matches!(
        resolve(&parse_str(input).unwrap()),
        Err(CompileError::UnresolvablePath { .. })
    )
}

// ============================================================================
// Both surface forms
// ============================================================================

#[test]
fn test_static_member_access() {
    assert_eq!(dotted("@p => @p.name"), "name");
    assert_eq!(dotted("@p => @p.address.city"), "address.city");
}

#[test]
fn test_dynamic_access() {
    assert_eq!(dotted("@p => @p[\"name\"]"), "name");
    assert_eq!(dotted("@p => @p[name]"), "name");
    assert_eq!(dotted("@p => @p[\"address\"][\"city\"]"), "address.city");
}

#[test]
fn test_mixed_forms_agree() {
    assert_eq!(dotted("@p => @p.address[\"city\"]"), dotted("@p => @p[address].city"));
}

#[test]
fn test_array_positions() {
    let (_, path) = resolve(&parse_str("@p => @p.scores[0]").unwrap()).unwrap();
    assert_eq!(
        path.segments(),
        &[
            PathSegment::Field("scores".to_string()),
            PathSegment::Index(0)
        ]
    );
    assert_eq!(path.dotted(), "scores.0");
}

#[test]
fn test_bare_access_chain_without_lambda() {
    let (binding, path) = resolve(&parse_str("@row.a.b").unwrap()).unwrap();
    assert_eq!(binding, Binding::new("row"));
    assert_eq!(path.to_string(), "a.b");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unresolvable_shapes() {
    assert!(unresolvable("@p => @p"));
    assert!(unresolvable("@p => @q.name"));
    assert!(unresolvable("@p => @p[@p.key]"));
    assert!(unresolvable("@p => @p.xs[0 - 1]"));
    assert!(unresolvable("@p => $.name"));
    assert!(unresolvable("@p => @p.name.matches(\"x\")"));
    assert!(unresolvable("42"));
}

#[test]
fn test_error_names_the_node() {
    let err = resolve(&parse_str("@p => @q.name").unwrap()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot resolve a field path from @p => @q.name"
    );
}

// ============================================================================
// Binding identity
// ============================================================================

#[test]
fn test_resolve_on_checks_the_binding() {
    let expr = parse_str("@p.age").unwrap();
    assert!(resolve_on(&expr, &Binding::new("p")).is_some());
    assert!(resolve_on(&expr, &Binding::new("q")).is_none());
}

#[test]
fn test_references() {
    let p = Binding::new("p");
    assert!(references(&parse_str("@p.a + 1").unwrap(), &p));
    assert!(references(&parse_str("[1, {x: @p.b}]").unwrap(), &p));
    assert!(!references(&parse_str("1 + 2").unwrap(), &p));
    assert!(!references(&Expr::lambda("p", Expr::binding("p")), &p));
}
