// tests/parser_tests.rs

use chainql::ast::{BinOp, Expr};
use chainql::error::ParseError;
use chainql::lexer::Lexer;
use chainql::parser::{Parser, parse_str};

fn parse(input: &str) -> Expr {
    parse_str(input).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e))
}

// ============================================================================
// Simple tests
// ============================================================================

#[test]
fn test_comparison() {
    let lexer = Lexer::new("@p.price > 100");
    let mut parser = Parser::new(lexer).unwrap();
    let expr = parser.parse().unwrap();

    assert!(matches!(
        expr,
        Expr::BinaryOp {
            op: BinOp::GreaterThan,
            ..
        }
    ));
}

#[test]
fn test_parentheses() {
    // Should be: Multiply(Add(1, 2), 3)
    match parse("(1 + 2) * 3") {
        Expr::BinaryOp {
            op: BinOp::Multiply,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Add, .. }));
            assert_eq!(*right, Expr::Integer(3));
        }
        other => panic!("Expected multiplication, got {:?}", other),
    }
}

#[test]
fn test_precedence_and_binds_tighter_than_or() {
    let expr = parse("@p.a == 1 or @p.b == 2 and @p.c == 3");
    match expr {
        Expr::BinaryOp {
            op: BinOp::Or,
            right,
            ..
        } => assert!(matches!(*right, Expr::BinaryOp { op: BinOp::And, .. })),
        other => panic!("Expected or at the top, got {:?}", other),
    }
}

#[test]
fn test_unary_minus() {
    assert_eq!(
        parse("-5"),
        Expr::binary(BinOp::Subtract, Expr::Integer(0), Expr::Integer(5))
    );
}

// ============================================================================
// Access
// ============================================================================

#[test]
fn test_member_access() {
    assert_eq!(
        parse("@p.address.city"),
        Expr::member(Expr::member(Expr::binding("p"), "address"), "city")
    );
}

#[test]
fn test_dynamic_access_keys() {
    assert_eq!(
        parse("@p[name]"),
        Expr::access(Expr::binding("p"), Expr::Key("name".to_string()))
    );
    assert_eq!(
        parse("@p[\"first name\"]"),
        Expr::access(Expr::binding("p"), Expr::Key("first name".to_string()))
    );
    assert_eq!(
        parse("@p.xs[0]"),
        Expr::access(Expr::member(Expr::binding("p"), "xs"), Expr::Integer(0))
    );
}

#[test]
fn test_existence_check() {
    assert_eq!(
        parse("@p.email[?]"),
        Expr::ExistenceCheck(Box::new(Expr::member(Expr::binding("p"), "email")))
    );
}

// ============================================================================
// Lambdas and chains
// ============================================================================

#[test]
fn test_lambda() {
    assert_eq!(
        parse("@p => @p.age + 1"),
        Expr::lambda(
            "p",
            Expr::binary(
                BinOp::Add,
                Expr::member(Expr::binding("p"), "age"),
                Expr::Integer(1)
            )
        )
    );
}

#[test]
fn test_lambda_body_stops_at_comma() {
    let expr = parse("$.set(@p => @p.n, 5)");
    match expr {
        Expr::MethodCall { method, args, .. } => {
            assert_eq!(method, "set");
            assert_eq!(args.len(), 2);
            assert!(matches!(args[0], Expr::Lambda { .. }));
            assert_eq!(args[1], Expr::Integer(5));
        }
        other => panic!("Expected method call, got {:?}", other),
    }
}

#[test]
fn test_chain_nests_outermost_last() {
    let expr = parse("$people.where(@p => @p.a).defer()");
    match expr {
        Expr::MethodCall { object, method, args } => {
            assert_eq!(method, "defer");
            assert!(args.is_empty());
            assert!(matches!(
                *object,
                Expr::MethodCall { ref method, .. } if method == "where"
            ));
        }
        other => panic!("Expected method call, got {:?}", other),
    }
}

#[test]
fn test_collection_literals() {
    assert_eq!(
        parse("[1, {\"a\": true, b: null}]"),
        Expr::Array(vec![
            Expr::Integer(1),
            Expr::Object(vec![
                ("a".to_string(), Expr::Boolean(true)),
                ("b".to_string(), Expr::Null),
            ]),
        ])
    );
}

#[test]
fn test_display_round_trips_through_parser() {
    let source = "$people.where(@p => @p.age >= 18).inc(@p => @p.visits, 1)";
    let expr = parse(source);
    assert_eq!(parse(&expr.to_string()), expr);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_bare_identifier_is_rejected() {
    let err = parse_str("age > 3").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken(_)));
    assert!(err.to_string().contains("@p.age"));
}

#[test]
fn test_trailing_tokens() {
    let err = parse_str("$people )").unwrap_err();
    assert!(matches!(err, ParseError::Expected { .. }));
}

#[test]
fn test_missing_close_paren() {
    assert!(parse_str("$.where(@p => @p.a == 1").is_err());
}

#[test]
fn test_lex_errors_surface() {
    let err = parse_str("$.where(@p => @p.a = 1)").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
}
