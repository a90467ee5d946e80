// tests/lexer_tests.rs

use chainql::ast::Token;
use chainql::error::LexError;
use chainql::lexer::Lexer;

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("$", Token::Dollar),
        ("@", Token::At),
        ("?", Token::Question),
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("*", Token::Star),
        ("/", Token::Slash),
        ("%", Token::Percent),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        (".", Token::Dot),
        (",", Token::Comma),
        (":", Token::Colon),
        ("<", Token::Lt),
        (">", Token::Gt),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

// ============================================================================
// Two Character Tokens
// ============================================================================

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("==", Token::EqEq),
        ("!=", Token::NotEq),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
        ("=>", Token::FatArrow),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.next_token().unwrap(), expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_lone_equals_is_an_error() {
    let mut lexer = Lexer::new("@p.a = 1");
    for _ in 0..4 {
        lexer.next_token().unwrap();
    }
    assert_eq!(lexer.next_token(), Err(LexError::LoneEquals { position: 5 }));
}

#[test]
fn test_bang_alone_is_an_error() {
    let err = Lexer::new("!x").next_token().unwrap_err();
    assert_eq!(err, LexError::UnexpectedChar { ch: '!', position: 0 });
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn test_collection_source() {
    assert_eq!(
        tokens("$people"),
        vec![Token::Collection("people".to_string()), Token::Eof]
    );
}

#[test]
fn test_root_followed_by_dot() {
    assert_eq!(
        tokens("$.where"),
        vec![
            Token::Dollar,
            Token::Dot,
            Token::Identifier("where".to_string()),
            Token::Eof
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(tokens("42"), vec![Token::Integer(42), Token::Eof]);
    assert_eq!(tokens("3.25"), vec![Token::Float(3.25), Token::Eof]);
}

#[test]
fn test_integer_then_member() {
    // `1.x` is not a float
    assert_eq!(
        tokens("1.x"),
        vec![
            Token::Integer(1),
            Token::Dot,
            Token::Identifier("x".to_string()),
            Token::Eof
        ]
    );
}

#[test]
fn test_number_overflow() {
    let err = Lexer::new("99999999999999999999").next_token().unwrap_err();
    assert!(matches!(err, LexError::InvalidNumber { position: 0, .. }));
}

#[test]
fn test_strings_with_both_quotes() {
    assert_eq!(
        tokens(r#""a b" 'c'"#),
        vec![
            Token::String("a b".to_string()),
            Token::String("c".to_string()),
            Token::Eof
        ]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        tokens(r#""line\n\"quoted\"\\""#),
        vec![Token::String("line\n\"quoted\"\\".to_string()), Token::Eof]
    );
}

#[test]
fn test_invalid_escape() {
    let err = Lexer::new(r#""\q""#).next_token().unwrap_err();
    assert_eq!(err, LexError::InvalidEscape { ch: 'q', position: 2 });
}

#[test]
fn test_unterminated_string() {
    let err = Lexer::new("  \"open").next_token().unwrap_err();
    assert_eq!(err, LexError::UnterminatedString { position: 2 });
}

// ============================================================================
// Whole chains
// ============================================================================

#[test]
fn test_chain() {
    assert_eq!(
        tokens("$people.where(@p => @p[\"age\"] >= 18)"),
        vec![
            Token::Collection("people".to_string()),
            Token::Dot,
            Token::Identifier("where".to_string()),
            Token::LParen,
            Token::At,
            Token::Identifier("p".to_string()),
            Token::FatArrow,
            Token::At,
            Token::Identifier("p".to_string()),
            Token::LBracket,
            Token::String("age".to_string()),
            Token::RBracket,
            Token::GtEq,
            Token::Integer(18),
            Token::RParen,
            Token::Eof,
        ]
    );
}

#[test]
fn test_position_advances() {
    let mut lexer = Lexer::new("  absent");
    assert_eq!(lexer.next_token().unwrap(), Token::Absent);
    assert_eq!(lexer.position(), 8);
}
