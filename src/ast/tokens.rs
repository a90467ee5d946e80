#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 0.5
    /// ```
    Float(f64),

    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 5
    /// ```
    Integer(i64),

    /// String literal enclosed in double or single quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'item #1'
    /// ```
    String(String),

    /// Boolean values
    Boolean(bool),

    /// Null value
    Null,

    /// The `absent` keyword: "this field should not exist"
    ///
    /// # Examples
    /// ```text
    /// .set(@p => @p.nickname, absent)
    /// ```
    Absent,

    // Sources and references
    /// Named collection source (`$name`)
    ///
    /// # Examples
    /// ```text
    /// $people
    /// $audit_log
    /// ```
    Collection(String),

    /// Bound source reference (`$` alone)
    Dollar,

    /// At-sign prefix for bindings
    ///
    /// # Examples
    /// ```text
    /// @p => @p.age > 18
    /// ```
    At,

    /// Field name, method name or keyword-less identifier
    ///
    /// # Examples
    /// ```text
    /// where
    /// push_each
    /// address
    /// ```
    Identifier(String),

    /// Lambda arrow (`=>`)
    FatArrow,

    /// Existence marker inside brackets (`[?]`)
    Question,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Logical
    /// Logical AND (word, not symbol)
    ///
    /// # Examples
    /// ```text
    /// @p.age > 18 and @p.verified == true
    /// ```
    And,

    /// Logical OR (word, not symbol)
    Or,

    // Delimiters
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,

    /// Dot for method calls or member access
    Dot,

    /// Comma for separating arguments or array elements
    Comma,

    /// Colon for object literal key-value pairs
    Colon,

    /// End of input
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Float(n) => write!(f, "{}", n),
            Token::Integer(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Boolean(b) => write!(f, "{}", b),
            Token::Null => write!(f, "null"),
            Token::Absent => write!(f, "absent"),
            Token::Collection(name) => write!(f, "${}", name),
            Token::Dollar => write!(f, "$"),
            Token::At => write!(f, "@"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::FatArrow => write!(f, "=>"),
            Token::Question => write!(f, "?"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
