use std::fmt;

use crate::ast::BinOp;

/// Syntax tree node for a chain and everything inside its arguments.
///
/// Nodes are immutable once built; the compiler only borrows them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Literal floating point number
    Float(f64),

    /// Literal integer
    Integer(i64),

    /// String literal
    String(String),

    /// Boolean literal
    Boolean(bool),

    /// Null literal
    Null,

    /// The `absent` keyword
    ///
    /// Only meaningful as the value of `set`, where it compiles to `$unset`.
    Absent,

    // Sources
    /// Bound source (`$`)
    ///
    /// Resolved by the dispatcher to the scope the caller bound as root.
    Root,

    /// Named collection source (`$name`)
    Collection(String),

    // References
    /// Binding reference (`@name`)
    ///
    /// The placeholder for the current document inside a lambda.
    Binding(String),

    /// Field name used as the key of a dynamic access.
    /// Only appears as the `key` in `Expr::Access`.
    Key(String),

    // Access
    /// Dynamic (indexed) access
    ///
    /// # Examples
    /// ```text
    /// @p["name"]
    /// @p[name]
    /// @p[tags][0]
    /// ```
    Access {
        object: Box<Expr>,
        key: Box<Expr>,
    },

    /// Static member access
    ///
    /// # Examples
    /// ```text
    /// @p.name
    /// @p.address.city
    /// ```
    Member {
        object: Box<Expr>,
        name: String,
    },

    /// Existence check (`[?]`)
    ExistenceCheck(Box<Expr>),

    // Operations
    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Method call; chains are nested method calls
    ///
    /// # Examples
    /// ```text
    /// $people.where(@p => @p.age > 18)
    /// @p.name.matches("^A")
    /// ```
    MethodCall {
        object: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },

    /// Single-parameter lambda
    ///
    /// # Example
    /// ```text
    /// @p => @p.visits + 1
    /// ```
    Lambda {
        param: String,
        body: Box<Expr>,
    },

    // Object and Array Literals
    /// Object literal
    Object(Vec<(String, Expr)>),

    /// Array literal
    Array(Vec<Expr>),
}

impl Expr {
    pub fn access(object: Expr, key: Expr) -> Expr {
        Expr::Access {
            object: Box::new(object),
            key: Box::new(key),
        }
    }

    pub fn member(object: Expr, name: impl Into<String>) -> Expr {
        Expr::Member {
            object: Box::new(object),
            name: name.into(),
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(object: Expr, method: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::MethodCall {
            object: Box::new(object),
            method: method.into(),
            args,
        }
    }

    pub fn lambda(param: impl Into<String>, body: Expr) -> Expr {
        Expr::Lambda {
            param: param.into(),
            body: Box::new(body),
        }
    }

    pub fn binding(name: impl Into<String>) -> Expr {
        Expr::Binding(name.into())
    }
}

/// Renders the node back to chain syntax, used in error messages.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Float(n) => write!(f, "{:?}", n),
            Expr::Integer(n) => write!(f, "{}", n),
            Expr::String(s) => write!(f, "{:?}", s),
            Expr::Boolean(b) => write!(f, "{}", b),
            Expr::Null => write!(f, "null"),
            Expr::Absent => write!(f, "absent"),
            Expr::Root => write!(f, "$"),
            Expr::Collection(name) => write!(f, "${}", name),
            Expr::Binding(name) => write!(f, "@{}", name),
            Expr::Key(name) => write!(f, "{}", name),
            Expr::Access { object, key } => write!(f, "{}[{}]", object, key),
            Expr::Member { object, name } => write!(f, "{}.{}", object, name),
            Expr::ExistenceCheck(inner) => write!(f, "{}[?]", inner),
            Expr::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                write!(f, "{}.{}(", object, method)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::Lambda { param, body } => write!(f, "@{} => {}", param, body),
            Expr::Object(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Expr::Array(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
