//! Conversion of literal sub-expressions to wire values.
//!
//! `encode` is the only way operands reach a document. It accepts literals,
//! arrays and objects of encodable expressions, and constant arithmetic,
//! which is folded with decimal precision so integer results stay integers.
//! Everything else (bindings, sources, `absent`, calls, lambdas,
//! comparisons) is not a value and yields `None`.

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde_json::{Map, Number, Value};

use crate::ast::{BinOp, Expr};

/// An insertion-ordered wire document.
pub type Document = Map<String, Value>;

/// Convert an expression to its wire value, if it is a constant.
///
/// # Examples
/// ```
/// use chainql::{parser::parse_str, wire::encode};
/// use serde_json::json;
///
/// assert_eq!(encode(&parse_str("[1, -2, 3 * 2]").unwrap()), Some(json!([1, -2, 6])));
/// assert_eq!(encode(&parse_str("@p.age").unwrap()), None);
/// ```
pub fn encode(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Null => Some(Value::Null),
        Expr::Boolean(b) => Some(Value::Bool(*b)),
        Expr::Integer(n) => Some(Value::from(*n)),
        Expr::Float(n) => Number::from_f64(*n).map(Value::Number),
        Expr::String(s) => Some(Value::String(s.clone())),
        Expr::Array(items) => items
            .iter()
            .map(encode)
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        Expr::Object(pairs) => {
            let mut doc = Document::new();
            for (key, value) in pairs {
                doc.insert(key.clone(), encode(value)?);
            }
            Some(Value::Object(doc))
        }
        Expr::BinaryOp { op, left, right } => fold(*op, &encode(left)?, &encode(right)?),
        _ => None,
    }
}

/// Arithmetic negation of a numeric wire value.
pub fn negate(value: &Value) -> Option<Value> {
    let number = value.as_number()?;
    if let Some(n) = number.as_i64() {
        return n.checked_neg().map(Value::from);
    }
    number
        .as_f64()
        .and_then(|n| Number::from_f64(-n))
        .map(Value::Number)
}

fn fold(op: BinOp, left: &Value, right: &Value) -> Option<Value> {
    if let (BinOp::Add, Value::String(a), Value::String(b)) = (op, left, right) {
        return Some(Value::String(format!("{}{}", a, b)));
    }

    let a = to_decimal(left)?;
    let b = to_decimal(right)?;
    let result = match op {
        BinOp::Add => a.checked_add(b)?,
        BinOp::Subtract => a.checked_sub(b)?,
        BinOp::Multiply => a.checked_mul(b)?,
        BinOp::Divide => a.checked_div(b)?,
        BinOp::Modulo => a.checked_rem(b)?,
        _ => return None,
    };

    // Two floats stay a float; anything whole otherwise becomes an integer
    let both_floats = is_float(left) && is_float(right);
    from_decimal(result, both_floats)
}

fn is_float(value: &Value) -> bool {
    value.as_number().is_some_and(|n| !n.is_i64() && !n.is_u64())
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    let number = value.as_number()?;
    if let Some(n) = number.as_i64() {
        Some(Decimal::from(n))
    } else {
        Decimal::from_f64(number.as_f64()?)
    }
}

fn from_decimal(value: Decimal, keep_float: bool) -> Option<Value> {
    if !keep_float
        && value.is_integer()
        && let Some(n) = value.to_i64()
    {
        return Some(Value::from(n));
    }
    value
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn int(n: i64) -> Expr {
        Expr::Integer(n)
    }

    #[test]
    fn test_unary_minus_folds_to_negative_integer() {
        let expr = Expr::binary(BinOp::Subtract, int(0), int(5));
        assert_eq!(encode(&expr), Some(json!(-5)));
    }

    #[test]
    fn test_float_addition_stays_float() {
        let expr = Expr::binary(BinOp::Add, Expr::Float(0.5), Expr::Float(0.25));
        assert_eq!(encode(&expr), Some(json!(0.75)));
    }

    #[test]
    fn test_mixed_whole_result_is_integer() {
        let expr = Expr::binary(BinOp::Add, int(1), Expr::Float(1.0));
        assert_eq!(encode(&expr), Some(json!(2)));
    }

    #[test]
    fn test_division_by_zero_is_not_encodable() {
        let expr = Expr::binary(BinOp::Divide, int(1), int(0));
        assert_eq!(encode(&expr), None);
    }

    #[test]
    fn test_absent_is_not_a_value() {
        assert_eq!(encode(&Expr::Absent), None);
        assert_eq!(encode(&Expr::Array(vec![int(1), Expr::Absent])), None);
    }

    #[test]
    fn test_negate() {
        assert_eq!(negate(&json!(3)), Some(json!(-3)));
        assert_eq!(negate(&json!(1.5)), Some(json!(-1.5)));
        assert_eq!(negate(&json!("x")), None);
    }
}
