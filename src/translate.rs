//! Per-operation clause translators.
//!
//! Every operation of the chain vocabulary has exactly one [`Operator`] tag,
//! and [`Operator::translator`] is the single table mapping a tag to its
//! translator. There are three kinds:
//!
//! - **Generic** translators look at the shape of the value expression to
//!   pick the wire operator (`where`, `set`, `unset`).
//! - **Fixed** translators always emit the same operator and only encode the
//!   operand (`push`, `pull`, `pop_*`, `bit_*`, `add_to_set*`, `inc`, `dec`).
//! - **Modifier** translators produce a [`Patch`] for an already emitted
//!   `$push ... $each` fragment (`slice`, `sort_by*`, `then_sort_by*`).
//!
//! A translator returns `None` when its operand has no wire form.

use regex::Regex;
use serde_json::Value;

use crate::{
    ast::{BinOp, Expr},
    error::CompileError,
    patch::{Direction, Patch},
    path::{Binding, FieldPath, resolve, resolve_on},
    wire::{Document, encode, negate},
};

/// One key/value pair of a query or update document.
///
/// For updates the key is the operator (`{"$inc": {"count": 1}}`); for
/// queries it is a field or a logical operator (`{"age": {"$gt": 18}}`).
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub key: String,
    pub value: Value,
}

impl Clause {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Clause {
            key: key.into(),
            value,
        }
    }

    /// `{operator: {field: operand}}`
    fn update(operator: &str, path: &FieldPath, operand: Value) -> Self {
        Clause::new(operator, single(path.dotted(), operand))
    }

    /// The clause as a one-key document.
    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        doc.insert(self.key, self.value);
        doc
    }
}

fn single(key: impl Into<String>, value: Value) -> Value {
    let mut doc = Document::new();
    doc.insert(key.into(), value);
    Value::Object(doc)
}

pub type TranslateFn = fn(&Binding, Option<&FieldPath>, &Expr) -> Option<Clause>;
pub type PatchFn = fn(&Expr) -> Result<Option<Patch>, CompileError>;

/// How an operator turns its step into document content.
#[derive(Clone, Copy)]
pub enum Translator {
    Generic(TranslateFn),
    Fixed(TranslateFn),
    Modifier(PatchFn),
}

/// The closed vocabulary of chain operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Filter,
    Set,
    Unset,
    Increment,
    Decrement,
    AddToSet,
    AddToSetEach,
    Push,
    PushEach,
    Slice,
    SortBy,
    SortByDescending,
    ThenSortBy,
    ThenSortByDescending,
    PopFront,
    PopBack,
    Pull,
    PullAll,
    BitAnd,
    BitOr,
}

impl Operator {
    pub const ALL: [Operator; 20] = [
        Operator::Filter,
        Operator::Set,
        Operator::Unset,
        Operator::Increment,
        Operator::Decrement,
        Operator::AddToSet,
        Operator::AddToSetEach,
        Operator::Push,
        Operator::PushEach,
        Operator::Slice,
        Operator::SortBy,
        Operator::SortByDescending,
        Operator::ThenSortBy,
        Operator::ThenSortByDescending,
        Operator::PopFront,
        Operator::PopBack,
        Operator::Pull,
        Operator::PullAll,
        Operator::BitAnd,
        Operator::BitOr,
    ];

    /// Method name in chain syntax.
    pub fn method(self) -> &'static str {
        match self {
            Operator::Filter => "where",
            Operator::Set => "set",
            Operator::Unset => "unset",
            Operator::Increment => "inc",
            Operator::Decrement => "dec",
            Operator::AddToSet => "add_to_set",
            Operator::AddToSetEach => "add_to_set_each",
            Operator::Push => "push",
            Operator::PushEach => "push_each",
            Operator::Slice => "slice",
            Operator::SortBy => "sort_by",
            Operator::SortByDescending => "sort_by_descending",
            Operator::ThenSortBy => "then_sort_by",
            Operator::ThenSortByDescending => "then_sort_by_descending",
            Operator::PopFront => "pop_front",
            Operator::PopBack => "pop_back",
            Operator::Pull => "pull",
            Operator::PullAll => "pull_all",
            Operator::BitAnd => "bit_and",
            Operator::BitOr => "bit_or",
        }
    }

    pub fn from_method(name: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.method() == name)
    }

    pub fn is_modifier(self) -> bool {
        matches!(self.translator(), Translator::Modifier(_))
    }

    /// The dispatch table.
    pub fn translator(self) -> Translator {
        match self {
            Operator::Filter => Translator::Generic(filter),
            Operator::Set | Operator::Unset => Translator::Generic(set),
            Operator::Increment => Translator::Fixed(increment),
            Operator::Decrement => Translator::Fixed(decrement),
            Operator::AddToSet => Translator::Fixed(add_to_set),
            Operator::AddToSetEach => Translator::Fixed(add_to_set_each),
            Operator::Push => Translator::Fixed(push),
            Operator::PushEach => Translator::Fixed(push_each),
            Operator::PopFront => Translator::Fixed(pop_front),
            Operator::PopBack => Translator::Fixed(pop_back),
            Operator::Pull => Translator::Fixed(pull),
            Operator::PullAll => Translator::Fixed(pull_all),
            Operator::BitAnd => Translator::Fixed(bit_and),
            Operator::BitOr => Translator::Fixed(bit_or),
            Operator::Slice => Translator::Modifier(slice),
            Operator::SortBy => Translator::Modifier(sort_by),
            Operator::SortByDescending => Translator::Modifier(sort_by_descending),
            Operator::ThenSortBy => Translator::Modifier(then_sort_by),
            Operator::ThenSortByDescending => Translator::Modifier(then_sort_by_descending),
        }
    }
}

// ============================================================================
// Generic translators
// ============================================================================

/// Predicate body → query clause.
fn filter(binding: &Binding, _path: Option<&FieldPath>, expr: &Expr) -> Option<Clause> {
    predicate(binding, expr)
}

/// `set` and `unset`: the value's shape decides between `$inc`, `$unset`
/// and `$set`.
fn set(binding: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let path = path?;

    match value {
        Expr::Absent => return Some(Clause::update("$unset", path, Value::from(1))),

        // field + k, k + field
        Expr::BinaryOp {
            op: BinOp::Add,
            left,
            right,
        } => {
            if let Some(k) = step_against(binding, path, left, right)
                .or_else(|| step_against(binding, path, right, left))
            {
                return Some(Clause::update("$inc", path, k));
            }
        }

        // field - k
        Expr::BinaryOp {
            op: BinOp::Subtract,
            left,
            right,
        } => {
            if let Some(k) = step_against(binding, path, left, right) {
                return Some(Clause::update("$inc", path, negate(&k)?));
            }
        }

        _ => {}
    }

    // Any other use of the row has no update operator
    if crate::path::references(value, binding) {
        return None;
    }
    Some(Clause::update("$set", path, encode(value)?))
}

/// `Some(k)` when `field` is the target path on `binding` and `constant`
/// encodes to a number.
fn step_against(binding: &Binding, path: &FieldPath, field: &Expr, constant: &Expr) -> Option<Value> {
    if resolve_on(field, binding).as_ref() != Some(path) {
        return None;
    }
    encode(constant).filter(Value::is_number)
}

// ============================================================================
// Predicate translation
// ============================================================================

/// Translate a predicate over `binding` into a query clause.
pub fn predicate(binding: &Binding, expr: &Expr) -> Option<Clause> {
    match expr {
        Expr::BinaryOp {
            op: op @ (BinOp::And | BinOp::Or),
            left,
            right,
        } => {
            let key = if *op == BinOp::And { "$and" } else { "$or" };
            let mut operands = Vec::new();
            for side in [left, right] {
                let clause = predicate(binding, side)?;
                if clause.key == key
                    && let Value::Array(nested) = clause.value
                {
                    operands.extend(nested);
                } else {
                    operands.push(Value::Object(clause.into_document()));
                }
            }
            Some(Clause::new(key, Value::Array(operands)))
        }

        Expr::BinaryOp { op, left, right } => {
            if let Some(path) = resolve_on(left, binding) {
                comparison(path, *op, encode(right)?)
            } else if let Some(path) = resolve_on(right, binding) {
                comparison(path, op.flipped(), encode(left)?)
            } else {
                None
            }
        }

        Expr::ExistenceCheck(inner) => {
            let path = resolve_on(inner, binding)?;
            Some(Clause::new(path.dotted(), single("$exists", Value::Bool(true))))
        }

        Expr::MethodCall {
            object,
            method,
            args,
        } => {
            let path = resolve_on(object, binding)?;
            let [arg] = args.as_slice() else {
                return None;
            };
            let condition = match method.as_str() {
                "matches" => {
                    let pattern = match arg {
                        Expr::String(pattern) => pattern,
                        _ => return None,
                    };
                    Regex::new(pattern).ok()?;
                    single("$regex", Value::String(pattern.clone()))
                }
                "in" => single("$in", encode(arg).filter(Value::is_array)?),
                "not_in" => single("$nin", encode(arg).filter(Value::is_array)?),
                _ => return None,
            };
            Some(Clause::new(path.dotted(), condition))
        }

        // A bare field is a truth test
        access => {
            let path = resolve_on(access, binding)?;
            Some(Clause::new(path.dotted(), Value::Bool(true)))
        }
    }
}

fn comparison(path: FieldPath, op: BinOp, operand: Value) -> Option<Clause> {
    let condition = match comparison_operator(op)? {
        None => operand,
        Some(operator) => single(operator, operand),
    };
    Some(Clause::new(path.dotted(), condition))
}

/// `Some(None)` for equality (plain value), `Some(Some(op))` for the other
/// comparisons, `None` for non-comparisons.
fn comparison_operator(op: BinOp) -> Option<Option<&'static str>> {
    Some(match op {
        BinOp::Equal => None,
        BinOp::NotEqual => Some("$ne"),
        BinOp::LessThan => Some("$lt"),
        BinOp::LessEqual => Some("$lte"),
        BinOp::GreaterThan => Some("$gt"),
        BinOp::GreaterEqual => Some("$gte"),
        _ => return None,
    })
}

/// Condition on array elements for `$pull`: a comparison against the
/// element itself (`@e < 5`) becomes `{"$lt": 5}`, anything else is a
/// predicate over element fields.
fn element_condition(binding: &Binding, expr: &Expr) -> Option<Value> {
    match expr {
        Expr::BinaryOp {
            op: BinOp::And,
            left,
            right,
        } => match (on_element(left, binding), on_element(right, binding)) {
            (true, true) => {
                let (Value::Object(mut merged), Value::Object(more)) = (
                    element_condition(binding, left)?,
                    element_condition(binding, right)?,
                ) else {
                    return None;
                };
                for (key, value) in more {
                    if merged.contains_key(&key) {
                        return None;
                    }
                    merged.insert(key, value);
                }
                Some(Value::Object(merged))
            }
            (false, false) => predicate(binding, expr).map(|c| Value::Object(c.into_document())),
            // An element cannot be compared both as a value and as a document
            _ => None,
        },
        Expr::BinaryOp { op, left, right } if is_self(left, binding) => {
            self_comparison(*op, encode(right)?)
        }
        Expr::BinaryOp { op, left, right } if is_self(right, binding) => {
            self_comparison(op.flipped(), encode(left)?)
        }
        other => predicate(binding, other).map(|c| Value::Object(c.into_document())),
    }
}

/// Whether `expr` only compares the element itself (`@e > 1 and @e < 5`).
fn on_element(expr: &Expr, binding: &Binding) -> bool {
    match expr {
        Expr::BinaryOp {
            op: BinOp::And,
            left,
            right,
        } => on_element(left, binding) && on_element(right, binding),
        Expr::BinaryOp { left, right, .. } => is_self(left, binding) || is_self(right, binding),
        _ => false,
    }
}

fn is_self(expr: &Expr, binding: &Binding) -> bool {
    matches!(expr, Expr::Binding(name) if name == binding.name())
}

fn self_comparison(op: BinOp, operand: Value) -> Option<Value> {
    let operator = comparison_operator(op)?.unwrap_or("$eq");
    Some(single(operator, operand))
}

// ============================================================================
// Fixed translators
// ============================================================================

fn increment(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let amount = encode(value).filter(Value::is_number)?;
    Some(Clause::update("$inc", path?, amount))
}

fn decrement(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let amount = negate(&encode(value)?)?;
    Some(Clause::update("$inc", path?, amount))
}

fn add_to_set(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    Some(Clause::update("$addToSet", path?, encode(value)?))
}

fn add_to_set_each(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let items = encode(value).filter(Value::is_array)?;
    Some(Clause::update("$addToSet", path?, single("$each", items)))
}

fn push(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    Some(Clause::update("$push", path?, encode(value)?))
}

fn push_each(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let items = encode(value).filter(Value::is_array)?;
    Some(Clause::update("$push", path?, single("$each", items)))
}

fn pop_front(_: &Binding, path: Option<&FieldPath>, _: &Expr) -> Option<Clause> {
    Some(Clause::update("$pop", path?, Value::from(-1)))
}

fn pop_back(_: &Binding, path: Option<&FieldPath>, _: &Expr) -> Option<Clause> {
    Some(Clause::update("$pop", path?, Value::from(1)))
}

fn pull(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let condition = match value {
        Expr::Lambda { param, body } => element_condition(&Binding::new(param.clone()), body)?,
        literal => encode(literal)?,
    };
    Some(Clause::update("$pull", path?, condition))
}

fn pull_all(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let items = encode(value).filter(Value::is_array)?;
    Some(Clause::update("$pullAll", path?, items))
}

fn bit_and(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let mask = encode(value).filter(Value::is_i64)?;
    Some(Clause::update("$bit", path?, single("and", mask)))
}

fn bit_or(_: &Binding, path: Option<&FieldPath>, value: &Expr) -> Option<Clause> {
    let mask = encode(value).filter(Value::is_i64)?;
    Some(Clause::update("$bit", path?, single("or", mask)))
}

// ============================================================================
// Modifier translators
// ============================================================================

fn slice(count: &Expr) -> Result<Option<Patch>, CompileError> {
    // `$slice: -n` keeps the last n; a negative count has no such reading
    let count = encode(count).and_then(|count| count.as_i64());
    Ok(count.filter(|n| *n >= 0).map(|n| Patch::Slice(-n)))
}

/// Sort keys address fields of the pushed elements.
fn sort_key(key: &Expr) -> Result<String, CompileError> {
    resolve(key).map(|(_, path)| path.dotted())
}

fn sort_by(key: &Expr) -> Result<Option<Patch>, CompileError> {
    Ok(Some(Patch::SortBy(sort_key(key)?, Direction::Ascending)))
}

fn sort_by_descending(key: &Expr) -> Result<Option<Patch>, CompileError> {
    Ok(Some(Patch::SortBy(sort_key(key)?, Direction::Descending)))
}

fn then_sort_by(key: &Expr) -> Result<Option<Patch>, CompileError> {
    Ok(Some(Patch::ThenSortBy(sort_key(key)?, Direction::Ascending)))
}

fn then_sort_by_descending(key: &Expr) -> Result<Option<Patch>, CompileError> {
    Ok(Some(Patch::ThenSortBy(sort_key(key)?, Direction::Descending)))
}
