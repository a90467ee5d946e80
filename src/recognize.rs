//! Step recognition: one chain node at a time.
//!
//! A chain is a nest of method calls around a source. [`recognize`] looks at
//! the outermost node only and either produces a [`Step`] (or a marker)
//! together with the receiver to continue with, or identifies the source
//! that ends the chain.

use serde_json::Value;
use tracing::trace;

use crate::{
    ast::Expr,
    error::CompileError,
    path::{Binding, FieldPath, resolve},
    translate::Operator,
    wire::encode,
};

/// Value expression for `unset`, which takes no value argument.
static ABSENT: Expr = Expr::Absent;

/// What a chain operates over.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRef {
    /// `$`: the scope bound by the caller
    Root,
    /// `$name`: a collection looked up by name
    Named(String),
    /// An array literal used in place of a collection
    Literal(Vec<Value>),
}

/// One declarative operation of a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<'a> {
    Source(SourceRef),
    Predicate {
        op: Operator,
        binding: Binding,
        expr: &'a Expr,
    },
    Mutation {
        op: Operator,
        binding: Binding,
        path: FieldPath,
        expr: &'a Expr,
    },
}

/// Steps without a clause of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `update()`
    BeginUpdate,
    /// `defer()`
    Defer,
}

/// Outcome of recognizing one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognized<'a> {
    /// A step and the receiver still to be recognized.
    Step(Step<'a>, &'a Expr),
    Marker(Marker, &'a Expr),
    /// The end of the chain.
    Source(Step<'a>),
}

/// Recognize the outermost node of a chain.
///
/// Markers come first, then list modifiers, then the operation
/// vocabulary. Anything else is [`CompileError::UnrecognizedShape`].
pub fn recognize(expr: &Expr) -> Result<Recognized<'_>, CompileError> {
    let (object, method, args) = match expr {
        Expr::Root => return Ok(Recognized::Source(Step::Source(SourceRef::Root))),
        Expr::Collection(name) => {
            return Ok(Recognized::Source(Step::Source(SourceRef::Named(name.clone()))));
        }
        Expr::Array(items) => {
            let docs = items
                .iter()
                .map(|item| encode(item).ok_or_else(|| unrecognized(item)))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Recognized::Source(Step::Source(SourceRef::Literal(docs))));
        }
        Expr::MethodCall {
            object,
            method,
            args,
        } => (object.as_ref(), method.as_str(), args.as_slice()),
        _ => return Err(unrecognized(expr)),
    };

    trace!(method, args = args.len(), "recognizing");

    match (method, args) {
        ("defer", []) => return Ok(Recognized::Marker(Marker::Defer, object)),
        ("update", []) => return Ok(Recognized::Marker(Marker::BeginUpdate, object)),
        _ => {}
    }

    let op = Operator::from_method(method).ok_or_else(|| unrecognized(expr))?;
    let step = if op.is_modifier() {
        modifier(expr, op, object, args)?
    } else {
        operation(expr, op, args)?
    };
    Ok(Recognized::Step(step, object))
}

/// `slice`, `sort_by*`, `then_sort_by*` over a push-each receiver.
fn modifier<'a>(
    node: &Expr,
    op: Operator,
    receiver: &'a Expr,
    args: &'a [Expr],
) -> Result<Step<'a>, CompileError> {
    let [arg] = args else {
        return Err(unrecognized(node));
    };

    // Walk down through earlier modifiers to the push_each they decorate
    let mut sorted = false;
    let mut current = receiver;
    let target = loop {
        match current {
            Expr::MethodCall {
                object,
                method,
                args,
            } => match Operator::from_method(method) {
                Some(Operator::PushEach) => match args.as_slice() {
                    [target, _] => break target,
                    _ => return Err(unrecognized(current)),
                },
                Some(Operator::SortBy | Operator::SortByDescending) => {
                    sorted = true;
                    current = object.as_ref();
                }
                Some(inner) if inner.is_modifier() => current = object.as_ref(),
                _ => return Err(unrecognized(node)),
            },
            _ => return Err(unrecognized(node)),
        }
    };

    if matches!(op, Operator::ThenSortBy | Operator::ThenSortByDescending) && !sorted {
        return Err(CompileError::ThenSortWithoutSort);
    }

    let (binding, path) = resolve(target)?;
    Ok(Step::Mutation {
        op,
        binding,
        path,
        expr: arg,
    })
}

/// Filter and mutation operations.
fn operation<'a>(node: &Expr, op: Operator, args: &'a [Expr]) -> Result<Step<'a>, CompileError> {
    match (op, args) {
        (Operator::Filter, [Expr::Lambda { param, body }]) => Ok(Step::Predicate {
            op,
            binding: Binding::new(param.clone()),
            expr: body,
        }),
        (Operator::Filter, _) => Err(unrecognized(node)),

        (Operator::Unset, [target]) => mutation(op, target, &ABSENT),
        (Operator::PopFront | Operator::PopBack, [target]) => mutation(op, target, target),
        (Operator::Unset | Operator::PopFront | Operator::PopBack, _) => Err(unrecognized(node)),

        (_, [target, value]) => {
            let (binding, path) = resolve(target)?;
            Ok(Step::Mutation {
                op,
                expr: unwrap_value(&binding, op, value),
                binding,
                path,
            })
        }
        _ => Err(unrecognized(node)),
    }
}

fn mutation<'a>(op: Operator, target: &'a Expr, expr: &'a Expr) -> Result<Step<'a>, CompileError> {
    let (binding, path) = resolve(target)?;
    Ok(Step::Mutation {
        op,
        binding,
        path,
        expr,
    })
}

/// `set(@p => @p.f, @p => @p.f + 1)` reads the same as
/// `set(@p => @p.f, @p.f + 1)`. `pull` keeps its lambda, which binds the
/// array element instead.
fn unwrap_value<'a>(binding: &Binding, op: Operator, value: &'a Expr) -> &'a Expr {
    match value {
        Expr::Lambda { param, body } if op != Operator::Pull && param == binding.name() => body.as_ref(),
        other => other,
    }
}

fn unrecognized(expr: &Expr) -> CompileError {
    CompileError::UnrecognizedShape {
        node: expr.to_string(),
    }
}
