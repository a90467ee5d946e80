use tracing::debug;

use crate::{
    ast::Expr,
    error::CompileError,
    recognize::{Marker, Recognized, Step, recognize},
};

/// A chain flattened into authoring order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain<'a> {
    /// Source first, then every step in the order it was written.
    pub steps: Vec<Step<'a>>,
    /// Ends in `defer()`.
    pub deferred: bool,
    /// Contains `update()`.
    pub begins_update: bool,
}

/// Unwind a chain from its outermost call down to the source.
///
/// Iterative, so chain length is bounded by memory rather than stack depth.
pub fn traverse(expr: &Expr) -> Result<Chain<'_>, CompileError> {
    let mut steps = Vec::new();
    let mut deferred = false;
    let mut begins_update = false;
    let mut current = expr;
    let mut outermost = true;

    loop {
        match recognize(current)? {
            Recognized::Source(source) => {
                steps.push(source);
                break;
            }
            Recognized::Marker(Marker::Defer, next) => {
                if !outermost {
                    return Err(CompileError::MisplacedDefer);
                }
                deferred = true;
                current = next;
            }
            Recognized::Marker(Marker::BeginUpdate, next) => {
                begins_update = true;
                current = next;
            }
            Recognized::Step(step, next) => {
                debug!(?step, "recognized step");
                steps.push(step);
                current = next;
            }
        }
        outermost = false;
    }

    steps.reverse();
    Ok(Chain {
        steps,
        deferred,
        begins_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn test_defer_inside_the_chain() {
        let expr = parse_str("$.defer().where(@p => @p.a == 1)").unwrap();
        assert_eq!(traverse(&expr), Err(CompileError::MisplacedDefer));
    }

    #[test]
    fn test_not_a_chain() {
        let expr = parse_str("1 + 2").unwrap();
        assert!(matches!(
            traverse(&expr),
            Err(CompileError::UnrecognizedShape { .. })
        ));
    }
}
