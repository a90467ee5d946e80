use std::fmt;

use crate::{ast::Expr, error::CompileError};

/// The placeholder for "the current document" inside a step.
///
/// Carried unchanged from the lambda head through recognition into the
/// translators, which only read `@name` references with the same name as
/// fields of the row being filtered or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding(pub String);

impl Binding {
    pub fn new(name: impl Into<String>) -> Self {
        Binding(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object field access by name
    ///
    /// # Examples
    /// - `@p.name` → `Field("name")`
    /// - `@p["first name"]` → `Field("first name")`
    Field(String),

    /// Array element access by position
    ///
    /// # Examples
    /// - `@p.scores[0]` → `[Field("scores"), Index(0)]`
    Index(u64),
}

/// A non-empty, ordered sequence of segments addressing a (possibly nested)
/// field. Only [`resolve`] builds one, so emptiness cannot be observed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Wire form: segments joined with dots (`address.city`, `scores.0`).
    pub fn dotted(&self) -> String {
        self.0
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => name.clone(),
                PathSegment::Index(i) => i.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// Resolve a target sub-expression to its binding and field path.
///
/// Accepts a lambda whose body is an access chain on the lambda's own
/// parameter (`@p => @p.address.city`) or a bare access chain
/// (`@p["address"]["city"]`). Member and indexed access may be mixed.
///
/// # Examples
/// ```
/// use chainql::{parser::parse_str, path::resolve};
///
/// let target = parse_str("@p => @p.address[\"city\"]").unwrap();
/// let (binding, path) = resolve(&target).unwrap();
/// assert_eq!(binding.name(), "p");
/// assert_eq!(path.dotted(), "address.city");
/// ```
pub fn resolve(expr: &Expr) -> Result<(Binding, FieldPath), CompileError> {
    match expr {
        Expr::Lambda { param, body } => {
            let (binding, path) = resolve_access(body)?;
            if binding.name() != param {
                return Err(unresolvable(expr));
            }
            Ok((binding, path))
        }
        other => resolve_access(other),
    }
}

/// Resolve an access chain without a lambda head.
pub fn resolve_access(expr: &Expr) -> Result<(Binding, FieldPath), CompileError> {
    let mut segments = Vec::new();
    let binding = collect_segments(expr, &mut segments).ok_or_else(|| unresolvable(expr))?;

    if segments.is_empty() {
        // A bare binding addresses the whole document, not a field
        return Err(unresolvable(expr));
    }
    Ok((binding, FieldPath(segments)))
}

/// Resolve `expr` against a known binding: `Some(path)` only when the access
/// chain is rooted at exactly that binding.
pub fn resolve_on(expr: &Expr, binding: &Binding) -> Option<FieldPath> {
    match resolve_access(expr) {
        Ok((found, path)) if &found == binding => Some(path),
        _ => None,
    }
}

fn collect_segments(expr: &Expr, segments: &mut Vec<PathSegment>) -> Option<Binding> {
    match expr {
        // The binding is the starting point and adds no segment
        Expr::Binding(name) => Some(Binding::new(name.clone())),

        Expr::Member { object, name } => {
            let binding = collect_segments(object, segments)?;
            segments.push(PathSegment::Field(name.clone()));
            Some(binding)
        }

        Expr::Access { object, key } => {
            let binding = collect_segments(object, segments)?;
            let segment = match key.as_ref() {
                Expr::Key(name) | Expr::String(name) => PathSegment::Field(name.clone()),
                Expr::Integer(n) if *n >= 0 => PathSegment::Index(*n as u64),
                // Computed keys cannot be turned into a static path
                _ => return None,
            };
            segments.push(segment);
            Some(binding)
        }

        _ => None,
    }
}

fn unresolvable(expr: &Expr) -> CompileError {
    CompileError::UnresolvablePath {
        node: expr.to_string(),
    }
}

/// Check whether an expression mentions a binding anywhere.
///
/// Walks the whole tree; a lambda that re-binds the same name shadows it.
pub fn references(expr: &Expr, binding: &Binding) -> bool {
    match expr {
        Expr::Binding(name) => name == binding.name(),

        Expr::Access { object, key } => references(object, binding) || references(key, binding),
        Expr::Member { object, .. } => references(object, binding),
        Expr::ExistenceCheck(inner) => references(inner, binding),
        Expr::BinaryOp { left, right, .. } => {
            references(left, binding) || references(right, binding)
        }
        Expr::MethodCall { object, args, .. } => {
            references(object, binding) || args.iter().any(|arg| references(arg, binding))
        }
        Expr::Lambda { param, body } => param != binding.name() && references(body, binding),
        Expr::Object(pairs) => pairs.iter().any(|(_, value)| references(value, binding)),
        Expr::Array(elements) => elements.iter().any(|elem| references(elem, binding)),

        Expr::Null
        | Expr::Absent
        | Expr::Boolean(_)
        | Expr::Float(_)
        | Expr::Integer(_)
        | Expr::String(_)
        | Expr::Root
        | Expr::Collection(_)
        | Expr::Key(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambda_param_must_own_the_path() {
        // @p => @q.name
        let expr = Expr::lambda("p", Expr::member(Expr::binding("q"), "name"));
        assert!(matches!(
            resolve(&expr),
            Err(CompileError::UnresolvablePath { .. })
        ));
    }

    #[test]
    fn test_shadowed_binding_is_not_referenced() {
        // @e => @e.score, inside a step bound to @e as well
        let inner = Expr::lambda("e", Expr::member(Expr::binding("e"), "score"));
        assert!(!references(&inner, &Binding::new("e")));
        assert!(!references(&inner, &Binding::new("q")));
    }
}
