//! In-place modifiers for `$push ... $each` fragments.
//!
//! `slice`, `sort_by` and `then_sort_by` do not emit clauses of their own.
//! They locate the push-each fragment of their field in the update document
//! and rewrite its sub-operators. `sort_by` resets the sort specification,
//! `then_sort_by` appends to it.

use serde_json::Value;

use crate::{error::CompileError, path::FieldPath, wire::Document};

const EACH: &str = "$each";
const SLICE: &str = "$slice";
const SORT: &str = "$sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_i64(self) -> i64 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }
}

/// A modification of one push-each fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// `$slice` value, already negated (keep the last n).
    Slice(i64),
    /// Replace `$sort` with a single key.
    SortBy(String, Direction),
    /// Append a key to an existing `$sort`.
    ThenSortBy(String, Direction),
}

/// Result of a successful [`apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Patched,
    /// No push-each fragment exists at the path; the push it belongs to
    /// produced no clause.
    NoFragment,
}

/// Apply `patch` to the `$push` fragment of `path` in `update`.
pub fn apply(update: &mut Document, path: &FieldPath, patch: &Patch) -> Result<Applied, CompileError> {
    let field = path.dotted();
    let Some(slot) = update
        .get_mut("$push")
        .and_then(Value::as_object_mut)
        .and_then(|push| push.get_mut(&field))
    else {
        return Ok(Applied::NoFragment);
    };

    let fragment = match slot {
        Value::Object(fragment) if fragment.contains_key(EACH) => fragment,
        _ => {
            return Err(CompileError::Patch(format!(
                "$push.{} is not a $each fragment",
                field
            )));
        }
    };

    match patch {
        Patch::Slice(n) => {
            fragment.insert(SLICE.to_string(), Value::from(*n));
        }
        Patch::SortBy(key, direction) => {
            let mut sort = Document::new();
            sort.insert(key.clone(), Value::from(direction.as_i64()));
            fragment.insert(SORT.to_string(), Value::Object(sort));
        }
        Patch::ThenSortBy(key, direction) => {
            let Some(Value::Object(sort)) = fragment.get_mut(SORT) else {
                return Err(CompileError::ThenSortWithoutSort);
            };
            sort.insert(key.clone(), Value::from(direction.as_i64()));
        }
    }

    *fragment = in_wire_order(std::mem::take(fragment));
    Ok(Applied::Patched)
}

/// `$each`, `$slice`, `$sort`, whatever order they were set in.
fn in_wire_order(mut fragment: Document) -> Document {
    let mut ordered = Document::new();
    for key in [EACH, SLICE, SORT] {
        if let Some(value) = fragment.remove(key) {
            ordered.insert(key.to_string(), value);
        }
    }
    ordered.extend(fragment);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_str, path::resolve};
    use serde_json::json;

    fn xs() -> FieldPath {
        resolve(&parse_str("@p => @p.xs").unwrap()).unwrap().1
    }

    fn pushed(fragment: Value) -> Document {
        let Value::Object(doc) = json!({ "$push": { "xs": fragment } }) else {
            unreachable!()
        };
        doc
    }

    #[test]
    fn test_slice_before_sort_keeps_wire_order() {
        let mut update = pushed(json!({"$each": [1]}));
        apply(&mut update, &xs(), &Patch::SortBy("a".into(), Direction::Ascending)).unwrap();
        apply(&mut update, &xs(), &Patch::Slice(-3)).unwrap();

        let keys: Vec<_> = update["$push"]["xs"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["$each", "$slice", "$sort"]);
    }

    #[test]
    fn test_then_sort_needs_a_sort() {
        let mut update = pushed(json!({"$each": [1]}));
        let result = apply(&mut update, &xs(), &Patch::ThenSortBy("a".into(), Direction::Ascending));
        assert_eq!(result, Err(CompileError::ThenSortWithoutSort));
    }

    #[test]
    fn test_missing_fragment() {
        let mut update = Document::new();
        assert_eq!(apply(&mut update, &xs(), &Patch::Slice(-1)), Ok(Applied::NoFragment));
    }

    #[test]
    fn test_plain_push_cannot_be_patched() {
        let mut update = pushed(json!(5));
        assert!(matches!(
            apply(&mut update, &xs(), &Patch::Slice(-1)),
            Err(CompileError::Patch(_))
        ));
    }
}
