//! Documentation content for chainql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Predicates,
    Mutations,
    Modifiers,
    Modes,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "predicates" | "predicate" | "where" | "query" => Some(Self::Predicates),
            "mutations" | "mutation" | "update" | "updates" => Some(Self::Mutations),
            "modifiers" | "modifier" | "push" | "sort" => Some(Self::Modifiers),
            "modes" | "mode" | "defer" => Some(Self::Modes),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"CHAINQL DOCUMENTATION

chainql compiles a chain of declarative steps into the query and update
documents a MongoDB-style server expects. A chain starts at a source ($ or
$collection) and each method call adds one step.

DOCUMENTATION CATEGORIES

  syntax        Sources, bindings, lambdas, field paths and literals
  predicates    where() and the query operators it produces
  mutations     set, unset, inc, push, pull, pop, bit and friends
  modifiers     slice, sort_by and then_sort_by on push_each
  modes         update(), defer() and what dispatch does with a chain

QUICK REFERENCE

  $people                         Source
  .where(@p => @p.age > 18)       Query clause
  .set(@p => @p.name, "Ann")      Update clause
  @p.address.city, @p["a b"]      Field paths
  absent                          Remove a field
  .defer()                        Return documents only

Run 'chainql doc <category>' for detailed documentation.
Run 'chainql onboard' for a short tutorial.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Predicates) => Ok(PREDICATES_DOC),
        Some(DocCategory::Mutations) => Ok(MUTATIONS_DOC),
        Some(DocCategory::Modifiers) => Ok(MODIFIERS_DOC),
        Some(DocCategory::Modes) => Ok(MODES_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Chains, Bindings and Field Paths

SOURCES
  $
    The scope bound by the caller as root.
  $people
    A collection looked up by name.
  [{"a": 1}, {"a": 2}]
    An array literal. Only usable with defer().

BINDINGS AND LAMBDAS
  @p => @p.age
    A lambda whose parameter @p stands for the current document.
    Field paths must start at the lambda's own parameter.

FIELD PATHS
  @p.address.city          Static member access
  @p["first name"]         Dynamic access with a string key
  @p[address][city]        Dynamic access with identifier keys
  @p.scores[0]             Array position

    All of these compile to a dotted path: address.city, scores.0

LITERALS
  42  3.5  "text"  'text'  true  false  null  [1, 2]  {"a": 1}
  absent                   The value of a field that should not exist

  Constant arithmetic is folded: 60 * 60 => 3600, -5, "a" + "b" => "ab"
"#;

const PREDICATES_DOC: &str = r#"PREDICATES - where()

  $people.where(@p => <predicate>)

COMPARISONS
  @p.age == 30             {"age": 30}
  @p.age != 30             {"age": {"$ne": 30}}
  @p.age > 18              {"age": {"$gt": 18}}
  @p.age >= 18             {"age": {"$gte": 18}}
  @p.age < 65              {"age": {"$lt": 65}}
  @p.age <= 65             {"age": {"$lte": 65}}
  18 < @p.age              {"age": {"$gt": 18}}

LOGIC
  a and b                  Both clauses in the query document
  a or b                   {"$or": [a, b]}

FIELD TESTS
  @p.email[?]              {"email": {"$exists": true}}
  @p.active                {"active": true}
  @p.name.matches("^A")    {"name": {"$regex": "^A"}}
  @p.tag.in(["a", "b"])    {"tag": {"$in": ["a", "b"]}}
  @p.tag.not_in(["x"])     {"tag": {"$nin": ["x"]}}

  Several where() steps are combined. Two ranges on one field merge:
    .where(@p => @p.age > 18).where(@p => @p.age < 65)
    => {"age": {"$gt": 18, "$lt": 65}}

  Operands must be constants. Comparing two fields has no query form.
"#;

const MUTATIONS_DOC: &str = r#"MUTATIONS - Update Clauses

  set(@p => @p.name, "Ann")          {"$set": {"name": "Ann"}}
  set(@p => @p.n, @p.n + 2)          {"$inc": {"n": 2}}
  set(@p => @p.n, @p.n - 2)          {"$inc": {"n": -2}}
  set(@p => @p.tmp, absent)          {"$unset": {"tmp": 1}}
  unset(@p => @p.tmp)                {"$unset": {"tmp": 1}}
  inc(@p => @p.n, 1)                 {"$inc": {"n": 1}}
  dec(@p => @p.n, 1)                 {"$inc": {"n": -1}}
  add_to_set(@p => @p.tags, "x")     {"$addToSet": {"tags": "x"}}
  add_to_set_each(@p => @p.tags, ["x", "y"])
                                     {"$addToSet": {"tags": {"$each": ["x", "y"]}}}
  push(@p => @p.xs, 1)               {"$push": {"xs": 1}}
  push_each(@p => @p.xs, [1, 2])     {"$push": {"xs": {"$each": [1, 2]}}}
  pop_front(@p => @p.xs)             {"$pop": {"xs": -1}}
  pop_back(@p => @p.xs)              {"$pop": {"xs": 1}}
  pull(@p => @p.xs, 3)               {"$pull": {"xs": 3}}
  pull(@p => @p.xs, @e => @e < 3)    {"$pull": {"xs": {"$lt": 3}}}
  pull(@p => @p.xs, @e => @e.score < 3)
                                     {"$pull": {"xs": {"score": {"$lt": 3}}}}
  pull_all(@p => @p.xs, [1, 2])      {"$pullAll": {"xs": [1, 2]}}
  bit_and(@p => @p.flags, 6)         {"$bit": {"flags": {"and": 6}}}
  bit_or(@p => @p.flags, 1)          {"$bit": {"flags": {"or": 1}}}

  Clauses with the same operator share one sub-document. Setting the same
  field twice keeps the last value.
"#;

const MODIFIERS_DOC: &str = r#"MODIFIERS - slice, sort_by, then_sort_by

Modifiers follow push_each directly and change its $each fragment.

  $.push_each(@p => @p.xs, [1, 2, 3])
    .slice(5)
    .sort_by(@e => @e.a)
    .then_sort_by_descending(@e => @e.b)

  => {"$push": {"xs": {"$each": [1, 2, 3], "$slice": -5,
                       "$sort": {"a": 1, "b": -1}}}}

  slice(n)                       Keep the last n elements (n >= 0)
  sort_by(@e => @e.k)            Replace the sort with {k: 1}
  sort_by_descending(@e => @e.k) Replace the sort with {k: -1}
  then_sort_by(@e => @e.k)       Add {k: 1} to the existing sort
  then_sort_by_descending(...)   Add {k: -1} to the existing sort

  then_sort_by needs an earlier sort_by. A second sort_by starts over.
"#;

const MODES_DOC: &str = r#"MODES - update() and defer()

  update()     Marks where mutations begin. Optional.
  defer()      Must be the last call. Returns the documents instead of
               running them.

  A chain with at least one mutation is an update. Otherwise it is a query.

  immediate query    A lazy view; nothing is sent until it is fetched
  immediate update   Exactly one update request
  deferred           {"query": ...} or {"query": ..., "update": ...}

  The chainql binary always prints the deferred documents.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases() {
        assert_eq!(DocCategory::from_name("Modifiers"), Some(DocCategory::Modifiers));
        assert_eq!(DocCategory::from_name("where"), Some(DocCategory::Predicates));
        assert!(get_doc_category("nope").is_err());
    }
}
