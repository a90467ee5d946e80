//! Folding recognized steps into query and update documents.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    ast::Expr,
    chain::{Chain, traverse},
    error::CompileError,
    parser::parse_str,
    patch::{self, Applied},
    path::FieldPath,
    recognize::{SourceRef, Step},
    translate::{Clause, Operator, PatchFn, Translator},
    wire::Document,
};

/// Compiler settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail with [`CompileError::TranslatorRefused`] instead of dropping a
    /// step whose operand has no wire form.
    pub strict: bool,
}

/// The documents of a deferred chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Documents {
    Query(Document),
    Pair { query: Document, update: Document },
}

impl Documents {
    pub fn query(&self) -> &Document {
        match self {
            Documents::Query(query) | Documents::Pair { query, .. } => query,
        }
    }

    pub fn update(&self) -> Option<&Document> {
        match self {
            Documents::Query(_) => None,
            Documents::Pair { update, .. } => Some(update),
        }
    }

    /// `{"query": …}` or `{"query": …, "update": …}`.
    pub fn to_value(&self) -> Value {
        let mut out = Document::new();
        out.insert("query".to_string(), Value::Object(self.query().clone()));
        if let Some(update) = self.update() {
            out.insert("update".to_string(), Value::Object(update.clone()));
        }
        Value::Object(out)
    }
}

/// A compiled chain, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Compiled {
    Query {
        query: Document,
        source: Option<SourceRef>,
    },
    Update {
        query: Document,
        update: Document,
        source: Option<SourceRef>,
    },
    Deferred(Documents),
}

impl Compiled {
    /// The documents, whatever the mode.
    pub fn documents(&self) -> Documents {
        match self {
            Compiled::Query { query, .. } => Documents::Query(query.clone()),
            Compiled::Update { query, update, .. } => Documents::Pair {
                query: query.clone(),
                update: update.clone(),
            },
            Compiled::Deferred(documents) => documents.clone(),
        }
    }
}

/// A step left out of the documents because its operand has no wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropped {
    pub operator: Operator,
    pub node: String,
}

/// Compile a chain expression.
pub fn compile(expr: &Expr, options: &CompileOptions) -> Result<Compiled, CompileError> {
    compile_report(expr, options).map(|(compiled, _)| compiled)
}

/// Compile chain text.
///
/// # Examples
/// ```
/// use chainql::assemble::{CompileOptions, Compiled, compile_str};
/// use serde_json::json;
///
/// let compiled = compile_str(
///     "$people.where(@p => @p.age >= 18).inc(@p => @p.visits, 1).defer()",
///     &CompileOptions::default(),
/// )
/// .unwrap();
/// let Compiled::Deferred(documents) = compiled else { panic!() };
/// assert_eq!(
///     documents.to_value(),
///     json!({
///         "query": {"age": {"$gte": 18}},
///         "update": {"$inc": {"visits": 1}}
///     })
/// );
/// ```
pub fn compile_str(input: &str, options: &CompileOptions) -> Result<Compiled, CompileError> {
    compile(&parse_str(input)?, options)
}

/// Compile, also returning the steps that were dropped.
pub fn compile_report(
    expr: &Expr,
    options: &CompileOptions,
) -> Result<(Compiled, Vec<Dropped>), CompileError> {
    let chain = traverse(expr)?;
    assemble(chain, options)
}

/// Fold a normalized chain into its documents.
pub fn assemble(
    chain: Chain<'_>,
    options: &CompileOptions,
) -> Result<(Compiled, Vec<Dropped>), CompileError> {
    let mut assembler = Assembler {
        options,
        source: None,
        query: Document::new(),
        update: Document::new(),
        update_mode: false,
        dropped: Vec::new(),
    };

    for step in chain.steps {
        assembler.fold(step)?;
    }

    if chain.begins_update && !assembler.update_mode {
        debug!("update() without mutations, compiling as a query");
    }

    let Assembler {
        source,
        query,
        update,
        update_mode,
        dropped,
        ..
    } = assembler;

    let compiled = match (chain.deferred, update_mode) {
        (true, false) => Compiled::Deferred(Documents::Query(query)),
        (true, true) => Compiled::Deferred(Documents::Pair { query, update }),
        (false, false) => Compiled::Query { query, source },
        (false, true) => Compiled::Update {
            query,
            update,
            source,
        },
    };
    Ok((compiled, dropped))
}

struct Assembler<'o> {
    options: &'o CompileOptions,
    source: Option<SourceRef>,
    query: Document,
    update: Document,
    update_mode: bool,
    dropped: Vec<Dropped>,
}

impl Assembler<'_> {
    fn fold(&mut self, step: Step<'_>) -> Result<(), CompileError> {
        match step {
            Step::Source(source) => {
                if self.source.is_none() {
                    self.source = Some(source);
                }
            }

            Step::Predicate { op, binding, expr } => {
                let clause = match op.translator() {
                    Translator::Generic(translate) | Translator::Fixed(translate) => {
                        translate(&binding, None, expr)
                    }
                    Translator::Modifier(_) => None,
                };
                match clause {
                    Some(clause) => {
                        debug!(key = %clause.key, "assembled query clause");
                        merge_predicate(&mut self.query, clause);
                    }
                    None => self.refuse(op, expr)?,
                }
            }

            Step::Mutation {
                op,
                binding,
                path,
                expr,
            } => match op.translator() {
                Translator::Generic(translate) | Translator::Fixed(translate) => {
                    self.update_mode = true;
                    match translate(&binding, Some(&path), expr) {
                        Some(clause) => {
                            debug!(operator = %clause.key, field = %path, "assembled update clause");
                            merge_update(&mut self.update, clause);
                        }
                        None => self.refuse(op, expr)?,
                    }
                }
                Translator::Modifier(modify) => self.modify(op, &path, expr, modify)?,
            },
        }
        Ok(())
    }

    fn modify(
        &mut self,
        op: Operator,
        path: &FieldPath,
        expr: &Expr,
        modify: PatchFn,
    ) -> Result<(), CompileError> {
        let Some(patch) = modify(expr)? else {
            return self.refuse(op, expr);
        };
        match patch::apply(&mut self.update, path, &patch)? {
            Applied::Patched => {
                debug!(?patch, field = %path, "patched push fragment");
                Ok(())
            }
            Applied::NoFragment => self.refuse(op, expr),
        }
    }

    fn refuse(&mut self, op: Operator, expr: &Expr) -> Result<(), CompileError> {
        let node = expr.to_string();
        if self.options.strict {
            return Err(CompileError::TranslatorRefused {
                operator: op.method().to_string(),
                node,
            });
        }
        warn!(operator = op.method(), %node, "dropping step with no wire form");
        self.dropped.push(Dropped { operator: op, node });
        Ok(())
    }
}

/// Merge a predicate clause into the query document.
///
/// Conjunctions are flattened. A field already constrained with other
/// operators is merged (`{age: {$gt: 18, $lt: 65}}`); any other collision
/// is moved into `$and`.
fn merge_predicate(query: &mut Document, clause: Clause) {
    match clause {
        Clause {
            key,
            value: Value::Array(operands),
        } if key == "$and" => {
            for operand in operands {
                match operand {
                    Value::Object(fields) => {
                        for (key, value) in fields {
                            merge_predicate(query, Clause::new(key, value));
                        }
                    }
                    other => conjoin(query, "$and".to_string(), other),
                }
            }
        }
        Clause { key, value } => merge_field(query, key, value),
    }
}

fn merge_field(query: &mut Document, key: String, value: Value) {
    let Some(existing) = query.get_mut(&key) else {
        query.insert(key, value);
        return;
    };

    if let (Value::Object(old), Value::Object(new)) = (&mut *existing, &value)
        && !key.starts_with('$')
        && is_operator_doc(old)
        && is_operator_doc(new)
        && new.keys().all(|op| !old.contains_key(op))
    {
        old.extend(new.clone());
        return;
    }

    conjoin(query, key, value);
}

/// Append `{key: value}` to the query's `$and` array.
fn conjoin(query: &mut Document, key: String, value: Value) {
    let mut condition = Document::new();
    condition.insert(key, value);

    match query
        .entry("$and")
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(conditions) => conditions.push(Value::Object(condition)),
        other => {
            let previous = std::mem::take(other);
            *other = Value::Array(vec![previous, Value::Object(condition)]);
        }
    }
}

fn is_operator_doc(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|key| key.starts_with('$'))
}

/// `update[operator][field] = operand`
fn merge_update(update: &mut Document, clause: Clause) {
    let Clause { key, value } = clause;
    let Value::Object(fields) = value else {
        update.insert(key, value);
        return;
    };

    match update
        .entry(key)
        .or_insert_with(|| Value::Object(Document::new()))
    {
        Value::Object(existing) => existing.extend(fields),
        other => *other = Value::Object(fields),
    }
}
