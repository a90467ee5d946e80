//! Running compiled chains.
//!
//! Deferred chains hand their documents back. Immediate chains bind their
//! source through a [`Catalog`]; a query becomes a lazy [`QueryView`], an
//! update becomes exactly one [`Collection::update`] call.

use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    assemble::{Compiled, Documents},
    envelope::QueryOptions,
    error::DispatchError,
    recognize::SourceRef,
    store::{Collection, DocumentStream, QueryFlags, WriteOutcome},
    wire::Document,
};

/// A collection narrowed by a base filter.
#[derive(Clone)]
pub struct QueryScope {
    collection: Arc<dyn Collection>,
    query: Document,
}

impl QueryScope {
    pub fn new(collection: Arc<dyn Collection>, query: Document) -> Self {
        QueryScope { collection, query }
    }

    /// Every document of the collection.
    pub fn all(collection: Arc<dyn Collection>) -> Self {
        QueryScope::new(collection, Document::new())
    }

    pub fn query(&self) -> &Document {
        &self.query
    }

    /// Further narrow the scope: both filters must hold.
    pub fn narrow(&self, query: Document) -> QueryScope {
        let combined = match (self.query.is_empty(), query.is_empty()) {
            (true, _) => query,
            (false, true) => self.query.clone(),
            (false, false) => {
                let mut both = Document::new();
                both.insert(
                    "$and".to_string(),
                    Value::Array(vec![Value::Object(self.query.clone()), Value::Object(query)]),
                );
                both
            }
        };
        QueryScope::new(Arc::clone(&self.collection), combined)
    }
}

impl fmt::Debug for QueryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryScope")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// What a source resolves to.
#[derive(Clone)]
pub enum SourceBinding {
    Scope(QueryScope),
    Collection(Arc<dyn Collection>),
}

impl SourceBinding {
    pub fn into_scope(self) -> QueryScope {
        match self {
            SourceBinding::Scope(scope) => scope,
            SourceBinding::Collection(collection) => QueryScope::all(collection),
        }
    }
}

impl From<QueryScope> for SourceBinding {
    fn from(scope: QueryScope) -> Self {
        SourceBinding::Scope(scope)
    }
}

impl From<Arc<dyn Collection>> for SourceBinding {
    fn from(collection: Arc<dyn Collection>) -> Self {
        SourceBinding::Collection(collection)
    }
}

impl fmt::Debug for SourceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceBinding::Scope(scope) => f.debug_tuple("Scope").field(scope).finish(),
            SourceBinding::Collection(_) => f.write_str("Collection(..)"),
        }
    }
}

/// Sources a dispatcher can bind: the root scope (`$`) and named
/// collections (`$name`).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: Option<SourceBinding>,
    named: HashMap<String, SourceBinding>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    pub fn with_root(mut self, binding: impl Into<SourceBinding>) -> Self {
        self.root = Some(binding.into());
        self
    }

    pub fn with_collection(mut self, name: impl Into<String>, binding: impl Into<SourceBinding>) -> Self {
        self.insert(name, binding);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: impl Into<SourceBinding>) {
        self.named.insert(name.into(), binding.into());
    }

    /// The scope a source runs against.
    pub fn resolve(&self, source: &SourceRef) -> Result<QueryScope, DispatchError> {
        let binding = match source {
            SourceRef::Root => self
                .root
                .as_ref()
                .ok_or_else(|| DispatchError::Binding("no root scope is bound for '$'".to_string()))?,
            SourceRef::Named(name) => self.named.get(name).ok_or_else(|| {
                DispatchError::Binding(format!("unknown collection '${}'", name))
            })?,
            SourceRef::Literal(_) => {
                return Err(DispatchError::Binding(
                    "an array literal source can only be deferred".to_string(),
                ));
            }
        };
        Ok(binding.clone().into_scope())
    }
}

/// An immediate query that has not been sent yet.
#[derive(Debug, Clone)]
pub struct QueryView {
    scope: QueryScope,
}

impl QueryView {
    /// The filter that will be sent.
    pub fn query(&self) -> &Document {
        self.scope.query()
    }

    /// Find every matching document.
    pub async fn fetch(&self) -> Result<DocumentStream, DispatchError> {
        self.fetch_with(&QueryOptions::default(), None, 0, 0, QueryFlags::default())
            .await
    }

    /// Find with envelope options, projection and paging.
    pub async fn fetch_with(
        &self,
        options: &QueryOptions,
        projection: Option<&Document>,
        limit: i64,
        skip: i64,
        flags: QueryFlags,
    ) -> Result<DocumentStream, DispatchError> {
        let query = options.wrap(self.scope.query.clone());
        debug!(?query, limit, skip, "sending find");
        let stream = self
            .scope
            .collection
            .find(&query, projection, limit, skip, flags)
            .await?;
        Ok(stream)
    }
}

/// Result of dispatching a compiled chain.
#[derive(Debug)]
pub enum Outcome {
    Deferred(Documents),
    View(QueryView),
    Updated(WriteOutcome),
}

pub struct Dispatcher {
    catalog: Catalog,
}

impl Dispatcher {
    pub fn new(catalog: Catalog) -> Self {
        Dispatcher { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Hand back, prepare or execute a compiled chain.
    ///
    /// At most one store request is made.
    pub async fn dispatch(&self, compiled: Compiled) -> Result<Outcome, DispatchError> {
        match compiled {
            Compiled::Deferred(documents) => Ok(Outcome::Deferred(documents)),
            Compiled::Query { query, source } => {
                let scope = self.bind(source.as_ref())?;
                Ok(Outcome::View(QueryView {
                    scope: scope.narrow(query),
                }))
            }
            Compiled::Update {
                query,
                update,
                source,
            } => {
                let scope = self.bind(source.as_ref())?.narrow(query);
                info!(query = ?scope.query, ?update, "sending update");
                let outcome = scope.collection.update(&scope.query, &update).await?;
                Ok(Outcome::Updated(outcome))
            }
        }
    }

    /// [`Dispatcher::dispatch`] for callers without a runtime.
    pub fn dispatch_blocking(&self, compiled: Compiled) -> Result<Outcome, DispatchError> {
        futures::executor::block_on(self.dispatch(compiled))
    }

    fn bind(&self, source: Option<&SourceRef>) -> Result<QueryScope, DispatchError> {
        let source =
            source.ok_or_else(|| DispatchError::Binding("chain has no source".to_string()))?;
        self.catalog.resolve(source)
    }
}
