//! The store a compiled chain runs against.
//!
//! Nothing here talks to a database. Callers implement [`Collection`] for
//! their client and hand collections to the dispatcher through a catalog.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{error::StoreError, wire::Document};

/// Documents returned by a find, as produced by the store.
pub type DocumentStream = BoxStream<'static, Result<Document, StoreError>>;

/// Wire query flags of a find request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryFlags {
    pub tailable_cursor: bool,
    pub slave_ok: bool,
    pub no_cursor_timeout: bool,
    pub await_data: bool,
    pub exhaust: bool,
    pub partial: bool,
}

impl QueryFlags {
    /// Bit mask in wire order.
    pub fn bits(&self) -> i32 {
        [
            (self.tailable_cursor, 1 << 1),
            (self.slave_ok, 1 << 2),
            (self.no_cursor_timeout, 1 << 4),
            (self.await_data, 1 << 5),
            (self.exhaust, 1 << 6),
            (self.partial, 1 << 7),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(0, |bits, (_, bit)| bits | bit)
    }
}

/// Acknowledgement of an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// A collection that can run finds and updates.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Run a find. `limit` and `skip` of 0 mean "no limit" and "from the
    /// start".
    async fn find(
        &self,
        query: &Document,
        projection: Option<&Document>,
        limit: i64,
        skip: i64,
        flags: QueryFlags,
    ) -> Result<DocumentStream, StoreError>;

    /// Apply `update` to the documents matching `query`.
    async fn update(&self, query: &Document, update: &Document) -> Result<WriteOutcome, StoreError>;
}
