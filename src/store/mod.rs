// ============================================================================
// Document store client boundary
// ============================================================================
//
// A document store addresses records by string id inside a two-level
// namespace (database, collection). The repository talks to it through the
// `DocumentStore` trait; `MemoryDocumentStore` backs tests and standalone
// runs, `HttpDocumentStore` talks to a remote endpoint.

mod http;
mod memory;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpDocumentStore;
pub use memory::MemoryDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("conflict on {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("document serialization failed")]
    Serialization(#[from] serde_json::Error),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected store response: status {0}")]
    Unexpected(u16),
}

impl StoreError {
    /// The one classification callers branch on: the single-item read path
    /// turns it into an absent result, provisioning turns it into a create.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Address of a collection, built from a `(database, collection)` pair.
///
/// `Display` renders the REST resource path, which the HTTP store uses
/// verbatim and the in-memory store uses for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionUri {
    pub database: String,
    pub collection: String,
}

impl CollectionUri {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }

    pub fn document(&self, id: impl Into<String>) -> DocumentUri {
        DocumentUri {
            database: self.database.clone(),
            collection: self.collection.clone(),
            id: id.into(),
        }
    }
}

impl fmt::Display for CollectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/dbs/{}/colls/{}", self.database, self.collection)
    }
}

/// Address of a single document within a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUri {
    pub database: String,
    pub collection: String,
    pub id: String,
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/dbs/{}/colls/{}/docs/{}",
            self.database, self.collection, self.id
        )
    }
}

/// One page of a document query. `continuation` is `Some` while the store
/// has more results; feeding it back into `query_documents` fetches the
/// next page.
#[derive(Debug, Default)]
pub struct DocumentPage {
    pub documents: Vec<Value>,
    pub continuation: Option<String>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read_database(&self, database: &str) -> StoreResult<()>;
    async fn create_database(&self, database: &str) -> StoreResult<()>;
    async fn read_collection(&self, uri: &CollectionUri) -> StoreResult<()>;
    async fn create_collection(&self, uri: &CollectionUri, throughput: u32) -> StoreResult<()>;
    async fn read_document(&self, uri: &DocumentUri) -> StoreResult<Value>;
    async fn create_document(&self, uri: &CollectionUri, document: Value) -> StoreResult<Value>;
    async fn replace_document(&self, uri: &DocumentUri, document: Value) -> StoreResult<Value>;
    async fn delete_document(&self, uri: &DocumentUri) -> StoreResult<()>;
    async fn query_documents(
        &self,
        uri: &CollectionUri,
        continuation: Option<&str>,
    ) -> StoreResult<DocumentPage>;
}
