//! In-memory document store.
//!
//! Backs the integration tests and standalone runs. Documents keep their
//! insertion order, which is the order queries return them in; the page
//! size is configurable so tests can force multi-page fetches.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CollectionUri, DocumentPage, DocumentStore, DocumentUri, StoreError, StoreResult};

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Default)]
struct MemoryCollection {
    throughput: u32,
    documents: Vec<Value>,
}

impl MemoryCollection {
    fn position(&self, id: &str) -> Option<usize> {
        self.documents
            .iter()
            .position(|doc| doc.get("id").and_then(Value::as_str) == Some(id))
    }
}

#[derive(Default)]
struct MemoryDatabase {
    collections: HashMap<String, MemoryCollection>,
}

pub struct MemoryDocumentStore {
    databases: RwLock<HashMap<String, MemoryDatabase>>,
    page_size: usize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            databases: RwLock::new(HashMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Shrink the query page size, forcing queries over more than
    /// `page_size` documents to span several pages.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            databases: RwLock::new(HashMap::new()),
            page_size: page_size.max(1),
        }
    }

    /// Provisioned throughput recorded for a collection, if it exists.
    pub async fn collection_throughput(&self, uri: &CollectionUri) -> Option<u32> {
        let databases = self.databases.read().await;
        databases
            .get(&uri.database)?
            .collections
            .get(&uri.collection)
            .map(|collection| collection.throughput)
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_object(document: &Value) -> StoreResult<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(StoreError::BadRequest(
            "document must be a JSON object".to_string(),
        ))
    }
}

fn document_id(document: &Value) -> Option<String> {
    match document.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read_database(&self, database: &str) -> StoreResult<()> {
        let databases = self.databases.read().await;
        if databases.contains_key(database) {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!("/dbs/{database}")))
        }
    }

    async fn create_database(&self, database: &str) -> StoreResult<()> {
        let mut databases = self.databases.write().await;
        if databases.contains_key(database) {
            return Err(StoreError::Conflict(format!("/dbs/{database}")));
        }
        databases.insert(database.to_string(), MemoryDatabase::default());
        Ok(())
    }

    async fn read_collection(&self, uri: &CollectionUri) -> StoreResult<()> {
        let databases = self.databases.read().await;
        let database = databases
            .get(&uri.database)
            .ok_or_else(|| StoreError::NotFound(format!("/dbs/{}", uri.database)))?;
        if database.collections.contains_key(&uri.collection) {
            Ok(())
        } else {
            Err(StoreError::NotFound(uri.to_string()))
        }
    }

    async fn create_collection(&self, uri: &CollectionUri, throughput: u32) -> StoreResult<()> {
        let mut databases = self.databases.write().await;
        let database = databases
            .get_mut(&uri.database)
            .ok_or_else(|| StoreError::NotFound(format!("/dbs/{}", uri.database)))?;
        if database.collections.contains_key(&uri.collection) {
            return Err(StoreError::Conflict(uri.to_string()));
        }
        database.collections.insert(
            uri.collection.clone(),
            MemoryCollection {
                throughput,
                documents: Vec::new(),
            },
        );
        Ok(())
    }

    async fn read_document(&self, uri: &DocumentUri) -> StoreResult<Value> {
        let databases = self.databases.read().await;
        let collection = databases
            .get(&uri.database)
            .and_then(|database| database.collections.get(&uri.collection))
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))?;
        match collection.position(&uri.id) {
            Some(index) => Ok(collection.documents[index].clone()),
            None => Err(StoreError::NotFound(uri.to_string())),
        }
    }

    async fn create_document(&self, uri: &CollectionUri, document: Value) -> StoreResult<Value> {
        ensure_object(&document)?;
        let mut databases = self.databases.write().await;
        let collection = databases
            .get_mut(&uri.database)
            .and_then(|database| database.collections.get_mut(&uri.collection))
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))?;

        let mut document = document;
        let id = match document_id(&document) {
            Some(id) => id,
            None => {
                // Blank or missing id: the store assigns one.
                let id = Uuid::new_v4().to_string();
                document["id"] = Value::String(id.clone());
                id
            }
        };

        if collection.position(&id).is_some() {
            return Err(StoreError::Conflict(uri.document(id).to_string()));
        }
        collection.documents.push(document.clone());
        Ok(document)
    }

    async fn replace_document(&self, uri: &DocumentUri, document: Value) -> StoreResult<Value> {
        ensure_object(&document)?;
        let mut databases = self.databases.write().await;
        let collection = databases
            .get_mut(&uri.database)
            .and_then(|database| database.collections.get_mut(&uri.collection))
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))?;
        let index = collection
            .position(&uri.id)
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))?;

        // Replaced documents keep their slot, so query order is stable.
        let mut document = document;
        document["id"] = Value::String(uri.id.clone());
        collection.documents[index] = document.clone();
        Ok(document)
    }

    async fn delete_document(&self, uri: &DocumentUri) -> StoreResult<()> {
        let mut databases = self.databases.write().await;
        let collection = databases
            .get_mut(&uri.database)
            .and_then(|database| database.collections.get_mut(&uri.collection))
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))?;
        let index = collection
            .position(&uri.id)
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))?;
        collection.documents.remove(index);
        Ok(())
    }

    async fn query_documents(
        &self,
        uri: &CollectionUri,
        continuation: Option<&str>,
    ) -> StoreResult<DocumentPage> {
        let databases = self.databases.read().await;
        let collection = databases
            .get(&uri.database)
            .and_then(|database| database.collections.get(&uri.collection))
            .ok_or_else(|| StoreError::NotFound(uri.to_string()))?;

        let offset = match continuation {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| StoreError::BadRequest(format!("invalid continuation: {token}")))?,
            None => 0,
        };

        let end = (offset + self.page_size).min(collection.documents.len());
        let documents = collection.documents[offset.min(end)..end].to_vec();
        let continuation = if end < collection.documents.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(DocumentPage {
            documents,
            continuation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn provisioned(page_size: usize) -> (MemoryDocumentStore, CollectionUri) {
        let store = MemoryDocumentStore::with_page_size(page_size);
        let uri = CollectionUri::new("db", "items");
        store.create_database("db").await.expect("create database");
        store
            .create_collection(&uri, 1000)
            .await
            .expect("create collection");
        (store, uri)
    }

    #[tokio::test]
    async fn create_assigns_id_when_blank() {
        let (store, uri) = provisioned(10).await;
        let created = store
            .create_document(&uri, json!({ "name": "no id" }))
            .await
            .expect("create");
        let id = created["id"].as_str().expect("id assigned");
        assert!(!id.is_empty());

        let fetched = store
            .read_document(&uri.document(id))
            .await
            .expect("read back");
        assert_eq!(fetched["name"], "no id");
    }

    #[tokio::test]
    async fn duplicate_id_conflicts() {
        let (store, uri) = provisioned(10).await;
        store
            .create_document(&uri, json!({ "id": "1", "name": "first" }))
            .await
            .expect("create");
        let err = store
            .create_document(&uri, json!({ "id": "1", "name": "second" }))
            .await
            .expect_err("duplicate must conflict");
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn query_pages_in_insertion_order() {
        let (store, uri) = provisioned(2).await;
        for n in 0..5 {
            store
                .create_document(&uri, json!({ "id": n.to_string(), "n": n }))
                .await
                .expect("create");
        }

        let mut seen = Vec::new();
        let mut continuation: Option<String> = None;
        let mut pages = 0;
        loop {
            let page = store
                .query_documents(&uri, continuation.as_deref())
                .await
                .expect("query");
            pages += 1;
            seen.extend(page.documents.into_iter().map(|doc| doc["n"].as_i64().unwrap()));
            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        assert_eq!(pages, 3);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn missing_collection_is_not_found() {
        let store = MemoryDocumentStore::new();
        let uri = CollectionUri::new("nope", "items");
        let err = store
            .read_document(&uri.document("1"))
            .await
            .expect_err("missing collection");
        assert!(err.is_not_found());
    }
}
