// ============================================================================
// Document repository
// ============================================================================

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::{CollectionUri, DocumentStore, StoreResult};
use crate::telemetry::Telemetry;

/// Throughput requested when the collection has to be created.
const COLLECTION_THROUGHPUT: u32 = 1000;

const PERFORMANCE_TAGS: &[(&str, &str)] = &[
    ("Performance", "Performance"),
    ("DocumentStore", "DocumentStore"),
];
const STORE_TAG: &[(&str, &str)] = &[("DocumentStore", "DocumentStore")];

/// Generic CRUD façade over a document store.
///
/// Every operation issues exactly one remote round-trip (the query pages
/// internally but counts as one), wraps it in a wall-clock timer, and emits
/// one latency metric on success. Construction provisions the database and
/// collection, so a value of this type is always ready to serve calls; the
/// store handle is shared and read-only afterwards, making concurrent use
/// safe without coordination.
///
/// Two deliberate asymmetries: `delete_item` emits no metric, and
/// `update_item` carries a single classification tag where its siblings
/// carry two.
pub struct DocumentRepository<T> {
    store: Arc<dyn DocumentStore>,
    collection: CollectionUri,
    telemetry: Telemetry,
    _item: PhantomData<fn() -> T>,
}

impl<T> DocumentRepository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Provision the database and collection (read; on not-found, create)
    /// and return a ready repository. Idempotent against already-provisioned
    /// resources; any error other than not-found during the existence
    /// checks propagates.
    pub async fn initialize(
        store: Arc<dyn DocumentStore>,
        database: &str,
        collection: &str,
        telemetry: Telemetry,
    ) -> StoreResult<Self> {
        let repository = Self {
            store,
            collection: CollectionUri::new(database, collection),
            telemetry,
            _item: PhantomData,
        };
        repository.ensure_database().await?;
        repository.ensure_collection().await?;
        Ok(repository)
    }

    async fn ensure_database(&self) -> StoreResult<()> {
        match self.store.read_database(&self.collection.database).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                self.store.create_database(&self.collection.database).await
            }
            Err(err) => Err(err),
        }
    }

    async fn ensure_collection(&self) -> StoreResult<()> {
        match self.store.read_collection(&self.collection).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                self.store
                    .create_collection(&self.collection, COLLECTION_THROUGHPUT)
                    .await
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch one item by id. A not-found from the store is an absent
    /// result, not an error; every other fault propagates. This is the only
    /// operation that translates not-found.
    pub async fn get_item(&self, id: &str) -> StoreResult<Option<T>> {
        let uri = self.collection.document(id);
        let started = Instant::now();
        let document = match self.store.read_document(&uri).await {
            Ok(document) => document,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err),
        };
        let elapsed = started.elapsed();

        self.telemetry
            .track_metric("DocumentStore.GetItem (ms)", millis(elapsed), PERFORMANCE_TAGS);
        Ok(Some(serde_json::from_value(document)?))
    }

    /// Fetch all items matching `predicate`, paging until the store reports
    /// no more results. Results come back in store order under one
    /// aggregate metric; a mid-fetch error aborts the whole call.
    pub async fn get_items<P>(&self, predicate: P) -> StoreResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        let started = Instant::now();
        let mut items = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .store
                .query_documents(&self.collection, continuation.as_deref())
                .await?;
            for document in page.documents {
                let item: T = serde_json::from_value(document)?;
                if predicate(&item) {
                    items.push(item);
                }
            }
            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        self.telemetry.track_metric(
            "DocumentStore.GetItems (ms)",
            millis(started.elapsed()),
            PERFORMANCE_TAGS,
        );
        Ok(items)
    }

    /// Insert a new item and return the created representation, including
    /// any store-assigned id. Conflicts propagate unchanged.
    pub async fn create_item(&self, item: &T) -> StoreResult<T> {
        let document = serde_json::to_value(item)?;
        let started = Instant::now();
        let created = self.store.create_document(&self.collection, document).await?;
        let elapsed = started.elapsed();

        self.telemetry
            .track_metric("DocumentStore.CreateItem (ms)", millis(elapsed), PERFORMANCE_TAGS);
        Ok(serde_json::from_value(created)?)
    }

    /// Fully replace the item at `id` and return the updated
    /// representation. A missing id propagates as-is.
    pub async fn update_item(&self, id: &str, item: &T) -> StoreResult<T> {
        let uri = self.collection.document(id);
        let document = serde_json::to_value(item)?;
        let started = Instant::now();
        let updated = self.store.replace_document(&uri, document).await?;
        let elapsed = started.elapsed();

        self.telemetry.track_metric(
            "DocumentStore.ReplaceDocument (ms)",
            millis(elapsed),
            STORE_TAG,
        );
        Ok(serde_json::from_value(updated)?)
    }

    /// Remove the item at `id`. Not timed.
    pub async fn delete_item(&self, id: &str) -> StoreResult<()> {
        let uri = self.collection.document(id);
        self.store.delete_document(&uri).await
    }
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
