#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::warn;
use vc_core::{EntitySchema, Record};
use vc_storage::{SqliteStore, StoreError};

pub type SharedStore = Arc<Mutex<SqliteStore>>;

/// What to do when a persisted collection exists but cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorruptPolicy {
    #[default]
    Fail,
    /// Start with an empty collection; the next save overwrites the bad data.
    StartEmpty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionSnapshot {
    /// Backend revision; 0 for a collection never written.
    pub revision: i64,
    pub records: Arc<Vec<Record>>,
}

/// One entity's collection, loaded once and republished to subscribers after every save.
#[derive(Debug)]
pub struct RecordStore {
    schema: &'static EntitySchema,
    backend: SharedStore,
    published: watch::Sender<CollectionSnapshot>,
}

impl RecordStore {
    pub fn open(
        schema: &'static EntitySchema,
        backend: SharedStore,
        on_corrupt: CorruptPolicy,
    ) -> Result<Self, StoreError> {
        let (records, revision) = {
            let store = lock_backend(&backend);
            let records = match on_corrupt {
                CorruptPolicy::Fail => store.load_collection(schema)?,
                CorruptPolicy::StartEmpty => store.load_collection_or_empty(schema)?,
            };
            (records, store.collection_revision(schema.collection_key)?)
        };
        let (published, _) = watch::channel(CollectionSnapshot {
            revision,
            records: Arc::new(records),
        });
        Ok(Self {
            schema,
            backend,
            published,
        })
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn records(&self) -> Arc<Vec<Record>> {
        Arc::clone(&self.published.borrow().records)
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot> {
        self.published.subscribe()
    }

    /// Persists the whole collection, then publishes it. Nothing is published when the
    /// write fails.
    pub fn save(&self, records: Vec<Record>) -> Result<CollectionSnapshot, StoreError> {
        let revision = lock_backend(&self.backend).save_collection(self.schema, &records)?;
        let snapshot = CollectionSnapshot {
            revision,
            records: Arc::new(records),
        };
        self.published.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Publishes an empty collection after the backend was wiped.
    pub(crate) fn publish_cleared(&self) {
        self.published.send_replace(CollectionSnapshot {
            revision: 0,
            records: Arc::new(Vec::new()),
        });
    }
}

pub(crate) fn lock_backend(backend: &SharedStore) -> MutexGuard<'_, SqliteStore> {
    backend.lock().unwrap_or_else(|poisoned| {
        warn!("storage mutex poisoned; continuing with inner state");
        poisoned.into_inner()
    })
}
