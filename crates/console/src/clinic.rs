#![forbid(unsafe_code)]

use crate::config::ConsoleConfig;
use crate::controller::Controller;
use crate::notice::{Notice, NoticeAction};
use crate::record_store::{CorruptPolicy, RecordStore, SharedStore, lock_backend};
use crate::verifier::{HttpVerifier, NationalIdVerifier, OfflineVerifier};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use vc_core::resolve::ReferenceLookup;
use vc_core::validate::UnavailablePolicy;
use vc_core::{ClinicInfo, EntityKind, Record};
use vc_storage::{CollectionRow, SqliteStore, StoreError};

/// Point-in-time copies of the collections a reference or group reads from.
#[derive(Clone, Debug, Default)]
pub struct LookupTables {
    tables: BTreeMap<EntityKind, Arc<Vec<Record>>>,
}

impl ReferenceLookup for LookupTables {
    fn collection(&self, kind: EntityKind) -> &[Record] {
        self.tables
            .get(&kind)
            .map(|records| records.as_slice())
            .unwrap_or(&[])
    }
}

/// Owns the storage handle and one [`RecordStore`] per entity, opened on first use.
pub struct Clinic {
    backend: SharedStore,
    stores: Mutex<BTreeMap<EntityKind, Arc<RecordStore>>>,
    verifier: Arc<dyn NationalIdVerifier>,
    policy: UnavailablePolicy,
    on_corrupt: CorruptPolicy,
}

impl std::fmt::Debug for Clinic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clinic")
            .field("policy", &self.policy)
            .field("on_corrupt", &self.on_corrupt)
            .finish_non_exhaustive()
    }
}

impl Clinic {
    pub fn new(
        backend: SqliteStore,
        verifier: Arc<dyn NationalIdVerifier>,
        policy: UnavailablePolicy,
        on_corrupt: CorruptPolicy,
    ) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            stores: Mutex::new(BTreeMap::new()),
            verifier,
            policy,
            on_corrupt,
        }
    }

    pub fn open(config: &ConsoleConfig) -> Result<Self, StoreError> {
        let backend = SqliteStore::open(&config.storage_dir)?;
        let verifier: Arc<dyn NationalIdVerifier> = if config.offline {
            Arc::new(OfflineVerifier)
        } else {
            Arc::new(HttpVerifier::new(
                config.cpf_endpoint.clone(),
                config.cpf_timeout(),
            ))
        };
        info!(
            storage_dir = %config.storage_dir.display(),
            offline = config.offline,
            cpf_policy = config.cpf_policy.as_str(),
            "clinic storage opened"
        );
        Ok(Self::new(
            backend,
            verifier,
            config.cpf_policy,
            config.corrupt_policy(),
        ))
    }

    pub fn policy(&self) -> UnavailablePolicy {
        self.policy
    }

    pub(crate) fn verifier(&self) -> Arc<dyn NationalIdVerifier> {
        Arc::clone(&self.verifier)
    }

    pub fn store(&self, kind: EntityKind) -> Result<Arc<RecordStore>, StoreError> {
        let mut stores = self
            .stores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(store) = stores.get(&kind) {
            return Ok(Arc::clone(store));
        }
        let store = Arc::new(RecordStore::open(
            kind.schema(),
            Arc::clone(&self.backend),
            self.on_corrupt,
        )?);
        stores.insert(kind, Arc::clone(&store));
        Ok(store)
    }

    pub fn controller(self: &Arc<Self>, kind: EntityKind) -> Result<Controller, StoreError> {
        let store = self.store(kind)?;
        Ok(Controller::new(Arc::clone(self), store))
    }

    pub fn lookup_tables(
        &self,
        kinds: impl IntoIterator<Item = EntityKind>,
    ) -> Result<LookupTables, StoreError> {
        let mut tables = BTreeMap::new();
        for kind in kinds {
            if !tables.contains_key(&kind) {
                tables.insert(kind, self.store(kind)?.records());
            }
        }
        Ok(LookupTables { tables })
    }

    /// The clinic's contact details; the stock values until they are first saved.
    pub fn clinic_info(&self) -> Result<ClinicInfo, StoreError> {
        match lock_backend(&self.backend).load_clinic_info() {
            Err(StoreError::CorruptCollection { key, detail })
                if self.on_corrupt == CorruptPolicy::StartEmpty =>
            {
                warn!(key = %key, detail = %detail, "corrupt clinic info ignored; using defaults");
                Ok(ClinicInfo::default())
            }
            other => other,
        }
    }

    pub fn save_clinic_info(&self, info: &ClinicInfo) -> Result<Notice, StoreError> {
        lock_backend(&self.backend).save_clinic_info(info)?;
        Ok(Notice::emit(
            NoticeAction::Updated,
            "Clinic info",
            info.nome.clone(),
        ))
    }

    /// Database location plus bookkeeping for every persisted key.
    pub fn storage_status(&self) -> Result<(PathBuf, Vec<CollectionRow>), StoreError> {
        let backend = lock_backend(&self.backend);
        Ok((backend.db_path(), backend.list_collections()?))
    }

    /// Erases every persisted collection and publishes empty snapshots to open stores.
    pub fn clear_all(&self) -> Result<usize, StoreError> {
        let removed = lock_backend(&self.backend).clear_all()?;
        let stores = self
            .stores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for store in stores.values() {
            store.publish_cleared();
        }
        Ok(removed)
    }
}
