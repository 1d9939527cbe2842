#![forbid(unsafe_code)]

mod codec;
mod error;

pub use codec::{decode_clinic_info, decode_collection, encode_clinic_info, encode_collection};
pub use error::StoreError;

use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use vc_core::settings::CLINIC_INFO_KEY;
use vc_core::{ClinicInfo, EntitySchema, Record};

const DB_FILE_NAME: &str = "vetclinic.db";
const SCHEMA_VERSION: i64 = 1;
const OWNED_TABLES: [&str; 2] = ["collections", "store_state"];

/// Bookkeeping for one persisted collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionRow {
    pub key: String,
    pub revision: i64,
    pub record_count: usize,
    pub updated_at_ms: i64,
}

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage_dir.join(DB_FILE_NAME)
    }

    /// Absent collections load as empty. Anything stored under the key that cannot be
    /// decoded is reported as [`StoreError::CorruptCollection`].
    pub fn load_collection(&self, schema: &EntitySchema) -> Result<Vec<Record>, StoreError> {
        let Some(raw) = self.raw_collection(schema.collection_key)? else {
            debug!(key = schema.collection_key, "collection absent; starting empty");
            return Ok(Vec::new());
        };
        let records =
            decode_collection(schema, &raw).map_err(|detail| StoreError::CorruptCollection {
                key: schema.collection_key.to_string(),
                detail,
            })?;
        debug!(
            key = schema.collection_key,
            records = records.len(),
            "collection loaded"
        );
        Ok(records)
    }

    /// Like [`Self::load_collection`], but a corrupt collection is logged and treated as
    /// empty. The next save overwrites it.
    pub fn load_collection_or_empty(
        &self,
        schema: &EntitySchema,
    ) -> Result<Vec<Record>, StoreError> {
        match self.load_collection(schema) {
            Err(StoreError::CorruptCollection { key, detail }) => {
                warn!(key = %key, detail = %detail, "corrupt collection ignored; starting empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Replaces the whole collection and bumps its revision. Returns the new revision.
    pub fn save_collection(
        &mut self,
        schema: &EntitySchema,
        records: &[Record],
    ) -> Result<i64, StoreError> {
        let json = serde_json::to_string(&encode_collection(schema, records))?;
        let revision = self.upsert_raw(schema.collection_key, &json)?;
        debug!(
            key = schema.collection_key,
            records = records.len(),
            revision,
            "collection saved"
        );
        Ok(revision)
    }

    /// The stock clinic details until the first save.
    pub fn load_clinic_info(&self) -> Result<ClinicInfo, StoreError> {
        let Some(raw) = self.raw_collection(CLINIC_INFO_KEY)? else {
            return Ok(ClinicInfo::default());
        };
        decode_clinic_info(&raw).map_err(|detail| StoreError::CorruptCollection {
            key: CLINIC_INFO_KEY.to_string(),
            detail,
        })
    }

    pub fn save_clinic_info(&mut self, info: &ClinicInfo) -> Result<i64, StoreError> {
        let json = serde_json::to_string(&encode_clinic_info(info))?;
        let revision = self.upsert_raw(CLINIC_INFO_KEY, &json)?;
        debug!(key = CLINIC_INFO_KEY, revision, "clinic info saved");
        Ok(revision)
    }

    /// 0 when the collection was never written.
    pub fn collection_revision(&self, key: &str) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT revision FROM collections WHERE key=?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .unwrap_or(0))
    }

    /// Per-collection bookkeeping. `record_count` is 0 for a value that is not a JSON array.
    pub fn list_collections(&self) -> Result<Vec<CollectionRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT key, revision, updated_at_ms, records_json FROM collections ORDER BY key ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let raw = row.get::<_, String>(3)?;
            let record_count = serde_json::from_str::<serde_json::Value>(&raw)
                .ok()
                .and_then(|value| value.as_array().map(Vec::len))
                .unwrap_or(0);
            out.push(CollectionRow {
                key: row.get(0)?,
                revision: row.get(1)?,
                updated_at_ms: row.get(2)?,
                record_count,
            });
        }
        Ok(out)
    }

    /// Erases every persisted collection. Returns how many were removed.
    pub fn clear_all(&mut self) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM collections", [])?;
        tx.execute(
            "UPDATE store_state SET updated_at_ms=?1 WHERE singleton=1",
            params![now_ms()],
        )?;
        tx.commit()?;
        warn!(removed, "all collections cleared");
        Ok(removed)
    }

    fn upsert_raw(&mut self, key: &str, json: &str) -> Result<i64, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO collections(key, records_json, revision, updated_at_ms) \
             VALUES (?1, ?2, 1, ?3) \
             ON CONFLICT(key) DO UPDATE SET records_json=excluded.records_json, \
             revision=collections.revision + 1, updated_at_ms=excluded.updated_at_ms",
            params![key, json, now_ms()],
        )?;
        let revision = tx.query_row(
            "SELECT revision FROM collections WHERE key=?1",
            params![key],
            |row| row.get::<_, i64>(0),
        )?;
        tx.commit()?;
        Ok(revision)
    }

    fn raw_collection(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT records_json FROM collections WHERE key=?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }
}

/// Refuses a database this store did not create, or one written by another schema version.
/// A brand new (empty) database passes.
fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if tables.is_empty() {
        return Ok(());
    }
    if tables.iter().any(|table| !OWNED_TABLES.contains(&table.as_str())) {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: database holds tables the clinic store does not own",
        ));
    }
    if tables.len() != OWNED_TABLES.len() {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: clinic store is only partially installed",
        ));
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    match version {
        Some(SCHEMA_VERSION) => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: clinic store was written by another schema version",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: clinic store has no version row",
        )),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    let now_ms = now_ms();

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS collections (
          key TEXT PRIMARY KEY,
          records_json TEXT NOT NULL,
          revision INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT INTO store_state(singleton, schema_version, created_at_ms, updated_at_ms) \
         VALUES (1, ?1, ?2, ?2) \
         ON CONFLICT(singleton) DO UPDATE SET schema_version=excluded.schema_version",
        params![SCHEMA_VERSION, now_ms],
    )?;

    Ok(())
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
