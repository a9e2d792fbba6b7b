// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Durable local record of this client's uploads, backed by redb.
//!
//! ## Table Layout
//!
//! - `local_store`: entry name → JSON bytes
//!   - `haiku-receipts`: object of content id → [`Receipt`]
//!   - `haiku-cache`: array of [`UploadRecord`], newest first
//!
//! Entries are append-only. A record is written once after its receipt and
//! never rewritten; only [`LocalCache::clear`] removes data.

use std::collections::BTreeMap;
use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;

use crate::models::{Receipt, UploadRecord};

/// Namespaced JSON entries.
const LOCAL_STORE: TableDefinition<&str, &[u8]> = TableDefinition::new("local_store");

const RECEIPTS_KEY: &str = "haiku-receipts";
const RECORDS_KEY: &str = "haiku-cache";

type ReceiptMap = BTreeMap<String, Receipt>;

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("content {0} is already cached")]
    AlreadyExists(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

// =============================================================================
// LocalCache
// =============================================================================

/// Local store of uploaded records and their receipts.
pub struct LocalCache {
    db: Database,
}

impl LocalCache {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LOCAL_STORE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Persist a record together with its receipt.
    ///
    /// The receipt is committed first in its own write transaction, then the
    /// record is prepended to the list in a second one. If the second write
    /// fails the receipt stays recoverable. Refuses a content id that is
    /// already cached.
    pub fn save(&self, record: &UploadRecord, receipt: &Receipt) -> CacheResult<()> {
        self.insert_receipt(&record.content_id, receipt)?;
        self.prepend_record(record)?;

        tracing::debug!(content_id = %record.content_id, "Cached upload");
        Ok(())
    }

    fn insert_receipt(&self, content_id: &str, receipt: &Receipt) -> CacheResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LOCAL_STORE)?;

            let mut receipts: ReceiptMap = read_entry(&table, RECEIPTS_KEY)?.unwrap_or_default();
            if receipts.contains_key(content_id) {
                return Err(CacheError::AlreadyExists(content_id.to_string()));
            }
            receipts.insert(content_id.to_string(), receipt.clone());
            let json = serde_json::to_vec(&receipts)?;
            table.insert(RECEIPTS_KEY, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn prepend_record(&self, record: &UploadRecord) -> CacheResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LOCAL_STORE)?;

            let mut records: Vec<UploadRecord> =
                read_entry(&table, RECORDS_KEY)?.unwrap_or_default();
            records.insert(0, record.clone());
            let json = serde_json::to_vec(&records)?;
            table.insert(RECORDS_KEY, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Records authored by `address` (case-insensitive), newest first.
    pub fn list(&self, address: &str) -> CacheResult<Vec<UploadRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LOCAL_STORE)?;

        let records: Vec<UploadRecord> = read_entry(&table, RECORDS_KEY)?.unwrap_or_default();
        Ok(records
            .into_iter()
            .filter(|r| r.is_authored_by(address))
            .collect())
    }

    /// Look up the receipt stored for a content id.
    pub fn receipt(&self, content_id: &str) -> CacheResult<Option<Receipt>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LOCAL_STORE)?;

        let mut receipts: ReceiptMap = read_entry(&table, RECEIPTS_KEY)?.unwrap_or_default();
        Ok(receipts.remove(content_id))
    }

    /// Remove every cached record and receipt.
    pub fn clear(&self) -> CacheResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LOCAL_STORE)?;
            table.remove(RECEIPTS_KEY)?;
            table.remove(RECORDS_KEY)?;
        }
        write_txn.commit()?;

        tracing::info!("Local cache cleared");
        Ok(())
    }

    /// Cheap read to confirm the store is usable.
    pub fn health_check(&self) -> CacheResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(LOCAL_STORE)?;
        Ok(())
    }
}

/// Decode a JSON entry from any readable view of the table.
fn read_entry<T, R>(table: &R, key: &str) -> CacheResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(key)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

// =============================================================================
// Tests
// =============================================================================
