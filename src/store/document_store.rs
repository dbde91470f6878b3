//! Durable, ID-indexed CRUD over a flat JSON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::errors::{StoreError, StoreResult};
use super::record::{FieldMap, Record};

/// The document store.
///
/// One instance per process, constructed at startup and shared behind an
/// `Arc`. Mutations take the write lock for the whole mutate-and-persist
/// critical section; reads take the read lock and see a consistent
/// snapshot.
///
/// The entire record set is rewritten to disk on every mutation. That is a
/// scalability boundary, not a bug: datasets here are small and the full
/// rewrite keeps recovery trivial (the file is always a complete document).
pub struct DocumentStore {
    path: PathBuf,
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    records: Vec<Record>,
    next_id: u64,
    closed: bool,
}

impl DocumentStore {
    /// Open the store at `path`, creating the parent directory and an
    /// empty file on first use, and load all records into memory.
    ///
    /// The id counter resumes at `max(existing ids) + 1`, so a file that
    /// never held records starts at 1. The counter is never persisted
    /// separately; manual file edits are picked up on the next open.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }
        if !path.exists() {
            fs::write(&path, "[]\n").map_err(|e| StoreError::io(&path, e))?;
        }

        let records = Self::load(&path)?;
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        info!(
            path = %path.display(),
            records = records.len(),
            next_id,
            "document store opened"
        );

        Ok(Self {
            path,
            inner: RwLock::new(StoreInner {
                records,
                next_id,
                closed: false,
            }),
        })
    }

    fn load(path: &Path) -> StoreResult<Vec<Record>> {
        let contents = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|e| StoreError::corrupt(path, e))
    }

    /// Create a record from caller-supplied fields.
    ///
    /// Assigns the next id, stamps both timestamps, and persists before
    /// returning. The counter only advances once the write has succeeded.
    pub fn create(&self, fields: FieldMap) -> StoreResult<Record> {
        let mut inner = self.write_open()?;

        let record = Record::new(inner.next_id, fields, Utc::now());
        inner.records.push(record.clone());
        self.flush(&inner.records)?;
        inner.next_id += 1;

        info!(id = record.id, "created item");
        Ok(record)
    }

    /// Look up a record by id. `None` is a normal outcome, not an error.
    pub fn get(&self, id: u64) -> StoreResult<Option<Record>> {
        let inner = self.read_open()?;

        let found = inner.records.iter().find(|r| r.id == id).cloned();
        match found {
            Some(record) => {
                debug!(id, "retrieved item");
                Ok(Some(record))
            }
            None => {
                warn!(id, "item not found");
                Ok(None)
            }
        }
    }

    /// All records in insertion order. The store never reorders on update.
    pub fn list(&self) -> StoreResult<Vec<Record>> {
        let inner = self.read_open()?;
        debug!(count = inner.records.len(), "retrieved all items");
        Ok(inner.records.clone())
    }

    /// Merge `partial` over the record's fields and bump `updated_at`.
    ///
    /// Keys absent from `partial` are untouched; `created_at` is never
    /// touched. An empty partial is a no-op that returns the current
    /// record without a disk write. Returns `None` if the id is absent.
    pub fn update(&self, id: u64, partial: &FieldMap) -> StoreResult<Option<Record>> {
        let mut inner = self.write_open()?;

        let Some(pos) = inner.records.iter().position(|r| r.id == id) else {
            warn!(id, "item not found for update");
            return Ok(None);
        };
        if partial.is_empty() {
            return Ok(Some(inner.records[pos].clone()));
        }

        let record = &mut inner.records[pos];
        record.merge_fields(partial);
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.flush(&inner.records)?;

        info!(id, "updated item");
        Ok(Some(updated))
    }

    /// Remove a record. Returns `false` if the id is absent (a no-op,
    /// not an error). Deleted ids are never handed out again.
    pub fn delete(&self, id: u64) -> StoreResult<bool> {
        let mut inner = self.write_open()?;

        let Some(pos) = inner.records.iter().position(|r| r.id == id) else {
            warn!(id, "item not found for deletion");
            return Ok(false);
        };
        inner.records.remove(pos);
        self.flush(&inner.records)?;

        info!(id, "deleted item");
        Ok(true)
    }

    /// Flush current state and mark the store closed. Idempotent; every
    /// operation after this fails with [`StoreError::Closed`].
    pub fn close(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if inner.closed {
            return Ok(());
        }

        self.flush(&inner.records)?;
        inner.closed = true;
        info!(path = %self.path.display(), "document store closed");
        Ok(())
    }

    /// Rewrite the full record set, via a temp file renamed over the
    /// target so a failed write never leaves a truncated document.
    fn flush(&self, records: &[Record]) -> StoreResult<()> {
        let mut contents =
            serde_json::to_string_pretty(records).map_err(|e| StoreError::corrupt(&self.path, e))?;
        contents.push('\n');

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn read_open(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, StoreInner>> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        if inner.closed {
            return Err(StoreError::Closed);
        }
        Ok(inner)
    }

    fn write_open(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, StoreInner>> {
        let inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if inner.closed {
            return Err(StoreError::Closed);
        }
        Ok(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn fields(pairs: &[(&str, serde_json::Value)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn open_temp_store() -> (TempDir, DocumentStore) {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = DocumentStore::open(dir.path().join("db.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_parent_dir_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/data/db.json");

        let store = DocumentStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_assigns_sequential_ids_from_one() {
        let (_dir, store) = open_temp_store();

        for expected in 1..=3 {
            let record = store.create(fields(&[("name", json!("Item"))])).unwrap();
            assert_eq!(record.id, expected);
        }
    }

    #[test]
    fn test_create_stamps_matching_timestamps() {
        let (_dir, store) = open_temp_store();

        let record = store
            .create(fields(&[("name", json!("Widget")), ("price", json!(9.99))]))
            .unwrap();
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_get_after_create_returns_equal_record() {
        let (_dir, store) = open_temp_store();

        let created = store.create(fields(&[("name", json!("Widget"))])).unwrap();
        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[test]
    fn test_get_missing_is_none_not_error() {
        let (_dir, store) = open_temp_store();
        assert_eq!(store.get(999).unwrap(), None);
    }

    #[test]
    fn test_update_empty_partial_is_noop() {
        let (_dir, store) = open_temp_store();

        let created = store.create(fields(&[("name", json!("Widget"))])).unwrap();
        let updated = store.update(created.id, &FieldMap::new()).unwrap().unwrap();

        assert_eq!(updated, created);
        assert_eq!(updated.updated_at, created.updated_at);
    }

    #[test]
    fn test_update_missing_creates_nothing() {
        let (_dir, store) = open_temp_store();

        let result = store.update(42, &fields(&[("name", json!("X"))])).unwrap();
        assert_eq!(result, None);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_twice_returns_true_then_false() {
        let (_dir, store) = open_temp_store();

        let created = store.create(fields(&[("name", json!("Widget"))])).unwrap();
        assert!(store.delete(created.id).unwrap());
        assert!(!store.delete(created.id).unwrap());
        assert_eq!(store.get(created.id).unwrap(), None);
    }

    #[test]
    fn test_operations_after_close_fail() {
        let (_dir, store) = open_temp_store();
        store.close().unwrap();
        store.close().unwrap(); // idempotent

        assert!(matches!(store.get(1), Err(StoreError::Closed)));
        assert!(matches!(store.list(), Err(StoreError::Closed)));
        assert!(matches!(
            store.create(FieldMap::new()),
            Err(StoreError::Closed)
        ));
        assert!(matches!(store.delete(1), Err(StoreError::Closed)));
    }

    #[test]
    fn test_file_is_pretty_printed_array() {
        let (dir, store) = open_temp_store();
        store.create(fields(&[("name", json!("Widget"))])).unwrap();

        let contents = fs::read_to_string(dir.path().join("db.json")).unwrap();
        assert!(contents.starts_with("[\n"));
        assert!(contents.contains("  {"));
    }
}
