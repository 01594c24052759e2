//! File-backed record store
//!
//! One JSON document per record under a root directory:
//!
//! ```text
//! .tower/records/
//!   .lock
//!   demo-move-1.json   {"name": ..., "owner": ..., "data": {"move": ...}, "version": 1}
//! ```
//!
//! Mutations hold an exclusive `fs2` lock on `.lock` so the version check and
//! the write happen as one step, even across processes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::entities::{ChildRecord, MovePayload, StoredRecord};
use crate::domain::ports::{ChildRecordStore, StoreError, StoreResult};
use crate::infrastructure::fs::atomic_write;

const LOCK_FILE: &str = ".lock";
const RECORD_EXT: &str = "json";

pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, name: &str) -> StoreResult<PathBuf> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.contains("..")
        {
            return Err(StoreError::Backend(format!(
                "invalid record name '{name}'"
            )));
        }
        Ok(self.root.join(format!("{name}.{RECORD_EXT}")))
    }

    /// Run `f` while holding the store lock
    fn locked<T>(&self, f: impl FnOnce() -> StoreResult<T>) -> StoreResult<T> {
        fs::create_dir_all(&self.root).map_err(|e| classify("records", e))?;

        let lock_file =
            fs::File::create(self.root.join(LOCK_FILE)).map_err(|e| classify(LOCK_FILE, e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| classify(LOCK_FILE, e))?;

        let result = f();

        let _ = lock_file.unlock();
        result
    }

    fn read(&self, name: &str, path: &Path) -> StoreResult<StoredRecord> {
        let content = fs::read_to_string(path).map_err(|e| classify(name, e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    fn write(&self, path: &Path, stored: &StoredRecord) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(stored)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        atomic_write(path, content.as_bytes()).map_err(|e| classify(stored.name(), e))
    }
}

/// Map an I/O error onto the store's error vocabulary
fn classify(name: &str, err: io::Error) -> StoreError {
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound {
            name: name.to_string(),
        },
        io::ErrorKind::PermissionDenied => StoreError::PermissionDenied(format!("{name}: {err}")),
        io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => {
            StoreError::Transient(format!("{name}: {err}"))
        }
        _ => StoreError::Backend(format!("{name}: {err}")),
    }
}

impl ChildRecordStore for FsRecordStore {
    fn list(&self, owner: &str) -> StoreResult<Vec<StoredRecord>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(classify("records", e)),
        };

        // Owned records are always named `{owner}-move-N`; anything else
        // belongs to another parent and is never read
        let prefix = format!("{owner}-move-");
        let mut records = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| classify("records", e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            if !name.starts_with(&prefix) {
                continue;
            }

            match self.read(&name, &path) {
                Ok(stored) if stored.record.owner_tag == owner => records.push(stored),
                Ok(_) => {}
                // Deleted between read_dir and read
                Err(StoreError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        records.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(records)
    }

    fn get(&self, name: &str) -> StoreResult<StoredRecord> {
        let path = self.record_path(name)?;
        self.read(name, &path)
    }

    fn create(&self, record: &ChildRecord) -> StoreResult<StoredRecord> {
        let path = self.record_path(&record.name)?;
        self.locked(|| {
            if path.exists() {
                return Err(StoreError::AlreadyExists {
                    name: record.name.clone(),
                });
            }
            let stored = StoredRecord::new(record.clone(), 1);
            self.write(&path, &stored)?;
            Ok(stored)
        })
    }

    fn update(
        &self,
        name: &str,
        payload: &MovePayload,
        expected_version: u64,
    ) -> StoreResult<StoredRecord> {
        let path = self.record_path(name)?;
        self.locked(|| {
            let mut stored = self.read(name, &path)?;
            if stored.version != expected_version {
                return Err(StoreError::Conflict {
                    name: name.to_string(),
                    expected: expected_version,
                    actual: stored.version,
                });
            }
            stored.record.payload = payload.clone();
            stored.version += 1;
            self.write(&path, &stored)?;
            Ok(stored)
        })
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.record_path(name)?;
        self.locked(|| fs::remove_file(&path).map_err(|e| classify(name, e)))
    }
}
