//! Record store.
//!
//! Holds every [`Record`] in insertion order and mirrors it to a single JSON
//! array file. The file is the source of truth across restarts: it is read
//! once by [`RecordStore::open`] and rewritten in full by every
//! [`RecordStore::append`].
//!
//! Writers are serialized by the store's `RwLock`. The lock is held across the
//! whole rewrite, and a record only becomes visible to readers once the file
//! containing it has been written, so the file always decodes to exactly what
//! readers see.

use common::model::record::Record;
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("record file I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub struct RecordStore {
    path: PathBuf,
    records: RwLock<Vec<Record>>,
}

impl RecordStore {
    /// Loads the store from `path`.
    ///
    /// A missing or blank file yields an empty store. Content that does not
    /// decode as a record array is an error; callers must not serve from a
    /// corrupt store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = load_all(&path)?;
        info!("Loaded {} forms from {}", records.len(), path.display());
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` and rewrites the backing file.
    ///
    /// On failure the in-memory sequence is left as it was before the call.
    pub async fn append(&self, record: Record) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.push(record);
        if let Err(e) = persist(&self.path, &records) {
            records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Copy of the current sequence.
    pub async fn snapshot(&self) -> Vec<Record> {
        self.records.read().await.clone()
    }

    pub async fn ids(&self) -> Vec<String> {
        self.records
            .read()
            .await
            .iter()
            .map(|record| record.id.clone())
            .collect()
    }

    /// First record with `id`, in insertion order.
    pub async fn find(&self, id: &str) -> Option<Record> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn load_all(path: &Path) -> Result<Vec<Record>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `records` next to `path` and renames the result over it.
fn persist(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(records)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
