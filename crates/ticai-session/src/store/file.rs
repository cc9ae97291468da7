//! JSON-file store.
//!
//! All keys live in one JSON object on disk. Writes go to a `.tmp`
//! sibling first and are then renamed over the target.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use ticai_common::PersistenceError;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::KvStore;

type Entries = BTreeMap<String, String>;

pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_entries(&self, key: &str) -> Result<Entries, PersistenceError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(PersistenceError::Read {
                    key: key.to_string(),
                    reason: format!("{}: {e}", self.path.display()),
                })
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), "store file is corrupt, treating as empty: {e}");
                Ok(Entries::new())
            }
        }
    }

    async fn write_entries(&self, key: &str, entries: &Entries) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PersistenceError::PathError(format!(
                    "failed to create store directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let write_err = |e: std::io::Error| PersistenceError::Write {
            key: key.to_string(),
            reason: format!("{}: {e}", self.path.display()),
        };

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await.map_err(write_err)?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            warn!("atomic rename failed ({e}), falling back to direct write");
            tokio::fs::write(&self.path, &json).await.map_err(write_err)?;
        }

        debug!(key, path = %self.path.display(), "store updated");
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries(key).await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries(key).await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(key, &entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries(key).await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(key, &entries).await
    }
}
