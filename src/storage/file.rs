/// Durable key-value area backed by a single JSON file.
///
/// The whole area is one JSON object on disk. Every write replaces the file
/// through a temporary file and a rename, so a crash leaves either the old or
/// the new document and never a partial one.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::{Result, VaultError};

pub struct FileStore {
    name: String,
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

fn storage_err(path: &Path, e: impl std::fmt::Display) -> VaultError {
    VaultError::Storage(format!("{}: {e}", path.display()))
}

impl FileStore {
    /// Open (without creating) the area stored at `<dir>/<name>.json`.
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: dir.as_ref().join(format!("{name}.json")),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                warn!(path = %self.path.display(), "Storage file is not a JSON object");
                storage_err(&self.path, e)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(storage_err(&self.path, e)),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_err(parent, e))?;
        }

        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| storage_err(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_err(&self.path, e))?;

        debug!(area = %self.name, keys = entries.len(), "Storage area written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "local");
        store.set("clorio_vault", json!({"v": 1})).await.unwrap();
        store.set("other", json!("x")).await.unwrap();

        let reopened = FileStore::new(dir.path(), "local");
        assert_eq!(
            reopened.get("clorio_vault").await.unwrap(),
            Some(json!({"v": 1}))
        );
        assert_eq!(reopened.get("other").await.unwrap(), Some(json!("x")));
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"), "local");
        assert!(store.get("anything").await.unwrap().is_none());
        store.remove("anything").await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "local");
        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!(2)).await.unwrap();

        store.remove("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
        assert_eq!(store.get("b").await.unwrap(), Some(json!(2)));

        store.clear().await.unwrap();
        assert!(store.get("b").await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "local");
        std::fs::write(store.path(), b"not json").unwrap();
        assert!(matches!(
            store.get("a").await,
            Err(VaultError::Storage(_))
        ));
    }
}
