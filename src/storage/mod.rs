/// Key-value storage abstraction supplied by the host environment.
///
/// Two areas are used:
/// - durable: survives restarts, holds the vault record and settings
/// - ephemeral: cleared when the browser session ends, holds the session record
///
/// Values are JSON documents. Single-key writes are assumed atomic; there are
/// no multi-key transactions.
pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, VaultError};

/// Well-known key of the encrypted vault record (durable).
pub const VAULT_KEY: &str = "clorio_vault";
/// Well-known key of the cached session (ephemeral).
pub const SESSION_KEY: &str = "clorio_session";
/// Well-known key of the settings namespace (durable).
pub const SETTINGS_KEY: &str = "clorio_settings";

/// Trait for host-provided key-value areas.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Human-readable name of this area (e.g., "local", "session").
    fn name(&self) -> &str;

    /// Read a value. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove a key. Returns Ok even if the key doesn't exist.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key in this area.
    async fn clear(&self) -> Result<()>;
}

/// Read and deserialize a typed record.
pub async fn get_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| VaultError::Serialization(format!("{key}: {e}"))),
        None => Ok(None),
    }
}

/// Serialize and write a typed record.
pub async fn set_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.set(key, value).await
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::memory::MemoryStore;
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let store = MemoryStore::new("local");
        let record = Record {
            name: "a".into(),
            count: 3,
        };
        set_json(&store, "k", &record).await.unwrap();
        let loaded: Option<Record> = get_json(&store, "k").await.unwrap();
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_typed_absent() {
        let store = MemoryStore::new("local");
        let loaded: Option<Record> = get_json(&store, "missing").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_typed_shape_mismatch() {
        let store = MemoryStore::new("local");
        store.set("k", serde_json::json!([1, 2])).await.unwrap();
        let loaded: Result<Option<Record>> = get_json(&store, "k").await;
        assert!(matches!(loaded, Err(VaultError::Serialization(_))));
    }
}
