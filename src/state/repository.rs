/// Repository layer: typed access to the vault and session records.
///
/// The vault record only moves `Absent -> Present` (create/import) and
/// `Present -> Absent` (reset). Overwriting an existing vault is refused.
use chrono::{DateTime, Utc};
use tracing::info;

use super::models::{SessionRecord, VaultRecord};
use crate::error::{Result, VaultError};
use crate::storage::{self, KeyValueStore, SESSION_KEY, VAULT_KEY};

// ── Vault ──

pub struct VaultRepository<S> {
    store: S,
}

impl<S: KeyValueStore> VaultRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn load(&self) -> Result<Option<VaultRecord>> {
        storage::get_json(&self.store, VAULT_KEY).await
    }

    pub async fn exists(&self) -> Result<bool> {
        Ok(self.store.get(VAULT_KEY).await?.is_some())
    }

    /// Persist a new vault. Fails if one already exists.
    pub async fn save(&self, record: &VaultRecord) -> Result<()> {
        if self.exists().await? {
            return Err(VaultError::Validation("A wallet already exists".into()));
        }
        storage::set_json(&self.store, VAULT_KEY, record).await?;
        info!(
            version = record.version,
            secret_type = ?record.secret_type,
            "Vault created"
        );
        Ok(())
    }

    pub async fn delete(&self) -> Result<()> {
        self.store.remove(VAULT_KEY).await?;
        info!("Vault deleted");
        Ok(())
    }
}

// ── Session ──

pub struct SessionRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SessionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Option<SessionRecord>> {
        storage::get_json(&self.store, SESSION_KEY).await
    }

    /// Write the session with `now` as its timestamp.
    pub async fn save(&self, password: &str, now: DateTime<Utc>) -> Result<()> {
        let record = SessionRecord::new(password, now);
        storage::set_json(&self.store, SESSION_KEY, &record).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(SESSION_KEY).await
    }
}
