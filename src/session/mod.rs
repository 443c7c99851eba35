/// Session and unlock controller.
///
/// Mediates between the password a user types and the decrypted vault secret:
/// - `Locked`: no verified password in memory
/// - `Unlocking`: the vault is being decrypted with a submitted password
/// - `Unlocked`: the password verified and is cached in memory and, unless
///   auto-lock is "on window close", in the ephemeral session record
///
/// Expiry is checked on `restore_session`; there is no background timer.
pub mod password;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{AutoLock, ControllerConfig, Settings};
use crate::crypto::sensitive::SensitiveString;
use crate::error::{Result, VaultError};
use crate::keys::mnemonic::{normalize_phrase, validate_mnemonic};
use crate::keys::validate::check_private_key_format;
use crate::keys::{derive, DerivedKeyPair, PublicKeyDeriver};
use crate::state::{SecretType, SessionRepository, VaultRecord, VaultRepository};
use crate::storage::KeyValueStore;
use crate::vault::VaultCrypto;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocking,
    Unlocked,
}

/// Receives lock-state changes, e.g. to update a badge on the toolbar icon.
pub trait LockStatusListener: Send + Sync {
    fn lock_status_changed(&self, is_locked: bool);
}

impl<T: LockStatusListener + ?Sized> LockStatusListener for Arc<T> {
    fn lock_status_changed(&self, is_locked: bool) {
        (**self).lock_status_changed(is_locked)
    }
}

pub struct SessionController<D, E, L> {
    vault: VaultRepository<D>,
    session: SessionRepository<E>,
    crypto: VaultCrypto,
    deriver: Arc<dyn PublicKeyDeriver>,
    listener: L,
    config: ControllerConfig,
    settings: Settings,
    state: LockState,
    password: Option<SensitiveString>,
    failed_attempts: u32,
    locked_out_until: Option<DateTime<Utc>>,
}

impl<D, E, L> SessionController<D, E, L>
where
    D: KeyValueStore,
    E: KeyValueStore,
    L: LockStatusListener,
{
    /// Build a locked controller, loading settings from the durable area.
    pub async fn open(
        durable: D,
        ephemeral: E,
        crypto: VaultCrypto,
        deriver: Arc<dyn PublicKeyDeriver>,
        listener: L,
        config: ControllerConfig,
    ) -> Result<Self> {
        let settings = Settings::load(&durable).await?;
        debug!(
            durable = durable.name(),
            ephemeral = ephemeral.name(),
            auto_lock = %settings.auto_lock_timeout,
            "Session controller opened"
        );
        Ok(Self {
            vault: VaultRepository::new(durable),
            session: SessionRepository::new(ephemeral),
            crypto,
            deriver,
            listener,
            config,
            settings,
            state: LockState::Locked,
            password: None,
            failed_attempts: 0,
            locked_out_until: None,
        })
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state != LockState::Unlocked
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub async fn has_vault(&self) -> Result<bool> {
        self.vault.exists().await
    }

    pub async fn vault_record(&self) -> Result<Option<VaultRecord>> {
        self.vault.load().await
    }

    // ── Wallet lifecycle ──

    /// Encrypt `secret` under `password` into a new vault and unlock it.
    /// Returns the wallet's public key.
    pub async fn create_wallet(
        &mut self,
        password: &str,
        secret: &str,
        secret_type: SecretType,
    ) -> Result<String> {
        password::check_password(password, self.config.min_password_len)?;
        if self.vault.exists().await? {
            return Err(VaultError::Validation("A wallet already exists".into()));
        }

        let (secret, public_key) = match secret_type {
            SecretType::Mnemonic => {
                let phrase = normalize_phrase(secret);
                validate_mnemonic(phrase.expose())?;
                let pair = derive::derive_key_pair(phrase.expose(), self.deriver.as_ref())?;
                (phrase, pair.public_key)
            }
            SecretType::PrivateKey => {
                let key = SensitiveString::new(secret.trim());
                check_private_key_format(key.expose())?;
                let public_key = self.deriver.public_key(key.expose())?;
                (key, public_key)
            }
        };

        let encrypted = self
            .crypto
            .encrypt_blocking(secret, SensitiveString::new(password))
            .await?;
        let record = VaultRecord::new(
            encrypted,
            self.crypto.write_version(),
            secret_type,
            Utc::now(),
        );
        self.vault.save(&record).await?;

        self.enter_unlocked(SensitiveString::new(password), Utc::now())
            .await?;
        Ok(public_key)
    }

    /// Delete the vault and any cached session.
    pub async fn reset_wallet(&mut self) -> Result<()> {
        self.vault.delete().await?;
        self.lock().await?;
        self.failed_attempts = 0;
        self.locked_out_until = None;
        warn!("Wallet reset");
        Ok(())
    }

    // ── Lock state ──

    pub async fn unlock(&mut self, password: &str) -> Result<()> {
        self.unlock_at(password, Utc::now()).await
    }

    /// Verify `password` against the vault and transition to `Unlocked`.
    ///
    /// A wrong password leaves the controller `Locked` with
    /// [`VaultError::Authentication`]. After `max_failed_attempts` wrong
    /// passwords, attempts are refused until the lockout has passed.
    pub async fn unlock_at(&mut self, password: &str, now: DateTime<Utc>) -> Result<()> {
        self.state = LockState::Unlocking;
        match self.verified_secret(password, now).await {
            Ok(_) => self.enter_unlocked(SensitiveString::new(password), now).await,
            Err(e) => {
                self.state = LockState::Locked;
                self.password = None;
                Err(e)
            }
        }
    }

    /// Forget the password in memory and in the ephemeral area.
    pub async fn lock(&mut self) -> Result<()> {
        self.password = None;
        self.state = LockState::Locked;
        self.session.clear().await?;
        self.listener.lock_status_changed(true);
        info!("Wallet locked");
        Ok(())
    }

    /// Resume a cached session after a restart.
    ///
    /// Returns `true` and transitions to `Unlocked` when a vault and a
    /// session record exist and the record has not outlived the auto-lock
    /// timeout. The stored timestamp
    /// then slides forward to `now`. Otherwise any record is discarded and the
    /// controller stays `Locked`.
    pub async fn restore_session(&mut self, now: DateTime<Utc>) -> Result<bool> {
        let Some(record) = self.session.load().await? else {
            return Ok(false);
        };

        if !self.vault.exists().await? {
            self.discard_session().await?;
            warn!("Session record without a vault discarded");
            return Ok(false);
        }

        let policy = self.settings.auto_lock_timeout;
        let elapsed = record.elapsed(now);
        let elapsed_ms = elapsed.num_milliseconds();
        if !policy.allows(elapsed) {
            self.discard_session().await?;
            info!(elapsed_ms, auto_lock = %policy, "Session expired");
            return Ok(false);
        }

        self.session.save(&record.password, now).await?;
        self.password = Some(SensitiveString::new(record.password.as_str()));
        self.state = LockState::Unlocked;
        self.listener.lock_status_changed(false);
        info!(elapsed_ms, "Session restored");
        Ok(true)
    }

    /// Slide the session timestamp forward on user activity.
    pub async fn touch(&self, now: DateTime<Utc>) -> Result<()> {
        match &self.password {
            Some(password)
                if self.state == LockState::Unlocked
                    && self.settings.auto_lock_timeout.persists_session() =>
            {
                self.session.save(password.expose(), now).await
            }
            _ => Ok(()),
        }
    }

    /// Persist a new auto-lock timeout and apply it to the current session.
    pub async fn set_auto_lock_timeout(&mut self, minutes: i64, now: DateTime<Utc>) -> Result<()> {
        let policy = AutoLock::try_from(minutes)?;
        let settings = Settings {
            auto_lock_timeout: policy,
        };
        settings.save(self.vault.store()).await?;
        self.settings = settings;

        if let (LockState::Unlocked, Some(password)) = (self.state, &self.password) {
            if policy.persists_session() {
                self.session.save(password.expose(), now).await?;
            } else {
                self.session.clear().await?;
            }
        }
        info!(auto_lock = %policy, "Auto-lock timeout updated");
        Ok(())
    }

    // ── Keys ──

    /// Re-enter the password to show the raw private key.
    pub async fn reveal_private_key(&mut self, password: &str) -> Result<SensitiveString> {
        let (secret_type, secret) = self.verified_secret(password, Utc::now()).await?;
        match secret_type {
            SecretType::Mnemonic => derive::derive_chain_private_key(secret.expose()),
            SecretType::PrivateKey => Ok(SensitiveString::new(secret.expose().trim())),
        }
    }

    /// Key pair of the unlocked wallet.
    pub async fn derive_key_pair(&self) -> Result<DerivedKeyPair> {
        let password = match (&self.state, &self.password) {
            (LockState::Unlocked, Some(password)) => password.clone(),
            _ => return Err(VaultError::Validation("Wallet is locked".into())),
        };
        let (secret_type, secret) = self.decrypt_vault(password).await?;
        match secret_type {
            SecretType::Mnemonic => derive::derive_key_pair(secret.expose(), self.deriver.as_ref()),
            SecretType::PrivateKey => {
                let private_key = SensitiveString::new(secret.expose().trim());
                let public_key = self.deriver.public_key(private_key.expose())?;
                Ok(DerivedKeyPair {
                    public_key,
                    private_key,
                })
            }
        }
    }

    // ── Internals ──

    async fn decrypt_vault(&self, password: SensitiveString) -> Result<(SecretType, SensitiveString)> {
        let record = self
            .vault
            .load()
            .await?
            .ok_or_else(|| VaultError::Validation("No wallet found".into()))?;
        let secret = self
            .crypto
            .decrypt_blocking(record.version, record.encrypted_secret(), password)
            .await?;
        Ok((record.secret_type, secret))
    }

    /// Decrypt with a user-entered password, counting failures.
    async fn verified_secret(
        &mut self,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<(SecretType, SensitiveString)> {
        if let Some(until) = self.locked_out_until {
            if now < until {
                let wait = (until - now).num_seconds().max(1);
                return Err(VaultError::Validation(format!(
                    "Too many failed attempts, try again in {wait}s"
                )));
            }
            self.locked_out_until = None;
        }

        match self.decrypt_vault(SensitiveString::new(password)).await {
            Ok(decrypted) => {
                self.failed_attempts = 0;
                Ok(decrypted)
            }
            Err(VaultError::Authentication) => {
                self.failed_attempts += 1;
                warn!(attempts = self.failed_attempts, "Incorrect password");
                if self.failed_attempts >= self.config.max_failed_attempts {
                    let lockout = chrono::Duration::from_std(self.config.lockout)
                        .unwrap_or_else(|_| chrono::Duration::seconds(30));
                    self.locked_out_until = Some(now + lockout);
                    self.failed_attempts = 0;
                    warn!(
                        lockout_secs = self.config.lockout.as_secs(),
                        "Unlock attempts suspended"
                    );
                }
                Err(VaultError::Authentication)
            }
            Err(e) => Err(e),
        }
    }

    async fn discard_session(&mut self) -> Result<()> {
        self.session.clear().await?;
        self.password = None;
        self.state = LockState::Locked;
        Ok(())
    }

    async fn enter_unlocked(&mut self, password: SensitiveString, now: DateTime<Utc>) -> Result<()> {
        if self.settings.auto_lock_timeout.persists_session() {
            if let Err(e) = self.session.save(password.expose(), now).await {
                self.state = LockState::Locked;
                return Err(e);
            }
        }
        self.password = Some(password);
        self.state = LockState::Unlocked;
        self.listener.lock_status_changed(false);
        info!("Wallet unlocked");
        Ok(())
    }
}
