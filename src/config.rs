/// Wallet settings and controller configuration.
///
/// `Settings` is user-facing and persisted under the `clorio_settings` key of
/// the durable area. `ControllerConfig` is fixed at startup.
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::storage::{self, KeyValueStore, SETTINGS_KEY};

/// When a cached unlock expires.
///
/// Serialized as minutes: `0` = on window close, `-1` = never, `n > 0` = after
/// `n` minutes since the last restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AutoLock {
    OnWindowClose,
    AfterMinutes(u32),
    Never,
}

impl AutoLock {
    pub fn minutes(self) -> i64 {
        i64::from(self)
    }

    /// Whether a session record may be written at all under this policy.
    pub fn persists_session(self) -> bool {
        !matches!(self, AutoLock::OnWindowClose)
    }

    /// Whether a session last touched `elapsed` ago is still valid.
    ///
    /// A negative `elapsed` (timestamp ahead of the clock) fails every timed
    /// policy; `Never` skips the check.
    pub fn allows(self, elapsed: chrono::Duration) -> bool {
        match self {
            AutoLock::OnWindowClose => false,
            AutoLock::Never => true,
            AutoLock::AfterMinutes(limit) => {
                elapsed >= chrono::Duration::zero()
                    && elapsed <= chrono::Duration::minutes(i64::from(limit))
            }
        }
    }
}

impl Default for AutoLock {
    fn default() -> Self {
        AutoLock::AfterMinutes(15)
    }
}

impl TryFrom<i64> for AutoLock {
    type Error = VaultError;

    fn try_from(minutes: i64) -> Result<Self> {
        match minutes {
            0 => Ok(AutoLock::OnWindowClose),
            -1 => Ok(AutoLock::Never),
            m if m > 0 => u32::try_from(m)
                .map(AutoLock::AfterMinutes)
                .map_err(|_| VaultError::Validation(format!("Auto-lock timeout too large: {m}"))),
            m => Err(VaultError::Validation(format!(
                "Invalid auto-lock timeout: {m}"
            ))),
        }
    }
}

impl From<AutoLock> for i64 {
    fn from(value: AutoLock) -> Self {
        match value {
            AutoLock::OnWindowClose => 0,
            AutoLock::Never => -1,
            AutoLock::AfterMinutes(m) => i64::from(m),
        }
    }
}

impl fmt::Display for AutoLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoLock::OnWindowClose => f.write_str("when the window closes"),
            AutoLock::Never => f.write_str("never"),
            AutoLock::AfterMinutes(m) => write!(f, "{m} min"),
        }
    }
}

/// User settings relevant to the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub auto_lock_timeout: AutoLock,
}

impl Settings {
    /// Load settings, falling back to defaults when none are stored.
    pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(storage::get_json(store, SETTINGS_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        storage::set_json(store, SETTINGS_KEY, self).await
    }
}

/// Startup configuration of the session controller.
///
/// The vault format written for new wallets is chosen by the
/// [`VaultCrypto`](crate::vault::VaultCrypto) handed to the controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Failed unlocks allowed before new attempts are refused.
    pub max_failed_attempts: u32,
    /// How long unlocks are refused once the limit is hit.
    pub lockout: Duration,
    /// Minimum password length accepted when creating a wallet.
    pub min_password_len: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout: Duration::from_secs(30),
            min_password_len: 8,
        }
    }
}
