/// Persisted records of the wallet.
///
/// Field names and encodings are wire-exact with the records the browser
/// extension writes, so existing vaults stay readable.
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::kdf::VERSION_PBKDF2;
use crate::vault::EncryptedSecret;

/// What the vault plaintext is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretType {
    /// A BIP-39 phrase; keys are derived from it on demand.
    Mnemonic,
    /// An encoded `EK…` private key, used as-is.
    PrivateKey,
}

/// The encrypted vault. One per installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    /// AES-256-GCM output over the secret, hex.
    pub encrypted_seed: String,
    /// KDF salt (16 bytes), hex.
    pub salt: String,
    /// AES-GCM nonce (12 bytes), hex.
    pub iv: String,
    /// Format version; selects the KDF.
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(rename = "type")]
    pub secret_type: SecretType,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

fn default_version() -> u32 {
    VERSION_PBKDF2
}

impl VaultRecord {
    pub fn new(
        encrypted: EncryptedSecret,
        version: u32,
        secret_type: SecretType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            encrypted_seed: encrypted.ciphertext,
            salt: encrypted.salt,
            iv: encrypted.iv,
            version,
            secret_type,
            created_at: created_at.timestamp_millis(),
        }
    }

    /// The ciphertext triple in the form the crypto service takes.
    pub fn encrypted_secret(&self) -> EncryptedSecret {
        EncryptedSecret {
            ciphertext: self.encrypted_seed.clone(),
            salt: self.salt.clone(),
            iv: self.iv.clone(),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }
}

/// Cached unlock, kept only in the ephemeral area.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub password: String,
    /// Milliseconds since the Unix epoch of the last restore or unlock.
    pub timestamp: i64,
}

impl SessionRecord {
    pub fn new(password: &str, now: DateTime<Utc>) -> Self {
        Self {
            password: password.to_string(),
            timestamp: now.timestamp_millis(),
        }
    }

    /// Time between the stored timestamp and `now`, at millisecond
    /// resolution. Negative when the timestamp lies ahead of `now`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        Duration::milliseconds(now.timestamp_millis() - self.timestamp)
    }
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("password", &"<redacted>")
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl Drop for SessionRecord {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.password);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_vault_record_wire_format() {
        let record = VaultRecord {
            encrypted_seed: "ab".into(),
            salt: "cd".into(),
            iv: "ef".into(),
            version: 1,
            secret_type: SecretType::PrivateKey,
            created_at: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "encryptedSeed": "ab",
                "salt": "cd",
                "iv": "ef",
                "version": 1,
                "type": "privateKey",
                "createdAt": 1_700_000_000_000i64,
            })
        );
        let back: VaultRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_vault_record_missing_version_defaults_to_one() {
        let record: VaultRecord = serde_json::from_value(json!({
            "encryptedSeed": "00",
            "salt": "00",
            "iv": "00",
            "type": "mnemonic",
            "createdAt": 0,
        }))
        .unwrap();
        assert_eq!(record.version, 1);
        assert_eq!(record.secret_type, SecretType::Mnemonic);
    }

    #[test]
    fn test_session_elapsed() {
        let now = Utc::now();
        let record = SessionRecord::new("pw", now - Duration::minutes(16));
        assert_eq!(record.elapsed(now), Duration::minutes(16));

        let idle = now - Duration::minutes(15) - Duration::milliseconds(30_500);
        let record = SessionRecord::new("pw", idle);
        assert_eq!(record.elapsed(now).num_milliseconds(), 15 * 60_000 + 30_500);

        let ahead = SessionRecord::new("pw", now + Duration::seconds(5));
        assert!(ahead.elapsed(now) < Duration::zero());
    }

    #[test]
    fn test_session_debug_redacts_password() {
        let record = SessionRecord::new("hunter22", Utc::now());
        assert!(!format!("{record:?}").contains("hunter22"));
    }
}
