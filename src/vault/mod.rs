/// Vault crypto service: password-based encryption of the wallet secret.
///
/// Flow for `encrypt`:
/// 1. Draw a fresh 16-byte salt and 12-byte IV
/// 2. Stretch the password with the KDF selected by the vault version
/// 3. AES-256-GCM encrypt the UTF-8 secret
/// 4. Return ciphertext, salt and IV as lowercase hex
///
/// The AEAD tag is the only password check. There is no stored password
/// hash; a wrong password and a corrupted record both fail with
/// [`VaultError::Authentication`].
use serde::{Deserialize, Serialize};

use crate::crypto::aead;
use crate::crypto::kdf::{self, Kdf, VERSION_PBKDF2};
use crate::crypto::sensitive::{SensitiveBytes32, SensitiveString};
use crate::error::{Result, VaultError};

/// Hex-encoded output of a vault encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    pub ciphertext: String,
    pub salt: String,
    pub iv: String,
}

/// Cost profile used to resolve a vault version into KDF parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfProfile {
    Production,
    /// Same algorithms at trivial cost. Only for tests.
    #[cfg(test)]
    Fast,
}

/// Encrypts and decrypts the vault secret under a password.
#[derive(Debug, Clone, Copy)]
pub struct VaultCrypto {
    write_version: u32,
    profile: KdfProfile,
}

impl Default for VaultCrypto {
    fn default() -> Self {
        Self {
            write_version: VERSION_PBKDF2,
            profile: KdfProfile::Production,
        }
    }
}

impl VaultCrypto {
    /// Service writing new vaults with the given format version.
    pub fn new(write_version: u32) -> Result<Self> {
        Kdf::for_version(write_version)?;
        Ok(Self {
            write_version,
            profile: KdfProfile::Production,
        })
    }

    #[cfg(test)]
    pub fn fast_for_tests(write_version: u32) -> Self {
        Self {
            write_version,
            profile: KdfProfile::Fast,
        }
    }

    /// Format version stamped on newly created vaults.
    pub fn write_version(&self) -> u32 {
        self.write_version
    }

    fn kdf(&self, version: u32) -> Result<Kdf> {
        let kdf = Kdf::for_version(version)?;
        match self.profile {
            KdfProfile::Production => Ok(kdf),
            #[cfg(test)]
            KdfProfile::Fast => Ok(Kdf::fast_for_tests(version)),
        }
    }

    /// Stretch a password into an AES-256 key for the given vault version.
    pub fn derive_symmetric_key(
        &self,
        password: &str,
        salt: &[u8],
        version: u32,
    ) -> Result<SensitiveBytes32> {
        self.kdf(version)?.derive_key(password.as_bytes(), salt)
    }

    /// Encrypt a secret with a fresh salt and IV under the write version.
    pub fn encrypt(&self, plaintext: &str, password: &str) -> Result<EncryptedSecret> {
        let salt = kdf::generate_salt();
        let iv = aead::generate_nonce();
        let key = self.derive_symmetric_key(password, &salt, self.write_version)?;
        let ciphertext = aead::encrypt(&key, &iv, plaintext.as_bytes())?;

        Ok(EncryptedSecret {
            ciphertext: hex::encode(ciphertext),
            salt: hex::encode(salt),
            iv: hex::encode(iv),
        })
    }

    /// Decrypt a version-1 vault secret.
    pub fn decrypt(
        &self,
        ciphertext: &str,
        password: &str,
        salt: &str,
        iv: &str,
    ) -> Result<SensitiveString> {
        self.decrypt_versioned(VERSION_PBKDF2, ciphertext, password, salt, iv)
    }

    /// Decrypt a vault secret written under any supported version.
    ///
    /// Once the version is known, every failure (malformed hex, a salt the
    /// KDF refuses, a wrong IV length, a failing tag, non-UTF-8 output) is
    /// reported as [`VaultError::Authentication`]. An unknown version is a
    /// [`VaultError::Validation`] and no key is derived.
    pub fn decrypt_versioned(
        &self,
        version: u32,
        ciphertext: &str,
        password: &str,
        salt: &str,
        iv: &str,
    ) -> Result<SensitiveString> {
        let kdf = self.kdf(version)?;

        let salt = hex::decode(salt).map_err(|_| VaultError::Authentication)?;
        let iv = hex::decode(iv).map_err(|_| VaultError::Authentication)?;
        let ciphertext = hex::decode(ciphertext).map_err(|_| VaultError::Authentication)?;

        let key = kdf
            .derive_key(password.as_bytes(), &salt)
            .map_err(|_| VaultError::Authentication)?;
        let plaintext = aead::decrypt(&key, &iv, &ciphertext)?;

        String::from_utf8(plaintext)
            .map(SensitiveString::from)
            .map_err(|_| VaultError::Authentication)
    }

    /// [`Self::encrypt`] on the blocking thread pool.
    pub async fn encrypt_blocking(
        &self,
        plaintext: SensitiveString,
        password: SensitiveString,
    ) -> Result<EncryptedSecret> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.encrypt(plaintext.expose(), password.expose()))
            .await
            .map_err(|e| VaultError::Encryption(format!("Encryption task failed: {e}")))?
    }

    /// [`Self::decrypt_versioned`] on the blocking thread pool.
    pub async fn decrypt_blocking(
        &self,
        version: u32,
        secret: EncryptedSecret,
        password: SensitiveString,
    ) -> Result<SensitiveString> {
        let service = *self;
        tokio::task::spawn_blocking(move || {
            service.decrypt_versioned(
                version,
                &secret.ciphertext,
                password.expose(),
                &secret.salt,
                &secret.iv,
            )
        })
        .await
        .map_err(|e| VaultError::Encryption(format!("Decryption task failed: {e}")))?
    }
}
