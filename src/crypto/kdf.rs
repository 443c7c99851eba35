/// Password-based key derivation for vault encryption.
///
/// The KDF is selected by the vault record's `version` field:
/// - version 1: PBKDF2-HMAC-SHA256, 600,000 iterations
/// - version 2: Argon2id, t=3, m=64 MiB, p=1
///
/// Both produce a 256-bit key that is only ever handed to AES-256-GCM.
use argon2::{Algorithm, Argon2, Params, Version};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::crypto::sensitive::SensitiveBytes32;
use crate::error::{Result, VaultError};

pub const SALT_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

pub const PBKDF2_ITERATIONS: u32 = 600_000;

const ARGON2_TIME_COST: u32 = 3;
const ARGON2_MEMORY_KIB: u32 = 65_536; // 64 MiB
const ARGON2_PARALLELISM: u32 = 1;

/// Vault format versions understood by this crate.
pub const VERSION_PBKDF2: u32 = 1;
pub const VERSION_ARGON2ID: u32 = 2;

/// A key-stretching function and its cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kdf {
    Pbkdf2Sha256 { iterations: u32 },
    Argon2id { memory_kib: u32, time_cost: u32, parallelism: u32 },
}

impl Kdf {
    /// Production parameters for a vault format version.
    pub fn for_version(version: u32) -> Result<Self> {
        match version {
            VERSION_PBKDF2 => Ok(Kdf::Pbkdf2Sha256 {
                iterations: PBKDF2_ITERATIONS,
            }),
            VERSION_ARGON2ID => Ok(Kdf::Argon2id {
                memory_kib: ARGON2_MEMORY_KIB,
                time_cost: ARGON2_TIME_COST,
                parallelism: ARGON2_PARALLELISM,
            }),
            other => Err(VaultError::Validation(format!(
                "Unsupported vault version: {other}"
            ))),
        }
    }

    /// Same algorithm as `for_version`, with costs cut down for tests.
    #[cfg(test)]
    pub fn fast_for_tests(version: u32) -> Self {
        match version {
            VERSION_ARGON2ID => Kdf::Argon2id {
                memory_kib: 1024,
                time_cost: 1,
                parallelism: 1,
            },
            _ => Kdf::Pbkdf2Sha256 { iterations: 1_000 },
        }
    }

    /// Derive a 32-byte key from a password and salt.
    pub fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<SensitiveBytes32> {
        let mut output = [0u8; KEY_LEN];
        match *self {
            Kdf::Pbkdf2Sha256 { iterations } => {
                if iterations == 0 {
                    return Err(VaultError::KeyDerivation(
                        "PBKDF2 iteration count must be positive".into(),
                    ));
                }
                pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut output);
            }
            Kdf::Argon2id {
                memory_kib,
                time_cost,
                parallelism,
            } => {
                let params = Params::new(memory_kib, time_cost, parallelism, Some(KEY_LEN))
                    .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;
                Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                    .hash_password_into(password, salt, &mut output)
                    .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;
            }
        }
        Ok(SensitiveBytes32::new(output))
    }
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}
