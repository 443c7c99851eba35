use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    /// Mnemonic to key derivation did not produce a usable private key.
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    /// AEAD tag did not verify. Wrong password and tampered vault data are
    /// reported identically.
    #[error("Incorrect password")]
    Authentication,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Password key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
