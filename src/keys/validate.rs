/// Format checks for imported private keys.
///
/// Runs before any vault encryption: a key that fails here is rejected
/// without touching the password or storage.
use serde::Serialize;

use super::{PublicKeyDeriver, PRIVATE_KEY_PREFIX, PRIVATE_KEY_STR_LEN};
use crate::error::{Result, VaultError};

/// Result of validating an imported private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePrivateKeyResponse {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check prefix and length of an encoded private key.
pub fn check_private_key_format(private_key: &str) -> Result<()> {
    if !private_key.starts_with(PRIVATE_KEY_PREFIX) {
        return Err(VaultError::Validation(format!(
            "Private key must start with '{PRIVATE_KEY_PREFIX}'"
        )));
    }
    if private_key.len() != PRIVATE_KEY_STR_LEN {
        return Err(VaultError::Validation(format!(
            "Private key must be {PRIVATE_KEY_STR_LEN} characters, got {}",
            private_key.len()
        )));
    }
    Ok(())
}

/// Validate an imported private key and derive its public key.
pub fn validate_private_key(
    private_key: &str,
    deriver: &dyn PublicKeyDeriver,
) -> ValidatePrivateKeyResponse {
    let trimmed = private_key.trim();
    let result = check_private_key_format(trimmed).and_then(|_| deriver.public_key(trimmed));

    match result {
        Ok(public_key) => ValidatePrivateKeyResponse {
            is_valid: true,
            public_key: Some(public_key),
            error: None,
        },
        Err(e) => ValidatePrivateKeyResponse {
            is_valid: false,
            public_key: None,
            error: Some(e.to_string()),
        },
    }
}
