/// BIP-39 phrase generation and import checks.
use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::crypto::sensitive::SensitiveString;
use crate::error::{Result, VaultError};

/// 128 bits of entropy, i.e. a 12-word phrase.
const NEW_WALLET_ENTROPY_BYTES: usize = 16;

/// Word counts accepted on import.
pub const ACCEPTED_WORD_COUNTS: [usize; 2] = [12, 24];

/// Generate a fresh 12-word English mnemonic from OS randomness.
pub fn generate_mnemonic() -> Result<SensitiveString> {
    let mut entropy = Zeroizing::new([0u8; NEW_WALLET_ENTROPY_BYTES]);
    rand::rngs::OsRng.fill_bytes(&mut entropy[..]);

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy[..])
        .map_err(|e| VaultError::Derivation(e.to_string()))?;
    Ok(SensitiveString::new(mnemonic.to_string()))
}

/// Check an imported phrase: 12 or 24 words, known words, valid checksum.
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    let words = phrase.split_whitespace().count();
    if !ACCEPTED_WORD_COUNTS.contains(&words) {
        return Err(VaultError::Validation(format!(
            "Seed phrase must be 12 or 24 words, got {words}"
        )));
    }
    Mnemonic::parse_in_normalized(Language::English, phrase.trim())
        .map_err(|e| VaultError::Validation(format!("Invalid mnemonic: {e}")))?;
    Ok(())
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_phrase(phrase: &str) -> SensitiveString {
    SensitiveString::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "))
}
