/// Mnemonic to Mina private key derivation.
///
/// Standard BIP-39 seed and BIP-32 (secp256k1) derivation, followed by Mina's
/// own adaptation of the 32-byte output:
/// 1. clear the two high bits (`byte[0] &= 0x3f`) so the value fits the
///    Pallas scalar field,
/// 2. reverse to little-endian,
/// 3. prepend the `0x01` key tag and Base58Check-encode with version `0x5a`.
use std::str::FromStr;

use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use tracing::debug;
use zeroize::Zeroizing;

use super::{
    DerivedKeyPair, PublicKeyDeriver, DERIVATION_PATH, PRIVATE_KEY_TAG, PRIVATE_KEY_VERSION,
};
use crate::codec::base58check;
use crate::crypto::sensitive::SensitiveString;
use crate::error::{Result, VaultError};

/// BIP-39 seed for a mnemonic with the empty passphrase.
pub fn mnemonic_to_seed(mnemonic: &str) -> Result<Zeroizing<[u8; 64]>> {
    let parsed = Mnemonic::parse_in_normalized(Language::English, mnemonic.trim())
        .map_err(|e| VaultError::Validation(format!("Invalid mnemonic: {e}")))?;
    Ok(Zeroizing::new(parsed.to_seed("")))
}

/// Raw 32-byte secp256k1 scalar at [`DERIVATION_PATH`], big-endian.
pub fn derive_raw_key(seed: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
    let path = DerivationPath::from_str(DERIVATION_PATH)
        .map_err(|e| VaultError::Derivation(format!("Invalid path '{DERIVATION_PATH}': {e}")))?;

    let child = XPrv::derive_from_path(seed, &path)
        .map_err(|e| VaultError::Derivation(format!("Child derivation failed: {e}")))?;

    let key_bytes: [u8; 32] = child.private_key().to_bytes().into();
    if key_bytes.iter().all(|b| *b == 0) {
        return Err(VaultError::Derivation(
            "Could not derive private key".into(),
        ));
    }
    Ok(Zeroizing::new(key_bytes))
}

/// Apply Mina's masking and byte order to a BIP-32 scalar and encode it.
pub fn encode_private_key(raw_be: &[u8; 32]) -> SensitiveString {
    let mut payload = Zeroizing::new([0u8; 33]);
    payload[0] = PRIVATE_KEY_TAG;
    for (i, byte) in raw_be.iter().rev().enumerate() {
        payload[1 + i] = *byte;
    }
    // raw_be[0] landed at the last position after the reversal.
    payload[32] &= 0x3f;

    SensitiveString::new(base58check::encode(&payload[..], PRIVATE_KEY_VERSION))
}

/// Derive the encoded Mina private key for a mnemonic.
///
/// Deterministic: the same phrase always yields the same key.
pub fn derive_chain_private_key(mnemonic: &str) -> Result<SensitiveString> {
    let seed = mnemonic_to_seed(mnemonic)?;
    let raw = derive_raw_key(&seed[..])?;
    debug!(path = DERIVATION_PATH, "Derived account key from mnemonic");
    Ok(encode_private_key(&raw))
}

/// Derive both keys of the wallet account from a mnemonic.
pub fn derive_key_pair(mnemonic: &str, deriver: &dyn PublicKeyDeriver) -> Result<DerivedKeyPair> {
    let private_key = derive_chain_private_key(mnemonic)?;
    let public_key = deriver.public_key(private_key.expose())?;
    Ok(DerivedKeyPair {
        public_key,
        private_key,
    })
}
