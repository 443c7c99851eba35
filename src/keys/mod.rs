/// Mina key material: derivation from mnemonics, encoding and validation.
///
/// Key hierarchy:
/// ```text
/// mnemonic ──BIP-39──▶ 64-byte seed ──BIP-32 m/44'/12586'/0'/0/0──▶ secp256k1 scalar
///     └─ mask top two bits, reverse to LE, tag 0x01 ──▶ "EK…" private key
///           └─ scalar × Pallas generator ──▶ "B62…" public key
/// ```
pub mod derive;
pub mod mnemonic;
pub mod pallas;
pub mod validate;

use std::fmt;

use serde::Serialize;

use crate::crypto::sensitive::SensitiveString;
use crate::error::Result;

/// Base58Check version byte of an encoded private key.
pub const PRIVATE_KEY_VERSION: u8 = 0x5a;
/// Base58Check version byte of an encoded public key.
pub const PUBLIC_KEY_VERSION: u8 = 0xcb;
/// Type tag prepended to the 32-byte little-endian private scalar.
pub const PRIVATE_KEY_TAG: u8 = 0x01;
/// Length of an encoded private key string.
pub const PRIVATE_KEY_STR_LEN: usize = 52;
/// All encoded private keys start with this prefix.
pub const PRIVATE_KEY_PREFIX: &str = "EK";

/// The single account path used by the wallet (BIP-44 coin type 12586).
pub const DERIVATION_PATH: &str = "m/44'/12586'/0'/0/0";

/// Turns an encoded private key into its public address.
///
/// This is the seam to the chain's signing library: the vault only needs
/// public-key derivation for display and import validation.
pub trait PublicKeyDeriver: Send + Sync {
    fn public_key(&self, private_key: &str) -> Result<String>;
}

/// Public and private key of the wallet account, held only for the duration
/// of a display or signing operation.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedKeyPair {
    pub public_key: String,
    #[serde(serialize_with = "serialize_secret")]
    pub private_key: SensitiveString,
}

fn serialize_secret<S: serde::Serializer>(
    value: &SensitiveString,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(value.expose())
}

impl fmt::Debug for DerivedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
