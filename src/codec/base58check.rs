/// Base58Check encoding as used for Mina keys and addresses.
///
/// Layout: `base58(version || payload || sha256d(version || payload)[..4])`
/// over the Bitcoin alphabet. Each leading zero byte of the versioned input
/// becomes a leading `'1'` in the output.
use crate::crypto::hash::sha256d;
use crate::error::{Result, VaultError};

pub const CHECKSUM_LEN: usize = 4;

/// Encode raw bytes as base-58 without a checksum.
pub fn to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a base-58 string without checking a checksum.
pub fn from_base58(s: &str) -> Result<Vec<u8>> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| VaultError::Validation(format!("Invalid base58: {e}")))
}

fn checksum(versioned: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = sha256d(versioned);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Prefix `payload` with `version`, append the checksum and base-58 encode.
pub fn encode(payload: &[u8], version: u8) -> String {
    let mut buf = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    buf.push(version);
    buf.extend_from_slice(payload);
    let check = checksum(&buf);
    buf.extend_from_slice(&check);
    to_base58(&buf)
}

/// Decode a Base58Check string, verify the checksum and version byte, and
/// return the payload without version or checksum.
pub fn decode(s: &str, expected_version: u8) -> Result<Vec<u8>> {
    let raw = from_base58(s)?;
    if raw.len() < 1 + CHECKSUM_LEN {
        return Err(VaultError::Validation(format!(
            "Base58Check input too short: {} bytes",
            raw.len()
        )));
    }

    let (versioned, check) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum(versioned) != check {
        return Err(VaultError::Validation("Base58Check checksum mismatch".into()));
    }

    let version = versioned[0];
    if version != expected_version {
        return Err(VaultError::Validation(format!(
            "Unexpected version byte 0x{version:02x}, expected 0x{expected_version:02x}"
        )));
    }

    Ok(versioned[1..].to_vec())
}
