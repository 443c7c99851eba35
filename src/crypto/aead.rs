/// AES-256-GCM authenticated encryption for vault secrets.
///
/// Each encryption draws a fresh random 96-bit nonce. A (key, nonce) pair is
/// never reused; since every vault encryption also uses a fresh salt, the key
/// itself is almost always fresh too.
///
/// The ciphertext layout matches WebCrypto's AES-GCM output:
/// `ciphertext || tag(16B)`, no associated data.
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use crate::crypto::sensitive::SensitiveBytes32;
use crate::error::{Result, VaultError};

pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

/// Generate a random 12-byte nonce for AES-GCM.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt plaintext with AES-256-GCM under the given nonce.
///
/// Callers must pass a nonce obtained from [`generate_nonce`] for every call.
pub fn encrypt(
    key: &SensitiveBytes32,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| VaultError::Encryption(e.to_string()))
}

/// Decrypt and authenticate AES-256-GCM ciphertext.
///
/// Every failure is reported as [`VaultError::Authentication`].
pub fn decrypt(key: &SensitiveBytes32, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(VaultError::Authentication);
    }

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::Authentication)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| VaultError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key(byte: u8) -> SensitiveBytes32 {
        SensitiveBytes32::new([byte; 32])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = test_key(1);
        let nonce = generate_nonce();
        let plaintext = b"abandon abandon abandon about";

        let ciphertext = encrypt(&key, &nonce, plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len() + TAG_LEN);

        let decrypted = decrypt(&key, &nonce, &ciphertext).unwrap();
        assert_eq!(&decrypted, plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let nonce = generate_nonce();
        let ciphertext = encrypt(&test_key(1), &nonce, b"secret").unwrap();
        let result = decrypt(&test_key(2), &nonce, &ciphertext);
        assert!(matches!(result, Err(VaultError::Authentication)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key(3);
        let nonce = generate_nonce();
        let mut ciphertext = encrypt(&key, &nonce, b"secret").unwrap();
        ciphertext[0] ^= 0xFF;
        assert!(matches!(
            decrypt(&key, &nonce, &ciphertext),
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let key = test_key(4);
        let nonce = generate_nonce();
        let ciphertext = encrypt(&key, &nonce, b"secret").unwrap();
        let mut other = nonce;
        other[11] ^= 0x01;
        assert!(decrypt(&key, &other, &ciphertext).is_err());
        assert!(decrypt(&key, &nonce[..8], &ciphertext).is_err());
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let key = test_key(5);
        let nonce = generate_nonce();
        assert!(matches!(
            decrypt(&key, &nonce, &[0u8; 4]),
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn test_empty_plaintext() {
        let key = test_key(6);
        let nonce = generate_nonce();
        let ciphertext = encrypt(&key, &nonce, b"").unwrap();
        let decrypted = decrypt(&key, &nonce, &ciphertext).unwrap();
        assert!(decrypted.is_empty());
    }
}
