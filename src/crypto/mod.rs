/// Cryptographic primitives for the wallet vault.
pub mod aead;
pub mod hash;
pub mod kdf;
pub mod sensitive;
