/// Text encodings for keys and addresses.
pub mod base58check;
