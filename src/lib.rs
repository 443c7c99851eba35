pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod server;
pub mod session;
pub mod state;
pub mod storage;
pub mod vault;
