/// Wallet state layer.
///
/// Provides typed access over the host's key-value areas to:
/// - the encrypted vault record (durable)
/// - the cached session record (ephemeral)
pub mod models;
pub mod repository;

pub use models::{SecretType, SessionRecord, VaultRecord};
pub use repository::{SessionRepository, VaultRepository};
