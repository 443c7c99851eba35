/// Message routes exposed to the UI layer.
///
/// Requests are tagged by `type` and carry a `payload` object. Failures come
/// back as an `{ "error": … }` response, never as a transport error.
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::AppState;
use crate::error::VaultError;
use crate::keys::validate::{validate_private_key, ValidatePrivateKeyResponse};
use crate::keys::{derive, DerivedKeyPair};
use crate::session::LockStatusListener;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum AppMessage {
    #[serde(rename = "DERIVE_KEYS_FROM_MNEMONIC")]
    DeriveKeysFromMnemonic { mnemonic: String },
    #[serde(rename = "VALIDATE_PRIVATE_KEY")]
    ValidatePrivateKey {
        #[serde(rename = "privateKey")]
        private_key: String,
    },
    #[serde(rename = "UPDATE_LOCK_STATUS")]
    UpdateLockStatus {
        #[serde(rename = "isLocked")]
        is_locked: bool,
    },
}

impl AppMessage {
    fn kind(&self) -> &'static str {
        match self {
            AppMessage::DeriveKeysFromMnemonic { .. } => "DERIVE_KEYS_FROM_MNEMONIC",
            AppMessage::ValidatePrivateKey { .. } => "VALIDATE_PRIVATE_KEY",
            AppMessage::UpdateLockStatus { .. } => "UPDATE_LOCK_STATUS",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AppResponse {
    Keys(DerivedKeyPair),
    Validation(ValidatePrivateKeyResponse),
    Success { success: bool },
    Error { error: String },
}

impl From<VaultError> for AppResponse {
    fn from(e: VaultError) -> Self {
        AppResponse::Error {
            error: e.to_string(),
        }
    }
}

// ─── Dispatch ────────────────────────────────────────────

/// Parse one raw request and dispatch it.
pub async fn handle_raw(state: &AppState, raw: &str) -> AppResponse {
    match serde_json::from_str::<AppMessage>(raw) {
        Ok(message) => handle_message(state, message).await,
        Err(e) => {
            warn!(error = %e, "Malformed message");
            AppResponse::Error {
                error: format!("Invalid message: {e}"),
            }
        }
    }
}

pub async fn handle_message(state: &AppState, message: AppMessage) -> AppResponse {
    debug!(kind = message.kind(), "Handling message");
    match message {
        AppMessage::DeriveKeysFromMnemonic { mnemonic } => {
            derive_keys(Arc::clone(&state.deriver), mnemonic).await
        }
        AppMessage::ValidatePrivateKey { private_key } => AppResponse::Validation(
            validate_private_key(&private_key, state.deriver.as_ref()),
        ),
        AppMessage::UpdateLockStatus { is_locked } => {
            state.badge.lock_status_changed(is_locked);
            AppResponse::Success { success: true }
        }
    }
}

// ─── Handlers ────────────────────────────────────────────

async fn derive_keys(
    deriver: Arc<dyn crate::keys::PublicKeyDeriver>,
    mnemonic: String,
) -> AppResponse {
    // Seed stretching is 2048 rounds of HMAC-SHA512.
    let result = tokio::task::spawn_blocking(move || {
        let mnemonic = zeroize::Zeroizing::new(mnemonic);
        derive::derive_key_pair(&mnemonic, deriver.as_ref())
    })
    .await;

    match result {
        Ok(Ok(pair)) => AppResponse::Keys(pair),
        Ok(Err(e)) => e.into(),
        Err(e) => AppResponse::Error {
            error: format!("Key derivation task failed: {e}"),
        },
    }
}
