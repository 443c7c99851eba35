/// Background host for the wallet UI.
///
/// Speaks newline-delimited JSON: one request object per line in, one
/// response object per line out, in order. This is the framing a browser
/// native-messaging bridge or a parent process pipe can both drive.
/// Logging goes to stderr so stdout carries only responses.
pub mod routes;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::error::Result;
use crate::keys::PublicKeyDeriver;
use crate::session::LockStatusListener;

/// Lock indicator shown on the extension icon.
#[derive(Debug)]
pub struct LockBadge {
    locked: AtomicBool,
}

impl Default for LockBadge {
    fn default() -> Self {
        Self {
            locked: AtomicBool::new(true),
        }
    }
}

impl LockBadge {
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl LockStatusListener for LockBadge {
    fn lock_status_changed(&self, is_locked: bool) {
        let previous = self.locked.swap(is_locked, Ordering::Relaxed);
        if previous != is_locked {
            info!(is_locked, "Lock badge updated");
        }
    }
}

/// Shared state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub deriver: Arc<dyn PublicKeyDeriver>,
    pub badge: Arc<dyn LockStatusListener>,
}

impl AppState {
    pub fn new(deriver: Arc<dyn PublicKeyDeriver>, badge: Arc<dyn LockStatusListener>) -> Self {
        Self { deriver, badge }
    }
}

/// Serve requests from `reader` until EOF.
pub async fn serve<R, W>(state: &AppState, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0u64;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = routes::handle_raw(state, line).await;
        let mut bytes = serde_json::to_vec(&response)?;
        bytes.push(b'\n');
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        handled += 1;
    }

    debug!(handled, "Input closed");
    Ok(())
}

/// Serve on the process's stdin and stdout.
pub async fn serve_stdio(state: AppState) -> Result<()> {
    info!("clorio-vault host listening on stdio");
    let reader = BufReader::new(tokio::io::stdin());
    serve(&state, reader, tokio::io::stdout()).await
}
