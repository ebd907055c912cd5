//! OS signal handling.

use crate::lifecycle::CancelToken;

/// Cancel `token` when the process receives Ctrl-C (SIGINT).
///
/// Returns the watcher task so callers may abort it once polling is done.
pub fn cancel_on_ctrl_c(token: CancelToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, cancelling polling");
                token.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    })
}
