//! Process shutdown signals.

use std::future::pending;

use tracing::{info, warn};

/// Resolves on the first Ctrl-C or SIGTERM.
///
/// A handler that fails to install is logged and never fires; the other one
/// still does.
pub async fn shutdown_signal() {
    tokio::select! {
        () = interrupt() => info!("Received SIGINT (Ctrl+C)"),
        () = terminate() => info!("Received SIGTERM"),
    }
}

async fn interrupt() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "Failed to install Ctrl+C handler");
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            warn!(error = %error, "Failed to install SIGTERM handler");
            pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    pending::<()>().await;
}
