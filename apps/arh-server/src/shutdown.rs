//! Process signals that stop the server.

use anyhow::{Context, Result};
use tokio::signal;

/// Resolve on the first SIGINT or SIGTERM, yielding the name of the signal.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
#[cfg(unix)]
pub async fn shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("failed to install SIGTERM handler")?;

    tokio::select! {
        result = signal::ctrl_c() => result.context("failed to listen for SIGINT").map(|()| "SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

/// Resolve on Ctrl+C.
///
/// # Errors
/// Returns an error if the Ctrl+C handler cannot be installed.
#[cfg(not(unix))]
pub async fn shutdown_signal() -> Result<&'static str> {
    signal::ctrl_c().await.context("failed to listen for Ctrl+C")?;
    Ok("CTRL_C")
}
