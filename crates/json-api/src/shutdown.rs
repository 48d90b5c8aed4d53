//! Graceful shutdown on Ctrl+C or SIGTERM.

use std::{io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install {signal} handler: {source}")]
    Install {
        signal: &'static str,
        #[source]
        source: io::Error,
    },
}

#[cfg(unix)]
async fn terminate() -> Result<(), ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(|source| ShutdownSignalError::Install {
            signal: "SIGTERM",
            source,
        })?
        .recv()
        .await;

    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> Result<(), ShutdownSignalError> {
    std::future::pending::<Result<(), ShutdownSignalError>>().await
}

/// Wait for a shutdown signal, then let in-flight requests drain for up to
/// `grace`.
pub(crate) async fn listen(handle: ServerHandle, grace: Duration) -> Result<(), ShutdownSignalError> {
    let received = tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(|source| ShutdownSignalError::Install { signal: "Ctrl+C", source })?;
            "ctrl_c"
        }
        result = terminate() => {
            result?;
            "terminate"
        }
    };

    info!(signal = received, grace_secs = grace.as_secs(), "shutting down");

    handle.stop_graceful(Some(grace));

    Ok(())
}
