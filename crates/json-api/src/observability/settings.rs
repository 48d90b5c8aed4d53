//! Request settings shared by the logging hoop.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::config::ServerConfig;

/// Milliseconds; zero turns slow-request warnings off.
static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(1_000);

pub(super) fn apply_runtime_config(config: &ServerConfig) {
    SLOW_REQUEST_THRESHOLD_MS.store(
        config.observability.slow_request_threshold_ms,
        Ordering::Relaxed,
    );
}

pub(super) fn slow_request_threshold() -> Option<Duration> {
    match SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed) {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    }
}
