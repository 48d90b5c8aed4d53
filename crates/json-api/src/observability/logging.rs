//! Tracing subscriber setup.

use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::ObservabilityError;

/// Dependencies that are noisy at `info`.
const QUIET_TARGETS: &str = "h2=warn,hyper=warn,sqlx=warn";

fn default_directives(level: &str) -> String {
    format!("{level},{QUIET_TARGETS}")
}

pub(super) fn init_subscriber(config: &ServerConfig) -> Result<(), ObservabilityError> {
    let fmt_layer = match config.logging.log_format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.logging.log_level)));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()?;

    Ok(())
}
