//! Liveness probe.

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests
    pub status: String,

    /// Server package version
    pub version: String,
}

/// Healthcheck handler
///
/// Liveness only; the database is not probed.
#[endpoint(tags("health"), summary = "Liveness probe")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
