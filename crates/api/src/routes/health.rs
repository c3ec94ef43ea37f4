//! Liveness endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Liveness snapshot of the report service.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the service can answer at all.
    pub status: &'static str,
    /// Service identifier, for multi-service dashboards.
    pub service: &'static str,
    /// Build version.
    pub version: &'static str,
}

impl HealthResponse {
    fn current() -> Self {
        Self {
            status: "ok",
            service: "dte-reports",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}

/// Creates the liveness route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_payload_shape() {
        let body = serde_json::to_value(HealthResponse::current()).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "dte-reports");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
