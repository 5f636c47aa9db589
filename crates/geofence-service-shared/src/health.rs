//! Health check handlers for liveness and readiness probes.
//!
//! `/health/live` answers 200 whenever the process runs; `/health/ready`
//! additionally checks that the geolocation database file is still present.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Whether the geolocation database file is present (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_available: Option<bool>,

    /// Active resolver name (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            database_available: None,
            resolver: None,
        }
    }

    /// Create a ready status naming the active resolver.
    pub fn ready(service: &str, version: &str, resolver: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            database_available: Some(true),
            resolver: Some(resolver.to_string()),
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            database_available: Some(false),
            resolver: None,
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK if the service is running; depends on no external
/// resources.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 200 OK when the configured geolocation database file is present,
/// 503 otherwise. The database handle itself is opened per request, so
/// presence of the file is the strongest check that stays cheap.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if !state.database_available() {
        let status = HealthStatus::not_ready(service, version, "geolocation database missing");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, state.resolver().name());
    (StatusCode::OK, Json(status)).into_response()
}
