//! IP-in-country verification HTTP microservice.
//!
//! This service answers one question: does a given IP address geolocate
//! inside one of a caller-supplied set of allowed countries?
//!
//! # Endpoints
//!
//! - `GET /verifyIPAddressInCountries` - Verify an IP against an allow list
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `GEOFENCE_DB_PATH` - Path to the MaxMind country database
//!   (default: data/geoipCountries.mmdb, relative to the working directory)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::env;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use serde::Serialize;
use tracing::{error, info};

use geofence_lib::is_allowed;
use geofence_service_shared::{
    AppState, ErrorResponse, LoggingConfig, MetricsConfig, VerificationRequest, health_live,
    health_ready, init_logging, init_metrics, metrics_handler, middleware::track_requests,
    record_verification, record_verification_failed,
};

/// Default database location relative to the working directory.
const DEFAULT_DB_PATH: &str = "data/geoipCountries.mmdb";

/// Successful verification payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerificationResponse {
    /// Canonical form of the verified address.
    ip_address: String,
    /// Whether the address geolocates inside the allow list.
    allowed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT from environment)
    let logging_config = LoggingConfig::from_env().with_service("verify");
    init_logging(&logging_config);

    // Initialize metrics
    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Log but don't fail - metrics are optional
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    // Load configuration from environment
    let db_path = env::var("GEOFENCE_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(db_path = %db_path, port = port, "starting verify service");

    // Resolve the database path eagerly; a misconfigured deployment dies
    // here instead of on the first request.
    let state = AppState::load(&db_path).map_err(|e| {
        error!(error = %e, path = %db_path, "failed to resolve geolocation database");
        e
    })?;

    info!(resolver = state.resolver().name(), "application state loaded");

    let app = app(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the route table. Registration happens once, before serving begins.
///
/// The verification endpoint is registered for any method: the handler
/// polices the method itself so an unsupported method answers 501 from the
/// service's own taxonomy rather than the framework's 405.
fn app(state: AppState) -> Router {
    Router::new()
        .route("/verifyIPAddressInCountries", any(verify_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

/// Handle `GET /verifyIPAddressInCountries`.
///
/// The request JSON arrives in the body even on GET; that is the documented
/// protocol of this endpoint, so the body is read as raw bytes and decoded
/// manually instead of relying on an extractor that would reject it with a
/// foreign error shape.
async fn verify_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    if method != Method::GET {
        record_verification_failed("unsupported_method");
        return ErrorResponse::not_implemented(&method, uri.path()).into_response();
    }

    let request: VerificationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            record_verification_failed("malformed_json");
            return ErrorResponse::bad_request(e).into_response();
        }
    };

    let ip = match request.parse_ip() {
        Ok(ip) => ip,
        Err(e) => {
            record_verification_failed("invalid_ip");
            return ErrorResponse::bad_request(e).into_response();
        }
    };

    // The resolver opens and closes the database per call; any failure here
    // is an environment problem the caller cannot fix.
    let country = match state.resolver().country_of(ip) {
        Ok(country) => country,
        Err(e) => {
            record_verification_failed("lookup_error");
            return ErrorResponse::internal_error(e).into_response();
        }
    };

    let allowed = is_allowed(&country, &request.allowed_countries);
    record_verification(allowed);

    info!(ip = %ip, country = %country, allowed = allowed, "verification completed");

    let response = VerificationResponse {
        ip_address: ip.to_string(),
        allowed,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use geofence_service_shared::test_utils::{StaticResolver, failing_state, test_state};
    use serde_json::{Value, json};

    use super::*;

    const ENDPOINT: &str = "/verifyIPAddressInCountries";

    fn server(state: AppState) -> TestServer {
        TestServer::new(app(state)).expect("failed to start test server")
    }

    #[tokio::test]
    async fn allows_ip_resolved_to_listed_country() {
        let server = server(test_state("United States"));

        let response = server
            .get(ENDPOINT)
            .json(&json!({"ipAddress": "8.8.8.8", "allowedCountries": ["United States"]}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body, json!({"ipAddress": "8.8.8.8", "allowed": true}));
    }

    #[tokio::test]
    async fn denies_ip_resolved_to_other_country() {
        let server = server(test_state("Germany"));

        let response = server
            .get(ENDPOINT)
            .json(&json!({"ipAddress": "1.2.3.4", "allowedCountries": ["France"]}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body, json!({"ipAddress": "1.2.3.4", "allowed": false}));
    }

    #[tokio::test]
    async fn denies_with_empty_allow_list() {
        let server = server(test_state("United States"));

        let response = server
            .get(ENDPOINT)
            .json(&json!({"ipAddress": "8.8.8.8", "allowedCountries": []}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["allowed"], json!(false));
    }

    #[tokio::test]
    async fn country_match_is_case_sensitive() {
        let server = server(test_state("United States"));

        let response = server
            .get(ENDPOINT)
            .json(&json!({"ipAddress": "8.8.8.8", "allowedCountries": ["united states"]}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["allowed"], json!(false));
    }

    #[tokio::test]
    async fn echoes_canonical_ip_form() {
        let server = server(test_state("Germany"));

        let response = server
            .get(ENDPOINT)
            .json(&json!({"ipAddress": "2001:0db8::0001", "allowedCountries": []}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["ipAddress"], json!("2001:db8::1"));
    }

    #[tokio::test]
    async fn non_get_method_yields_501_regardless_of_body() {
        let server = server(test_state("United States"));

        let response = server
            .post(ENDPOINT)
            .json(&json!({"ipAddress": "8.8.8.8", "allowedCountries": ["United States"]}))
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_IMPLEMENTED);
        let body: Value = response.json();
        assert_eq!(body["httpStatusCode"], json!(501));
        assert!(
            body["errorMessage"]
                .as_str()
                .unwrap()
                .contains("request type")
        );
    }

    #[tokio::test]
    async fn delete_method_also_yields_501() {
        let server = server(test_state("United States"));

        let response = server.delete(ENDPOINT).await;

        assert_eq!(response.status_code(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn malformed_json_yields_400() {
        let server = server(test_state("United States"));

        let response = server.get(ENDPOINT).text("{not valid json").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["httpStatusCode"], json!(400));
        assert!(
            body["errorMessage"]
                .as_str()
                .unwrap()
                .contains("ensure request JSON is valid")
        );
    }

    #[tokio::test]
    async fn invalid_ip_literal_yields_400() {
        let server = server(test_state("United States"));

        let response = server
            .get(ENDPOINT)
            .json(&json!({"ipAddress": "999.999.1.1", "allowedCountries": ["United States"]}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["httpStatusCode"], json!(400));
    }

    #[tokio::test]
    async fn lookup_failure_yields_500_without_leaking_the_path() {
        let server = server(failing_state("/secret/location/geoipCountries.mmdb"));

        let response = server
            .get(ENDPOINT)
            .json(&json!({"ipAddress": "8.8.8.8", "allowedCountries": ["United States"]}))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = response.text();
        assert!(text.contains("\"httpStatusCode\":500"));
        assert!(text.contains("unexpected error"));
        assert!(!text.contains("secret"));
        assert!(!text.contains("mmdb"));
    }

    #[tokio::test]
    async fn repeated_identical_requests_are_idempotent() {
        let server = server(test_state("United States"));
        let request = json!({"ipAddress": "8.8.8.8", "allowedCountries": ["United States"]});

        let first = server.get(ENDPOINT).json(&request).await;
        let second = server.get(ENDPOINT).json(&request).await;

        assert_eq!(first.status_code(), second.status_code());
        assert_eq!(first.json::<Value>(), second.json::<Value>());
    }

    #[tokio::test]
    async fn unlocated_address_is_denied() {
        // A successful lookup that finds no country yields an empty name,
        // which never matches a named allow-list entry.
        let server = server(test_state(""));

        let response = server
            .get(ENDPOINT)
            .json(&json!({"ipAddress": "10.0.0.1", "allowedCountries": ["Germany"]}))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["allowed"], json!(false));
    }

    #[tokio::test]
    async fn liveness_probe_is_always_ok() {
        let server = server(test_state("United States"));

        let response = server.get("/health/live").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], json!("ok"));
    }

    #[tokio::test]
    async fn readiness_follows_database_presence() {
        // test_state points at a nonexistent database path.
        let server = server(test_state("United States"));
        let response = server.get("/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        // With a present file the probe reports ready.
        let db = tempfile::NamedTempFile::new().unwrap();
        let state =
            AppState::with_resolver(Arc::new(StaticResolver::new("Germany")), db.path());
        let server = self::server(state);
        let response = server.get("/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}
