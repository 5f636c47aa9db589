//! Shared infrastructure for the geofence HTTP service.
//!
//! This crate provides the HTTP glue around `geofence-lib`:
//!
//! - [`AppState`]: the resolver and database path shared by all handlers
//! - [`ErrorResponse`]: the single translation point from failure
//!   classification to wire response and log entry
//! - [`VerificationRequest`]: endpoint request type
//! - [`health`]: liveness/readiness probe handlers
//! - [`logging`]: structured JSON logging setup
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`middleware`]: request correlation and HTTP metrics
//!
//! Handlers stay thin: they parse, call `geofence-lib`, and format the
//! response; everything cross-cutting lives here.
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides canned resolvers so handler tests
//! never need a real MaxMind database file. Enable the `test-utils` feature
//! to access it from dependent crates.

#![deny(warnings)]

mod error;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod request;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::ErrorResponse;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_verification, record_verification_failed,
    MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, track_requests, RequestId};
pub use request::VerificationRequest;
pub use state::{AppState, AppStateError};
