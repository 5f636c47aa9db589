//! Uniform error responses for the verification endpoint.
//!
//! Every failure is classified exactly once at the point of detection and
//! turned into an [`ErrorResponse`]. The underlying cause is logged here at
//! call time and never returned to the caller; the wire body only ever
//! carries one of the fixed message templates.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Fixed public message for 400 responses.
const MSG_BAD_REQUEST: &str =
    "Failed to parse request. Please ensure request JSON is valid and try your request again.";

/// Fixed public message for 500 responses.
const MSG_INTERNAL_ERROR: &str =
    "An unexpected error occurred. Please wait some time and try your request again.";

/// Fixed public message for 501 responses.
const MSG_NOT_IMPLEMENTED: &str =
    "That request type is not available for this endpoint. Please select an available request type and try again.";

/// Wire shape for error responses.
///
/// # Example
///
/// ```json
/// {"httpStatusCode":400,"errorMessage":"Failed to parse request. ..."}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Numeric status code, repeated in the body.
    pub http_status_code: u16,

    /// Fixed, non-leaking message template for the status.
    pub error_message: String,
}

impl ErrorResponse {
    /// Build a response for an arbitrary status code.
    ///
    /// Statuses outside the service's taxonomy map to an empty message
    /// rather than failing closed; the caller still gets a well-formed body.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            http_status_code: status.as_u16(),
            error_message: message_for(status).to_string(),
        }
    }

    /// 400 for caller-supplied input that failed to parse or validate.
    ///
    /// Logs the cause; the caller can fix the request, so only the generic
    /// template goes over the wire.
    pub fn bad_request(cause: impl std::fmt::Display) -> Self {
        tracing::warn!(cause = %cause, "failed to parse inbound request");
        Self::from_status(StatusCode::BAD_REQUEST)
    }

    /// 500 for environment, data, or serialization failures.
    ///
    /// The cause (which may name file paths) goes only to the log.
    pub fn internal_error(cause: impl std::fmt::Display) -> Self {
        tracing::error!(cause = %cause, "unexpected error while handling request");
        Self::from_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// 501 for a request method the endpoint has no way to process.
    pub fn not_implemented(method: &Method, path: &str) -> Self {
        tracing::warn!(
            method = %method,
            path = %path,
            "endpoint has no way to process this request type"
        );
        Self::from_status(StatusCode::NOT_IMPLEMENTED)
    }
}

/// Fixed public message template for a status code.
fn message_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => MSG_BAD_REQUEST,
        StatusCode::INTERNAL_SERVER_ERROR => MSG_INTERNAL_ERROR,
        StatusCode::NOT_IMPLEMENTED => MSG_NOT_IMPLEMENTED,
        _ => "",
    }
}

/// Implement IntoResponse for axum to return ErrorResponse as HTTP responses.
///
/// The status line is fixed before the body is written.
impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_uses_the_parse_template() {
        let response = ErrorResponse::bad_request("expected value at line 1");
        assert_eq!(response.http_status_code, 400);
        assert!(response.error_message.contains("ensure request JSON is valid"));
    }

    #[test]
    fn internal_error_uses_the_generic_template() {
        let response = ErrorResponse::internal_error("open /data/geoipCountries.mmdb failed");
        assert_eq!(response.http_status_code, 500);
        assert!(response.error_message.contains("unexpected error"));
        // The cause never leaks into the body.
        assert!(!response.error_message.contains("geoipCountries"));
    }

    #[test]
    fn not_implemented_uses_the_method_template() {
        let response =
            ErrorResponse::not_implemented(&Method::POST, "/verifyIPAddressInCountries");
        assert_eq!(response.http_status_code, 501);
        assert!(response.error_message.contains("request type"));
        assert!(!response.error_message.contains("POST"));
    }

    #[test]
    fn unclassified_status_degrades_to_an_empty_message() {
        let response = ErrorResponse::from_status(StatusCode::IM_A_TEAPOT);
        assert_eq!(response.http_status_code, 418);
        assert_eq!(response.error_message, "");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let response = ErrorResponse::from_status(StatusCode::BAD_REQUEST);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"httpStatusCode\":400"));
        assert!(json.contains("\"errorMessage\":\"Failed to parse request."));
    }

    #[test]
    fn into_response_sets_the_status_line() {
        let response = ErrorResponse::from_status(StatusCode::NOT_IMPLEMENTED).into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
