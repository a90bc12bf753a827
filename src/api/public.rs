//! Public API types

use std::error::Error as StdError;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::{Method, StatusCode};
use thiserror::Error;

use crate::api::routes::proxy::public::ErrorEnvelope;

// Errors

/// Every way the relay can refuse or fail a request. Each variant
/// maps to a status code and a JSON `ErrorEnvelope`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method Not Allowed")]
    MethodNotAllowed(Method),

    #[error("Empty request body")]
    EmptyBody,

    #[error("Unreadable request body")]
    BodyRejected { status: StatusCode, message: String },

    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Missing required field: contents")]
    MissingContents,

    #[error("Network Error")]
    Network(#[source] reqwest::Error),

    #[error("AI Service Error")]
    Upstream { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::EmptyBody | Self::InvalidJson(_) | Self::MissingContents => {
                StatusCode::BAD_REQUEST
            }
            Self::Network(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BodyRejected { status, .. } | Self::Upstream { status, .. } => *status,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let error = self.to_string();
        match self {
            Self::MethodNotAllowed(method) => ErrorEnvelope::new(
                &error,
                &format!("Only POST requests are accepted, got {}", method),
            ),
            Self::EmptyBody => ErrorEnvelope::new(&error, "No data received"),
            Self::BodyRejected { message, .. } => ErrorEnvelope::new(&error, message),
            Self::InvalidJson(e) => ErrorEnvelope::new(&error, &e.to_string()),
            Self::MissingContents => ErrorEnvelope::new(&error, "Contents field is required"),
            Self::Network(e) => {
                let code = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else {
                    "request"
                };
                ErrorEnvelope {
                    code: Some(code.to_string()),
                    ..ErrorEnvelope::new(&error, &error_chain(e))
                }
            }
            Self::Upstream { status, message } => ErrorEnvelope {
                http_code: Some(status.as_u16()),
                ..ErrorEnvelope::new(&error, message)
            },
        }
    }
}

// reqwest hides the interesting part (DNS, refused, timed out) in
// the source chain
fn error_chain(err: &dyn StdError) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = self.envelope();

        // Always log the error
        if status.is_server_error() {
            tracing::error!("{}: {}", envelope.error, envelope.details);
        } else {
            tracing::warn!("{}: {}", envelope.error, envelope.details);
        }

        (status, Json(envelope)).into_response()
    }
}

// Re-export public types from each route

pub mod proxy {
    pub use crate::api::routes::proxy::public::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MethodNotAllowed(Method::GET).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ApiError::EmptyBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingContents.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Upstream {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: String::from("quota"),
            }
            .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_body_rejected_keeps_status() {
        let err = ApiError::BodyRejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: String::from("length limit exceeded"),
        };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let envelope = err.envelope();
        assert_eq!(envelope.error, "Unreadable request body");
        assert_eq!(envelope.details, "length limit exceeded");
    }

    #[test]
    fn test_invalid_json_envelope_has_parser_details() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let envelope = ApiError::InvalidJson(parse_err).envelope();
        assert_eq!(envelope.error, "Invalid JSON");
        assert!(envelope.details.contains("line 1"));
        assert_eq!(envelope.http_code, None);
    }

    #[test]
    fn test_upstream_envelope_carries_http_code() {
        let envelope = ApiError::Upstream {
            status: StatusCode::FORBIDDEN,
            message: String::from("API key not valid"),
        }
        .envelope();
        assert_eq!(envelope.error, "AI Service Error");
        assert_eq!(envelope.details, "API key not valid");
        assert_eq!(envelope.http_code, Some(403));
    }

    #[test]
    fn test_envelope_omits_empty_optional_fields() {
        let value = serde_json::to_value(ApiError::EmptyBody.envelope()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"error": "Empty request body", "details": "No data received"})
        );
    }
}
