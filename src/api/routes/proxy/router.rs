//! Router for the proxy API

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::{IntoResponse, Response},
    routing::any,
};
use http::{Method, StatusCode, header};
use serde_json::Value;

use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::gemini::generate_content;

type SharedState = Arc<AppState>;

/// Validate a client request and relay it to the LLM API. Every step
/// either moves on or returns early with an `ApiError`; a successful
/// upstream body is passed back untouched.
async fn relay(
    State(state): State<SharedState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    // Preflight gets an empty 200, the CORS headers are added by the
    // app level middleware
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed(method));
    }
    // Too large or cut off mid upload
    let body = body.map_err(|rejection| ApiError::BodyRejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    if body.is_empty() {
        return Err(ApiError::EmptyBody);
    }

    let request: Value = serde_json::from_slice(&body).map_err(ApiError::InvalidJson)?;
    let contents = match request.get("contents") {
        Some(contents) if !contents.is_null() => contents,
        _ => return Err(ApiError::MissingContents),
    };

    let AppConfig {
        gemini_api_hostname,
        gemini_api_key,
        gemini_model,
        upstream_timeout,
    } = &state.config;

    let upstream = generate_content(
        &state.http,
        contents,
        gemini_api_hostname,
        gemini_api_key,
        gemini_model,
        *upstream_timeout,
    )
    .await
    .map_err(ApiError::Network)?;

    if upstream.status.as_u16() >= 400 {
        let message = upstream
            .error_message()
            .unwrap_or_else(|| format!("Upstream returned status {}", upstream.status.as_u16()));
        return Err(ApiError::Upstream {
            status: upstream.status,
            message,
        });
    }

    tracing::debug!(
        "Relayed {} byte response with status {}",
        upstream.body.len(),
        upstream.status
    );

    Ok((
        upstream.status,
        [(header::CONTENT_TYPE, "application/json")],
        upstream.body,
    )
        .into_response())
}

/// Create the proxy router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", any(relay))
}
