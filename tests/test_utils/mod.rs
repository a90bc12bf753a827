//! Test utilities for integration tests
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body};

use relaychat::api::AppState;
use relaychat::api::app;
use relaychat::core::AppConfig;

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_API_KEY: &str = "test-api-key";
pub const UPSTREAM_PATH: &str = "/v1/models/gemini-test:generateContent";

pub fn test_config(upstream_url: &str) -> AppConfig {
    AppConfig {
        gemini_api_hostname: upstream_url.to_string(),
        gemini_api_key: String::from(TEST_API_KEY),
        gemini_model: String::from(TEST_MODEL),
        upstream_timeout: Duration::from_secs(5),
    }
}

/// Creates a test application router that relays to `upstream_url`,
/// usually a `mockito` server.
pub fn test_app(upstream_url: &str) -> Router {
    test_app_with_config(test_config(upstream_url))
}

pub fn test_app_with_config(config: AppConfig) -> Router {
    let app_state = AppState::new(config).expect("Failed to build app state");
    app(Arc::new(app_state))
}

/// Serves the app on an ephemeral local port for tests that need a
/// real HTTP client.
pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address that accepts connections but never responds.
pub async fn spawn_stalled_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// An address with nothing listening on it.
pub async fn unused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    listener.local_addr().unwrap()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
