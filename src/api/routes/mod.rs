//! API routes module

pub mod proxy;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    // Same origin relay for the chat client
    Router::new().nest("/proxy", proxy::router())
}
