//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use myq_bridge_skill::Skill;

use crate::handlers::{events, health};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `POST /v1/events` - Handle one inbound event
///
/// Events run to completion; the router adds no deadline of its own.
pub fn create_router<S>(state: GatewayState<S>) -> Router
where
    S: Skill + 'static,
{
    // Extract config values before moving state
    let max_body_bytes = state.config.max_body_bytes;

    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health::health))
        .route("/v1/events", post(events::handle_event::<S>))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}
