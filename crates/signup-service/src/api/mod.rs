//! HTTP API for account sign-up.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{cors_layer, logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use crate::registration::RegistrationService;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Largest accepted sign-up body. The storefront caps profile pictures at
/// 5 MiB, which grows to about 6.7 MiB once base64 encoded.
pub const MAX_SIGNUP_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration pipeline
    pub service: Arc<RegistrationService>,
}

impl AppState {
    pub fn new(service: RegistrationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Create the API router with default rate limiting.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::new(60))
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route(
            "/api/signup",
            post(handlers::signup).layer(DefaultBodyLimit::max(MAX_SIGNUP_BODY_BYTES)),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ))
        // Health check (no rate limiting)
        .route("/health", get(handlers::health))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
