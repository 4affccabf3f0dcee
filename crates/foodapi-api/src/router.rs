//! Route definitions for the Food API.
//!
//! Session endpoints live under `/api`, protected resources under
//! `/api/v1`, and the health probe at the root.

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use foodapi_core::config::ServerConfig;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new().merge(auth_routes()).merge(v1_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors::build_cors_layer(&server.cors))
                .layer(axum_middleware::from_fn(
                    middleware::logging::request_logging,
                ))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    server.request_timeout_seconds,
                ))),
        )
        .with_state(state)
}

/// Session endpoints: login, logout, refresh
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/refresh", post(handlers::auth::refresh))
}

/// Protected endpoints
fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/users/{id}", get(handlers::user::get_user))
        .route("/v1/session", get(handlers::session::session_status))
}
