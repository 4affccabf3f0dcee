//! # foodapi-api
//!
//! HTTP API layer for the Food API built on Axum.
//!
//! Provides the login, logout, and refresh endpoints, the protected v1
//! routes, health reporting, middleware (request logging, CORS, timeouts),
//! extractors, DTOs, and the `{status, message}` error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
