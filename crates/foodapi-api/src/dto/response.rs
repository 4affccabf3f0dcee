//! Response DTOs.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use foodapi_core::types::User;

/// `{status, message}` body used for errors and plain acknowledgements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
}

impl StatusMessage {
    /// Creates a message for `status`.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Login and refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataLogin {
    /// User ID.
    pub id: String,
    /// Given names.
    pub names: String,
    /// Family names.
    pub last_names: String,
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: String,
    /// Given names.
    pub names: String,
    /// Family names.
    pub last_names: String,
    /// Email.
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            names: user.names,
            last_names: user.last_names,
            email: user.email,
        }
    }
}

/// State of the caller's own session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Access token ID.
    pub token_id: String,
    /// User ID.
    pub user_id: String,
    /// Whether the access record is still in the session store.
    pub active: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Session store state.
    pub session_store: String,
    /// User database state.
    pub database: String,
}
