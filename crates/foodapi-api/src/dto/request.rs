//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
///
/// Mirrors the login response, so a client can post back what it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Previous access token; ignored.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token to rotate.
    pub refresh_token: String,
    /// User ID; replaced by the token's subject.
    #[serde(default)]
    pub id: Option<String>,
    /// Given names, echoed back.
    #[serde(default)]
    pub names: Option<String>,
    /// Family names, echoed back.
    #[serde(default)]
    pub last_names: Option<String>,
}
