//! Bearer-token check in front of protected routes.

use std::sync::Arc;

use tracing::debug;

use foodapi_core::error::AppError;
use foodapi_core::result::AppResult;

use crate::jwt::{AccessDetails, JwtDecoder};

/// Authorization scheme accepted by [`AuthGate`].
const BEARER: &str = "Bearer";

/// Verifies the `Authorization` header of an inbound request.
///
/// Stateless: only the token signature and expiry are checked, the session
/// store is not consulted.
#[derive(Debug, Clone)]
pub struct AuthGate {
    decoder: Arc<JwtDecoder>,
}

impl AuthGate {
    /// Creates a gate that verifies with `decoder`.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Authenticates a request from its raw `Authorization` header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> AppResult<AccessDetails> {
        let token = bearer_token(authorization)?;
        let verified = self.decoder.verify_access_token(token).inspect_err(|e| {
            debug!(error = %e, "Rejected bearer token");
        })?;
        Ok(verified.into())
    }
}

/// Extracts the token from a `Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> AppResult<&str> {
    let value = authorization
        .ok_or_else(|| AppError::malformed_auth_header("Missing Authorization header"))?;

    match value.split_once(' ') {
        Some((BEARER, token)) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(AppError::malformed_auth_header(
            "Authorization header must be 'Bearer <token>'",
        )),
    }
}
