//! `AuthUser` extractor: verifies the bearer token before a protected
//! handler runs.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use foodapi_auth::AccessDetails;
use foodapi_core::error::ErrorKind;

use crate::error::ApiError;
use crate::state::AppState;

/// The verified caller of a protected route.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessDetails);

impl std::ops::Deref for AuthUser {
    type Target = AccessDetails;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        // Every gate failure is a 401 on protected routes.
        let access = state
            .session_manager
            .gate()
            .authenticate(header)
            .map_err(|e| e.into_kind(ErrorKind::Unauthorized))?;

        Ok(AuthUser(access))
    }
}
