//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use foodapi_core::error::{AppError, ErrorKind};

use crate::dto::response::StatusMessage;

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidToken
        | ErrorKind::ExpiredToken
        | ErrorKind::MalformedToken
        | ErrorKind::MalformedAuthHeader
        | ErrorKind::RefreshInvalid
        | ErrorKind::Unauthorized
        | ErrorKind::SessionNotFound => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation
        | ErrorKind::ClaimsMissing
        | ErrorKind::TokenCreation
        | ErrorKind::Signing
        | ErrorKind::Serialization => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::SessionPersist
        | ErrorKind::InvalidTtl
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind);
        if status.is_server_error() {
            tracing::error!(kind = %self.0.kind, error = %self.0.message, "Request failed");
        }

        (status, Json(StatusMessage::new(status, self.0.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::ExpiredToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::SessionNotFound), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::ClaimsMissing), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::SessionPersist), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::StoreUnavailable), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_response_status() {
        let response = ApiError(AppError::conflict("password does not match")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
