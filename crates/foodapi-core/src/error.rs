//! Unified application error types for the Food API.
//!
//! Every layer maps its failures into [`AppError`] so they propagate
//! through the `?` operator. The [`ErrorKind`] names which member of the
//! session-subsystem taxonomy a failure belongs to; the HTTP boundary maps
//! kinds to status codes.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    // ── Token codec ─────────────────────────────────────────
    /// Signing a token failed (e.g. missing secret).
    Signing,
    /// The token signature or algorithm did not verify.
    InvalidToken,
    /// The token's `exp` claim has lapsed.
    ExpiredToken,
    /// The token could not be parsed at all.
    MalformedToken,
    /// A verified token lacks a required claim, or the claim has the wrong type.
    ClaimsMissing,

    // ── Session store ───────────────────────────────────────
    /// The key-value service could not be reached or timed out.
    StoreUnavailable,
    /// A record TTL was zero or negative.
    InvalidTtl,
    /// The requested record does not exist (or has expired).
    NotFound,
    /// One or both halves of a session pair were already gone.
    SessionNotFound,

    // ── Session manager ─────────────────────────────────────
    /// Minting a token pair failed.
    TokenCreation,
    /// Persisting a token pair to the session store failed.
    SessionPersist,
    /// A refresh token failed verification.
    RefreshInvalid,
    /// The caller has no valid session.
    Unauthorized,

    // ── Auth gate ───────────────────────────────────────────
    /// The `Authorization` header is not of the form `Bearer <token>`.
    MalformedAuthHeader,

    // ── Ambient ─────────────────────────────────────────────
    /// Input validation failed.
    Validation,
    /// The request conflicts with stored state (e.g. credentials do not match).
    Conflict,
    /// The caller is authenticated but the operation was refused.
    Forbidden,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Signing => "SIGNING",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::MalformedToken => "MALFORMED_TOKEN",
            Self::ClaimsMissing => "CLAIMS_MISSING",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::InvalidTtl => "INVALID_TTL",
            Self::NotFound => "NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::TokenCreation => "TOKEN_CREATION",
            Self::SessionPersist => "SESSION_PERSIST",
            Self::RefreshInvalid => "REFRESH_INVALID",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MalformedAuthHeader => "MALFORMED_AUTH_HEADER",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Forbidden => "FORBIDDEN",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
        };
        f.write_str(name)
    }
}

/// The unified application error used throughout the Food API.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Re-categorize this error, keeping its message and cause.
    ///
    /// Used by the session manager to map a lower-layer failure onto its
    /// own taxonomy member.
    pub fn into_kind(self, kind: ErrorKind) -> Self {
        Self { kind, ..self }
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Create a signing error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Signing, message)
    }

    /// Create an invalid-token error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    /// Create an expired-token error.
    pub fn expired_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExpiredToken, message)
    }

    /// Create a malformed-token error.
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedToken, message)
    }

    /// Create a claims-missing error.
    pub fn claims_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClaimsMissing, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create an invalid-TTL error.
    pub fn invalid_ttl(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTtl, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a session-not-found error.
    pub fn session_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionNotFound, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a malformed-auth-header error.
    pub fn malformed_auth_header(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedAuthHeader, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::expired_token("Token has expired");
        assert_eq!(err.to_string(), "EXPIRED_TOKEN: Token has expired");
    }

    #[test]
    fn test_into_kind_keeps_message() {
        let err = AppError::store_unavailable("connection refused").into_kind(ErrorKind::SessionPersist);
        assert!(err.is(ErrorKind::SessionPersist));
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("boom");
        let err = AppError::with_source(ErrorKind::Internal, "wrapped", io);
        assert!(err.source.is_some());
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.kind, ErrorKind::Internal);
    }
}
