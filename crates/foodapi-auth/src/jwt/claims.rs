//! Claims carried by access and refresh tokens, and the typed views the
//! rest of the crate works with after verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use foodapi_core::error::AppError;
use foodapi_core::result::AppResult;

/// Joins an access token ID and a user ID into the paired refresh ID.
pub const REFRESH_ID_SEPARATOR: &str = "++";

/// Derives the refresh ID paired with an access token ID.
pub fn refresh_id_for(token_id: &str, user_id: &str) -> String {
    format!("{token_id}{REFRESH_ID_SEPARATOR}{user_id}")
}

/// Claims signed into an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Always `true` for issued access tokens.
    pub authorized: bool,
    /// Access token ID (UUID v4).
    pub access_uuid: String,
    /// Subject user ID.
    pub user_id: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Claims signed into a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    /// Refresh ID, `<access_uuid>++<user_id>`.
    pub refresh_uuid: String,
    /// Subject user ID.
    pub user_id: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Access claims as they arrive off the wire. Fields stay untyped until
/// [`VerifiedAccess::try_from`] checks them.
#[derive(Debug, Deserialize)]
pub(crate) struct RawAccessClaims {
    access_uuid: Option<Value>,
    user_id: Option<Value>,
    exp: Option<Value>,
}

/// Refresh claims as they arrive off the wire.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRefreshClaims {
    refresh_uuid: Option<Value>,
    user_id: Option<Value>,
    exp: Option<Value>,
}

/// A verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccess {
    /// Access token ID.
    pub token_id: String,
    /// Subject user ID.
    pub user_id: String,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
}

/// A verified refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRefresh {
    /// Refresh ID.
    pub refresh_id: String,
    /// Subject user ID.
    pub user_id: String,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<RawAccessClaims> for VerifiedAccess {
    type Error = AppError;

    fn try_from(raw: RawAccessClaims) -> AppResult<Self> {
        Ok(Self {
            token_id: string_claim(raw.access_uuid, "access_uuid")?,
            user_id: string_claim(raw.user_id, "user_id")?,
            expires_at: exp_claim(raw.exp)?,
        })
    }
}

impl TryFrom<RawRefreshClaims> for VerifiedRefresh {
    type Error = AppError;

    fn try_from(raw: RawRefreshClaims) -> AppResult<Self> {
        Ok(Self {
            refresh_id: string_claim(raw.refresh_uuid, "refresh_uuid")?,
            user_id: string_claim(raw.user_id, "user_id")?,
            expires_at: exp_claim(raw.exp)?,
        })
    }
}

fn string_claim(value: Option<Value>, name: &str) -> AppResult<String> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(AppError::claims_missing(format!(
            "Claim '{name}' is not a string"
        ))),
        None => Err(AppError::claims_missing(format!("Claim '{name}' is missing"))),
    }
}

fn exp_claim(value: Option<Value>) -> AppResult<DateTime<Utc>> {
    value
        .as_ref()
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| AppError::claims_missing("Claim 'exp' is missing or not a timestamp"))
}

/// Everything minted for one login: both signed tokens plus the identifiers
/// and expiry instants needed to mirror them in the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDetails {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
    /// Access token ID; session store key for the access half.
    pub token_id: String,
    /// Refresh ID; session store key for the refresh half.
    pub refresh_id: String,
    /// Subject user ID.
    pub user_id: String,
    /// Access token expiry, whole seconds as signed into `exp`.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiry, whole seconds as signed into `exp`.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Request-scoped projection of a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDetails {
    /// Access token ID.
    pub token_id: String,
    /// Subject user ID.
    pub user_id: String,
}

impl AccessDetails {
    /// The refresh ID paired with this access token.
    pub fn refresh_id(&self) -> String {
        refresh_id_for(&self.token_id, &self.user_id)
    }
}

impl From<VerifiedAccess> for AccessDetails {
    fn from(verified: VerifiedAccess) -> Self {
        Self {
            token_id: verified.token_id,
            user_id: verified.user_id,
        }
    }
}
