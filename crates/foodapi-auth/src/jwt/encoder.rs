//! JWT token creation with separate access and refresh secrets.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use foodapi_core::config::AuthConfig;
use foodapi_core::error::{AppError, ErrorKind};
use foodapi_core::result::AppResult;
use foodapi_core::traits::Clock;

use super::claims::{AccessClaims, RefreshClaims, TokenDetails, refresh_id_for};

/// Creates signed HS256 access and refresh token pairs.
#[derive(Clone)]
pub struct JwtEncoder {
    /// Access token signing key; `None` when the secret is unset.
    access_key: Option<EncodingKey>,
    /// Refresh token signing key; `None` when the secret is unset.
    refresh_key: Option<EncodingKey>,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
    /// Source of "now" for `exp`.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails with `Configuration` when a token lifetime is zero or too
    /// large to represent.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let access_ttl = lifetime(
            config.access_ttl_minutes,
            Duration::try_minutes,
            "access_ttl_minutes",
        )?;
        let refresh_ttl = lifetime(
            config.refresh_ttl_hours,
            Duration::try_hours,
            "refresh_ttl_hours",
        )?;

        Ok(Self {
            access_key: signing_key(&config.access_secret),
            refresh_key: signing_key(&config.refresh_secret),
            access_ttl,
            refresh_ttl,
            clock,
        })
    }

    /// Mints a fresh access + refresh token pair for `user_id`.
    ///
    /// The access token ID is a new random UUID; the refresh ID is derived
    /// from it, so the two halves can always be located together.
    pub fn create_token_pair(&self, user_id: &str) -> AppResult<TokenDetails> {
        let now = self.clock.now();
        let access_expires_at = whole_seconds(expiry(now, self.access_ttl)?);
        let refresh_expires_at = whole_seconds(expiry(now, self.refresh_ttl)?);

        let token_id = Uuid::new_v4().to_string();
        let refresh_id = refresh_id_for(&token_id, user_id);

        let access_claims = AccessClaims {
            authorized: true,
            access_uuid: token_id.clone(),
            user_id: user_id.to_string(),
            exp: access_expires_at.timestamp(),
        };
        let refresh_claims = RefreshClaims {
            refresh_uuid: refresh_id.clone(),
            user_id: user_id.to_string(),
            exp: refresh_expires_at.timestamp(),
        };

        let access_token = sign(&access_claims, self.access_key.as_ref(), "access")?;
        let refresh_token = sign(&refresh_claims, self.refresh_key.as_ref(), "refresh")?;

        Ok(TokenDetails {
            access_token,
            refresh_token,
            token_id,
            refresh_id,
            user_id: user_id.to_string(),
            access_expires_at,
            refresh_expires_at,
        })
    }
}

fn lifetime(
    value: u64,
    to_duration: fn(i64) -> Option<Duration>,
    field: &str,
) -> AppResult<Duration> {
    i64::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .and_then(to_duration)
        .ok_or_else(|| AppError::configuration(format!("auth.{field} out of range: {value}")))
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> AppResult<DateTime<Utc>> {
    now.checked_add_signed(ttl)
        .ok_or_else(|| AppError::signing("Token expiry is out of range"))
}

fn signing_key(secret: &str) -> Option<EncodingKey> {
    (!secret.is_empty()).then(|| EncodingKey::from_secret(secret.as_bytes()))
}

fn sign<T: Serialize>(claims: &T, key: Option<&EncodingKey>, kind: &str) -> AppResult<String> {
    let key = key.ok_or_else(|| AppError::signing(format!("No {kind} token secret configured")))?;
    encode(&Header::new(Algorithm::HS256), claims, key).map_err(|e| {
        AppError::with_source(
            ErrorKind::Signing,
            format!("Failed to sign {kind} token: {e}"),
            e,
        )
    })
}

/// Drops sub-second precision so stored expiry matches the signed `exp`.
fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}
