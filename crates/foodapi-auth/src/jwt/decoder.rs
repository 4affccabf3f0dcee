//! JWT token verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;

use foodapi_core::config::AuthConfig;
use foodapi_core::error::{AppError, ErrorKind};
use foodapi_core::result::AppResult;

use super::claims::{RawAccessClaims, RawRefreshClaims, VerifiedAccess, VerifiedRefresh};

/// Verifies access and refresh tokens against their own secrets.
///
/// Only HS256 is accepted. Expiry is checked with zero leeway and `exp`
/// must be present. A lapsed `exp` is reported as expired whether or not
/// the signature is valid.
#[derive(Clone)]
pub struct JwtDecoder {
    /// Access token verification key; `None` rejects every access token.
    access_key: Option<DecodingKey>,
    /// Refresh token verification key; `None` rejects every refresh token.
    refresh_key: Option<DecodingKey>,
    /// Validation configuration.
    validation: Validation,
    /// Expiry-only check run before signature verification.
    expiry_check: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let mut expiry_check = validation.clone();
        expiry_check.insecure_disable_signature_validation();

        Self {
            access_key: verifying_key(&config.access_secret),
            refresh_key: verifying_key(&config.refresh_secret),
            validation,
            expiry_check,
        }
    }

    /// Verifies an access token and returns its typed claims.
    pub fn verify_access_token(&self, token: &str) -> AppResult<VerifiedAccess> {
        let raw: RawAccessClaims = self.decode(token, self.access_key.as_ref(), "access")?;
        VerifiedAccess::try_from(raw)
    }

    /// Verifies a refresh token and returns its typed claims.
    pub fn verify_refresh_token(&self, token: &str) -> AppResult<VerifiedRefresh> {
        let raw: RawRefreshClaims = self.decode(token, self.refresh_key.as_ref(), "refresh")?;
        VerifiedRefresh::try_from(raw)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        token: &str,
        key: Option<&DecodingKey>,
        kind: &str,
    ) -> AppResult<T> {
        let key = key.ok_or_else(|| {
            AppError::invalid_token(format!("No {kind} token secret configured"))
        })?;

        // Claims are untrusted here; only an elapsed `exp` is acted on.
        match decode::<serde_json::Value>(token, key, &self.expiry_check) {
            Err(e) if matches!(e.kind(), JwtErrorKind::ExpiredSignature) => {
                return Err(map_jwt_error(e));
            }
            _ => {}
        }

        decode::<T>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }
}

fn verifying_key(secret: &str) -> Option<DecodingKey> {
    (!secret.is_empty()).then(|| DecodingKey::from_secret(secret.as_bytes()))
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AppError {
    let (kind, message) = match e.kind() {
        JwtErrorKind::ExpiredSignature => (ErrorKind::ExpiredToken, "Token has expired"),
        JwtErrorKind::InvalidSignature => (ErrorKind::InvalidToken, "Invalid token signature"),
        JwtErrorKind::InvalidAlgorithm => (ErrorKind::InvalidToken, "Unexpected signing method"),
        JwtErrorKind::ImmatureSignature => (ErrorKind::InvalidToken, "Token is not yet valid"),
        JwtErrorKind::MissingRequiredClaim(_) => {
            (ErrorKind::ClaimsMissing, "Token is missing a required claim")
        }
        JwtErrorKind::InvalidToken
        | JwtErrorKind::Base64(_)
        | JwtErrorKind::Json(_)
        | JwtErrorKind::Utf8(_) => (ErrorKind::MalformedToken, "Malformed token"),
        _ => (ErrorKind::InvalidToken, "Token validation failed"),
    };
    AppError::with_source(kind, format!("{message}: {e}"), e)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use foodapi_core::traits::{Clock, ManualClock};

    use super::*;
    use crate::jwt::JwtEncoder;

    fn config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            ..AuthConfig::default()
        }
    }

    fn encoder() -> JwtEncoder {
        JwtEncoder::new(&config(), Arc::new(ManualClock::starting_now())).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let pair = encoder().create_token_pair("user-42").unwrap();
        let decoder = JwtDecoder::new(&config());

        let access = decoder.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(access.user_id, "user-42");
        assert_eq!(access.token_id, pair.token_id);
        assert_eq!(access.expires_at, pair.access_expires_at);

        let refresh = decoder.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.user_id, "user-42");
        assert_eq!(refresh.refresh_id, format!("{}++user-42", access.token_id));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let clock = Arc::new(ManualClock::starting_now());
        clock.advance(-Duration::hours(1));
        let pair = JwtEncoder::new(&config(), clock.clone())
            .unwrap()
            .create_token_pair("user-42")
            .unwrap();
        assert!(pair.access_expires_at < chrono::Utc::now());

        let err = JwtDecoder::new(&config())
            .verify_access_token(&pair.access_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpiredToken);
    }

    #[test]
    fn test_expired_token_with_foreign_signature_is_expired() {
        let exp = (chrono::Utc::now() - Duration::hours(1)).timestamp();
        let claims = serde_json::json!({
            "authorized": true,
            "access_uuid": "t-1",
            "user_id": "user-42",
            "exp": exp,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"wrong-secret"),
        )
        .unwrap();

        let err = JwtDecoder::new(&config())
            .verify_access_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpiredToken);
    }

    #[test]
    fn test_live_token_with_foreign_signature_is_invalid() {
        let exp = (chrono::Utc::now() + Duration::minutes(5)).timestamp();
        let claims = serde_json::json!({ "refresh_uuid": "t-1++user-42", "user_id": "user-42", "exp": exp });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"wrong-secret"),
        )
        .unwrap();

        let err = JwtDecoder::new(&config())
            .verify_refresh_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = JwtDecoder::new(&config())
            .verify_access_token("not-a-token")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedToken);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let pair = encoder().create_token_pair("user-42").unwrap();
        let other = AuthConfig {
            access_secret: "someone-else".to_string(),
            ..config()
        };
        let err = JwtDecoder::new(&other)
            .verify_access_token(&pair.access_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_refresh_token_does_not_verify_as_access() {
        let pair = encoder().create_token_pair("user-42").unwrap();
        let err = JwtDecoder::new(&config())
            .verify_access_token(&pair.refresh_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_substituted_algorithm_is_rejected() {
        let pair = encoder().create_token_pair("user-42").unwrap();
        let mut segments = pair.access_token.splitn(3, '.');
        let _header = segments.next().unwrap();
        let claims = segments.next().unwrap();
        let signature = segments.next().unwrap();

        let forged_header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS512","typ":"JWT"}"#);
        let forged = format!("{forged_header}.{claims}.{signature}");

        let err = JwtDecoder::new(&config())
            .verify_access_token(&forged)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_token_signed_with_other_hmac_variant_is_rejected() {
        let exp = (chrono::Utc::now() + Duration::minutes(5)).timestamp();
        let claims = serde_json::json!({
            "authorized": true,
            "access_uuid": "t-1",
            "user_id": "user-42",
            "exp": exp,
        });
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"access-secret"),
        )
        .unwrap();

        let err = JwtDecoder::new(&config())
            .verify_access_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_missing_identifier_claim_is_claims_missing() {
        let exp = (chrono::Utc::now() + Duration::minutes(5)).timestamp();
        let claims = serde_json::json!({ "authorized": true, "user_id": "user-42", "exp": exp });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"access-secret"),
        )
        .unwrap();

        let err = JwtDecoder::new(&config())
            .verify_access_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ClaimsMissing);
    }

    #[test]
    fn test_missing_exp_is_claims_missing() {
        let claims = serde_json::json!({ "access_uuid": "t-1", "user_id": "user-42" });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"access-secret"),
        )
        .unwrap();

        let err = JwtDecoder::new(&config())
            .verify_access_token(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ClaimsMissing);
    }

    #[test]
    fn test_empty_secret_rejects_everything() {
        let pair = encoder().create_token_pair("user-42").unwrap();
        let unset = AuthConfig {
            access_secret: String::new(),
            ..config()
        };
        let err = JwtDecoder::new(&unset)
            .verify_access_token(&pair.access_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_manual_clock_drives_exp() {
        let clock = Arc::new(ManualClock::starting_now());
        let start = clock.now();
        let pair = JwtEncoder::new(&config(), clock)
            .unwrap()
            .create_token_pair("user-42")
            .unwrap();
        let access = JwtDecoder::new(&config())
            .verify_access_token(&pair.access_token)
            .unwrap();
        assert_eq!(access.expires_at - start, Duration::seconds(900));
    }
}
