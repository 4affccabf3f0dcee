//! Session lifecycle manager: login, logout, and refresh with rotation.

use std::sync::Arc;

use tracing::{info, warn};

use foodapi_core::error::{AppError, ErrorKind};
use foodapi_core::result::AppResult;
use foodapi_core::traits::UserRepository;
use foodapi_core::types::User;

use crate::gate::AuthGate;
use crate::jwt::{AccessDetails, JwtDecoder, JwtEncoder, TokenDetails};
use crate::password::PasswordHasher;

use super::store::TokenSessions;

/// Result of a successful credential login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// The freshly issued token pair.
    pub tokens: TokenDetails,
}

/// Manages the complete session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// JWT encoder for token generation.
    encoder: Arc<JwtEncoder>,
    /// JWT decoder for refresh token validation.
    decoder: Arc<JwtDecoder>,
    /// Bearer-header check used by logout.
    gate: AuthGate,
    /// Session record persistence.
    sessions: TokenSessions,
    /// User lookups for credential login.
    users: Arc<dyn UserRepository>,
    /// Password hasher.
    password_hasher: PasswordHasher,
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        sessions: TokenSessions,
        users: Arc<dyn UserRepository>,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            gate: AuthGate::new(Arc::clone(&decoder)),
            encoder,
            decoder,
            sessions,
            users,
            password_hasher,
        }
    }

    /// The gate protected routes authenticate with.
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    /// Issues and persists a new token pair for `user_id`.
    pub async fn login(&self, user_id: &str) -> AppResult<TokenDetails> {
        let tokens = self
            .encoder
            .create_token_pair(user_id)
            .map_err(|e| e.into_kind(ErrorKind::TokenCreation))?;

        // No compensation: a failed refresh write leaves the access record
        // until it expires.
        self.sessions.persist(&tokens).await.map_err(|e| {
            warn!(user_id, token_id = %tokens.token_id, error = %e, "Failed to persist session");
            e.into_kind(ErrorKind::SessionPersist)
        })?;

        info!(user_id, token_id = %tokens.token_id, "Session issued");
        Ok(tokens)
    }

    /// Verifies email and password, then runs [`SessionManager::login`].
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::conflict("user not found"))?;

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            info!(user_id = %user.id, "Password mismatch");
            return Err(AppError::conflict("password does not match"));
        }

        let tokens = self.login(&user.id).await?;
        Ok(LoginResult { user, tokens })
    }

    /// Revokes the session behind the request's bearer token.
    pub async fn logout(&self, authorization: Option<&str>) -> AppResult<AccessDetails> {
        let access = self
            .gate
            .authenticate(authorization)
            .map_err(|e| e.into_kind(ErrorKind::Unauthorized))?;

        self.sessions.revoke_pair(&access).await.inspect_err(|e| {
            info!(user_id = %access.user_id, token_id = %access.token_id, error = %e, "Logout rejected");
        })?;

        info!(user_id = %access.user_id, token_id = %access.token_id, "Session revoked");
        Ok(access)
    }

    /// Exchanges a refresh token for a brand-new pair.
    ///
    /// The old refresh record is deleted before the new pair is issued, so a
    /// replayed or concurrently presented refresh token can win at most once.
    /// If issuance then fails the user is simply logged out.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenDetails> {
        let verified = self
            .decoder
            .verify_refresh_token(refresh_token)
            .map_err(|e| match e.kind {
                ErrorKind::ClaimsMissing => e,
                _ => e.into_kind(ErrorKind::RefreshInvalid),
            })?;

        self.sessions
            .revoke_refresh(&verified.refresh_id)
            .await
            .inspect_err(|_| {
                warn!(user_id = %verified.user_id, "Refresh token already used or revoked");
            })?;

        let tokens = self.login(&verified.user_id).await?;
        info!(user_id = %verified.user_id, token_id = %tokens.token_id, "Session rotated");
        Ok(tokens)
    }

    /// Whether the access record behind `access` is still live.
    pub async fn session_active(&self, access: &AccessDetails) -> AppResult<bool> {
        Ok(self
            .sessions
            .owner(&access.token_id)
            .await?
            .is_some_and(|owner| owner == access.user_id))
    }
}
