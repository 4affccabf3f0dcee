//! Mirrors issued token pairs into the session store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use foodapi_core::error::{AppError, ErrorKind};
use foodapi_core::result::AppResult;
use foodapi_core::traits::{Clock, SessionStore};

use crate::jwt::{AccessDetails, TokenDetails};

/// Session records for issued tokens.
///
/// Each token pair is two independent records, `token_id -> user_id` and
/// `refresh_id -> user_id`, each expiring when its token does.
#[derive(Debug, Clone)]
pub struct TokenSessions {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl TokenSessions {
    /// Creates a new wrapper over `store`.
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Writes both records of a freshly minted pair, access first.
    ///
    /// Not transactional: if the refresh write fails the access record stays
    /// behind until its TTL runs out.
    pub async fn persist(&self, details: &TokenDetails) -> AppResult<()> {
        let access_ttl = self.ttl_until(details.access_expires_at)?;
        self.store
            .put(&details.token_id, &details.user_id, access_ttl)
            .await?;

        let refresh_ttl = self.ttl_until(details.refresh_expires_at)?;
        self.store
            .put(&details.refresh_id, &details.user_id, refresh_ttl)
            .await?;

        debug!(
            user_id = %details.user_id,
            token_id = %details.token_id,
            access_ttl_secs = access_ttl.as_secs(),
            refresh_ttl_secs = refresh_ttl.as_secs(),
            "Persisted session pair"
        );
        Ok(())
    }

    /// Consumes a refresh record. Exactly one caller wins for a given key;
    /// every other outcome is `Unauthorized`.
    pub async fn revoke_refresh(&self, refresh_id: &str) -> AppResult<()> {
        match self.store.delete(refresh_id).await {
            Ok(1) => Ok(()),
            Ok(_) => Err(AppError::unauthorized("unauthorized")),
            Err(e) => {
                warn!(error = %e, "Refresh record delete failed");
                Err(e.into_kind(ErrorKind::Unauthorized))
            }
        }
    }

    /// Removes both records of the pair behind an access token.
    pub async fn revoke_pair(&self, access: &AccessDetails) -> AppResult<()> {
        self.store
            .delete_pair(&access.token_id, &access.refresh_id())
            .await
            .map_err(|e| e.into_kind(ErrorKind::Unauthorized))
    }

    /// Returns the owner of a live access record, or `None` if it is gone.
    pub async fn owner(&self, token_id: &str) -> AppResult<Option<String>> {
        match self.store.get(token_id).await {
            Ok(user_id) => Ok(Some(user_id)),
            Err(e) if e.is(ErrorKind::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Remaining lifetime of a token, measured from now.
    ///
    /// An expiry at or before now is a clock or logic error; no record may be
    /// written for it.
    pub fn ttl_until(&self, expires_at: DateTime<Utc>) -> AppResult<Duration> {
        let remaining = expires_at - self.clock.now();
        match remaining.to_std() {
            Ok(ttl) if !ttl.is_zero() => Ok(ttl),
            _ => Err(AppError::invalid_ttl(format!(
                "Token already expired at {expires_at}"
            ))),
        }
    }
}
