//! Session store trait for the fast key-value backend.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppError;
use crate::result::AppResult;

/// A TTL-bounded mapping from token identifiers to user identifiers.
///
/// Every operation is a round trip to an external service. Implementations
/// must surface the backend's failures as [`ErrorKind::StoreUnavailable`]
/// instead of swallowing them, and `delete` must report the number of
/// records it removed atomically: two concurrent deletes of the same key
/// must not both observe `1`.
///
/// [`ErrorKind::StoreUnavailable`]: crate::error::ErrorKind::StoreUnavailable
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Store `key -> user_id`, expiring after `ttl`.
    ///
    /// A zero TTL is rejected with `InvalidTtl`.
    async fn put(&self, key: &str, user_id: &str, ttl: Duration) -> AppResult<()>;

    /// Fetch the user bound to `key`. Fails with `NotFound` when the key is
    /// absent or expired.
    async fn get(&self, key: &str) -> AppResult<String>;

    /// Delete `key`, returning how many records were removed (0 or 1).
    ///
    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<u64>;

    /// Delete both halves of a session.
    ///
    /// Both deletes are always attempted. The call succeeds only if each of
    /// them removed exactly one record; otherwise it fails with
    /// `SessionNotFound`.
    async fn delete_pair(&self, access_key: &str, refresh_key: &str) -> AppResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Rejects TTLs that would create an already-expired record.
pub fn ensure_positive_ttl(ttl: Duration) -> AppResult<()> {
    if ttl.is_zero() {
        return Err(AppError::invalid_ttl("Session TTL must be greater than zero"));
    }
    Ok(())
}

/// Interprets the removed-record counts of a pair delete.
pub fn ensure_pair_removed(access_removed: u64, refresh_removed: u64) -> AppResult<()> {
    if access_removed != 1 || refresh_removed != 1 {
        return Err(AppError::session_not_found(format!(
            "Session already invalidated (access removed: {access_removed}, refresh removed: {refresh_removed})"
        )));
    }
    Ok(())
}
