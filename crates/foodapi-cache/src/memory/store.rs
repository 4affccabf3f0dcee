//! In-memory session store backed by a concurrent hash map.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use foodapi_core::error::AppError;
use foodapi_core::result::AppResult;
use foodapi_core::traits::session_store::{ensure_pair_removed, ensure_positive_ttl};
use foodapi_core::traits::{Clock, SessionStore, SystemClock};

/// Minimum spacing between two sweeps of expired records, in seconds.
const SWEEP_INTERVAL_SECS: i64 = 60;

/// A stored value and the instant it stops being visible.
#[derive(Debug, Clone)]
struct Record {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// In-memory session store.
///
/// Expiry is evaluated lazily against the injected [`Clock`], so a test can
/// freeze or advance time and observe exactly when a record disappears.
/// Removal goes through the map's per-shard lock, so concurrent deletes of
/// the same key see exactly one success between them. Writes sweep out
/// expired records at most once a minute.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    records: Arc<DashMap<String, Record>>,
    clock: Arc<dyn Clock>,
    /// Unix seconds of the last sweep.
    last_sweep: Arc<AtomicI64>,
}

impl MemorySessionStore {
    /// Create a store reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store reading the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let last_sweep = Arc::new(AtomicI64::new(clock.now().timestamp()));
        Self {
            records: Arc::new(DashMap::new()),
            clock,
            last_sweep,
        }
    }

    /// Number of records that have not yet expired.
    pub fn live_len(&self) -> usize {
        let now = self.clock.now();
        self.records.iter().filter(|r| r.expires_at > now).count()
    }

    /// Drops every expired record if the last sweep is old enough. Only one
    /// concurrent caller wins the sweep.
    fn sweep_expired(&self, now: DateTime<Utc>) {
        let now_secs = now.timestamp();
        let last = self.last_sweep.load(Ordering::Acquire);
        if now_secs - last < SWEEP_INTERVAL_SECS {
            return;
        }
        if self
            .last_sweep
            .compare_exchange(last, now_secs, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let before = self.records.len();
        self.records.retain(|_, record| record.expires_at > now);
        let purged = before.saturating_sub(self.records.len());
        if purged > 0 {
            debug!(purged, "Swept expired session records");
        }
    }

    /// Removes `key` if present and live. Expired entries are purged and
    /// count as absent.
    fn take(&self, key: &str) -> u64 {
        let now = self.clock.now();
        match self.records.remove(key) {
            Some((_, record)) if record.expires_at > now => 1,
            _ => 0,
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, key: &str, user_id: &str, ttl: Duration) -> AppResult<()> {
        ensure_positive_ttl(ttl)?;

        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::invalid_ttl(format!("Session TTL out of range: {e}")))?;
        let now = self.clock.now();
        self.sweep_expired(now);

        let record = Record {
            user_id: user_id.to_string(),
            expires_at: now + ttl,
        };
        self.records.insert(key.to_string(), record);
        debug!(key, "Stored session record");
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<String> {
        let now = self.clock.now();
        match self.records.entry(key.to_string()) {
            Entry::Occupied(entry) if entry.get().expires_at > now => {
                Ok(entry.get().user_id.clone())
            }
            Entry::Occupied(entry) => {
                entry.remove();
                Err(AppError::not_found(format!("No session record for key '{key}'")))
            }
            Entry::Vacant(_) => Err(AppError::not_found(format!(
                "No session record for key '{key}'"
            ))),
        }
    }

    async fn delete(&self, key: &str) -> AppResult<u64> {
        let removed = self.take(key);
        debug!(key, removed, "Deleted session record");
        Ok(removed)
    }

    async fn delete_pair(&self, access_key: &str, refresh_key: &str) -> AppResult<()> {
        let access_removed = self.take(access_key);
        let refresh_removed = self.take(refresh_key);
        ensure_pair_removed(access_removed, refresh_removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
