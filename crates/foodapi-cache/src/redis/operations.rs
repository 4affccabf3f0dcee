//! Redis session store implementation.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::RedisResult;
use tracing::debug;

use foodapi_core::error::{AppError, ErrorKind};
use foodapi_core::result::AppResult;
use foodapi_core::traits::SessionStore;
use foodapi_core::traits::session_store::{ensure_pair_removed, ensure_positive_ttl};

use super::client::RedisClient;

/// Redis-backed session store.
///
/// Records are plain string keys written with `SET .. PX`, so Redis owns
/// expiry. `DEL` reports how many keys it removed, which is what makes
/// concurrent rotation of the same refresh token single-winner.
#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisSessionStore {
    /// Create a new Redis session store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::StoreUnavailable, format!("Redis error: {e}"), e)
    }

    /// Runs one round trip under the configured deadline.
    async fn run<T, F>(&self, command: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        let deadline = self.client.op_timeout();
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result.map_err(Self::map_err),
            Err(_) => Err(AppError::store_unavailable(format!(
                "Redis {command} timed out after {} ms",
                deadline.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, key: &str, user_id: &str, ttl: Duration) -> AppResult<()> {
        ensure_positive_ttl(ttl)?;

        let full_key = self.client.prefixed_key(key);
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let mut conn = self.client.conn_mut();

        let _: () = self
            .run("SET", async move {
                redis::cmd("SET")
                    .arg(&full_key)
                    .arg(user_id)
                    .arg("PX")
                    .arg(ttl_ms)
                    .query_async(&mut conn)
                    .await
            })
            .await?;

        debug!(key, ttl_ms, "Stored session record");
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<String> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        let value: Option<String> = self
            .run("GET", async move {
                redis::cmd("GET").arg(&full_key).query_async(&mut conn).await
            })
            .await?;

        value.ok_or_else(|| AppError::not_found(format!("No session record for key '{key}'")))
    }

    async fn delete(&self, key: &str) -> AppResult<u64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        let removed: u64 = self
            .run("DEL", async move {
                redis::cmd("DEL").arg(&full_key).query_async(&mut conn).await
            })
            .await?;

        debug!(key, removed, "Deleted session record");
        Ok(removed)
    }

    async fn delete_pair(&self, access_key: &str, refresh_key: &str) -> AppResult<()> {
        let access = self.client.prefixed_key(access_key);
        let refresh = self.client.prefixed_key(refresh_key);
        let mut conn = self.client.conn_mut();

        // MULTI/EXEC: both deletes always run, and their counts come back together.
        let (access_removed, refresh_removed): (u64, u64) = self
            .run("MULTI DEL", async move {
                redis::pipe()
                    .atomic()
                    .cmd("DEL")
                    .arg(&access)
                    .cmd("DEL")
                    .arg(&refresh)
                    .query_async(&mut conn)
                    .await
            })
            .await?;

        debug!(access_key, access_removed, refresh_removed, "Deleted session pair");
        ensure_pair_removed(access_removed, refresh_removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = self
            .run("PING", async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        Ok(pong == "PONG")
    }
}

/// These tests need a reachable Redis server. Run them with
/// `FOODAPI_TEST_REDIS_URL=redis://localhost:6379 cargo test -- --ignored`.
#[cfg(test)]
mod tests {
    use super::*;
    use foodapi_core::config::{RedisStoreConfig, SessionStoreConfig};

    async fn make_store() -> RedisSessionStore {
        let url = std::env::var("FOODAPI_TEST_REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let config = SessionStoreConfig {
            provider: "redis".to_string(),
            operation_timeout_ms: 2000,
            redis: RedisStoreConfig {
                url,
                key_prefix: "foodapi-test:".to_string(),
            },
        };
        RedisSessionStore::new(RedisClient::connect(&config).await.unwrap())
    }

    fn unique(name: &str) -> String {
        format!("{name}-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_put_get_delete() {
        let store = make_store().await;
        let key = unique("token");

        store.put(&key, "user-42", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), "user-42");

        assert_eq!(store.delete(&key).await.unwrap(), 1);
        assert_eq!(store.delete(&key).await.unwrap(), 0);
        assert_eq!(store.get(&key).await.unwrap_err().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_record_expires() {
        let store = make_store().await;
        let key = unique("short");

        store.put(&key, "user-1", Duration::from_millis(200)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.get(&key).await.unwrap_err().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_delete_pair_requires_both() {
        let store = make_store().await;
        let access = unique("access");
        let refresh = format!("{access}++user-7");

        store.put(&access, "user-7", Duration::from_secs(60)).await.unwrap();
        store.put(&refresh, "user-7", Duration::from_secs(60)).await.unwrap();
        store.delete_pair(&access, &refresh).await.unwrap();

        let err = store.delete_pair(&access, &refresh).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionNotFound);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_health_check() {
        let store = make_store().await;
        assert!(store.health_check().await.unwrap());
    }
}
