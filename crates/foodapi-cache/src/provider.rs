//! Session backend that dispatches to the configured store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use foodapi_core::config::SessionStoreConfig;
use foodapi_core::error::AppError;
use foodapi_core::result::AppResult;
use foodapi_core::traits::SessionStore;

/// Session backend that wraps the configured session store.
///
/// The store is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct SessionBackend {
    /// The inner session store.
    inner: Arc<dyn SessionStore>,
}

impl SessionBackend {
    /// Create a new session backend from configuration.
    pub async fn new(config: &SessionStoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn SessionStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis session store");
                let client = crate::redis::RedisClient::connect(config).await?;
                Arc::new(crate::redis::RedisSessionStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory session store");
                Arc::new(crate::memory::MemorySessionStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown session store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Get a shared handle to the inner store.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl SessionStore for SessionBackend {
    async fn put(&self, key: &str, user_id: &str, ttl: Duration) -> AppResult<()> {
        self.inner.put(key, user_id, ttl).await
    }

    async fn get(&self, key: &str) -> AppResult<String> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> AppResult<u64> {
        self.inner.delete(key).await
    }

    async fn delete_pair(&self, access_key: &str, refresh_key: &str) -> AppResult<()> {
        self.inner.delete_pair(access_key, refresh_key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
