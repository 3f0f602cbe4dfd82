//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info};

/// Namespace prefix for redirect mappings.
const KEY_PREFIX: &str = "code:";

fn cache_key(code: &str) -> String {
    format!("{KEY_PREFIX}{code}")
}

/// Redis cache for fast redirect lookups.
///
/// Holds a `ConnectionManager`, which multiplexes one reconnecting
/// connection across clones. All operations are fail-open: errors are logged
/// and reported as misses so a Redis outage degrades to database lookups
/// instead of failing redirects.
pub struct RedisCache {
    manager: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError(format!("Failed to connect to Redis: {}", e)))?;

        manager
            .clone()
            .ping::<()>()
            .await
            .map_err(|e| CacheError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            manager,
            default_ttl: default_ttl_seconds,
        })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_destination(&self, code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager.clone();

        match conn.get::<_, Option<String>>(cache_key(code)).await {
            Ok(hit @ Some(_)) => {
                debug!("Cache hit for {}", code);
                Ok(hit)
            }
            Ok(None) => Ok(None),
            Err(e) => {
                error!("Redis GET failed for {}: {}", code, e);
                Ok(None)
            }
        }
    }

    async fn set_destination(&self, code: &str, destination_url: &str) -> CacheResult<()> {
        let mut conn = self.manager.clone();

        if let Err(e) = conn
            .set_ex::<_, _, ()>(cache_key(code), destination_url, self.default_ttl)
            .await
        {
            error!("Redis SET failed for {}: {}", code, e);
        }

        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        let mut conn = self.manager.clone();

        if let Err(e) = conn.del::<_, ()>(cache_key(code)).await {
            error!("Redis DEL failed for {}: {}", code, e);
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.manager.clone().ping::<()>().await.is_ok()
    }
}
