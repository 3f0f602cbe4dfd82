//! Cache service trait and error type.

use async_trait::async_trait;
use thiserror::Error;

/// Failure to establish or verify a cache connection.
///
/// Runtime operation failures never surface as errors; implementations are
/// fail-open and report them as misses instead.
#[derive(Debug, Error)]
#[error("cache connection failed: {0}")]
pub struct CacheError(pub String);

pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for code-to-destination mappings.
///
/// Strictly an accelerator for the redirect path: every operation is
/// fail-open, and a miss or error falls back to the database lookup. Links
/// are immutable apart from their click counter, so cached destinations
/// never go stale while a link exists; only deletion needs invalidation.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached destination for a code, `Ok(None)` on miss.
    async fn get_destination(&self, code: &str) -> CacheResult<Option<String>>;

    /// Caches a mapping with the implementation's default TTL.
    async fn set_destination(&self, code: &str, destination_url: &str) -> CacheResult<()>;

    /// Drops a cached mapping, e.g. after the link is deleted.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Reports whether the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
