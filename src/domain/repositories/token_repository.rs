//! Repository trait for API token storage.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A stored API token. Only the HMAC hash of the raw token is persisted.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Storage contract for API tokens.
///
/// A token row doubles as the caller identity: its `id` is the `owner_id`
/// recorded on links created while authenticated with it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Resolves a token hash to its owner id, skipping revoked tokens.
    async fn find_owner_by_hash(&self, token_hash: &str) -> Result<Option<i64>, AppError>;

    /// Records when the token was last presented. Best-effort bookkeeping.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError>;

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError>;

    /// Revokes a token by name. Returns false if no active token matched.
    async fn revoke_token(&self, name: &str) -> Result<bool, AppError>;
}
