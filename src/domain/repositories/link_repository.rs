//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, Owner, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Sortable columns for owner-scoped link listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    ClickCount,
    Code,
    DestinationUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter, sort, and pagination parameters for a link listing.
#[derive(Debug, Clone)]
pub struct LinkQuery {
    /// Case-insensitive substring match against code and destination URL.
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for LinkQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            limit: 20,
            offset: 0,
        }
    }
}

/// Aggregated click totals for one owner.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerStats {
    pub total_links: i64,
    pub total_clicks: i64,
    pub avg_clicks: f64,
}

/// Per-day roll-up of an owner's recent activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyActivity {
    pub day: NaiveDate,
    pub links_created: i64,
    pub clicks: i64,
}

/// Storage contract for short link mappings.
///
/// The store enforces the global uniqueness of `code` through a unique
/// constraint; `insert` surfaces a violation as [`AppError::AliasTaken`] so
/// the allocation service can distinguish a collision from a hard failure.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - In-memory implementation in `tests/common` for integration tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new mapping in a single atomic statement.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTaken`] if `code` already exists (the
    /// check-then-insert race lost to a concurrent writer), or
    /// [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Existence check for a code. Cheaper than a full row fetch; used by
    /// the allocation loop and the custom-alias pre-check.
    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Dedup lookup: the code already minted for this `(destination, owner)`
    /// pair, if any. `Owner::Anonymous` matches only ownerless rows.
    async fn find_code_by_destination(
        &self,
        destination_url: &str,
        owner: Owner,
    ) -> Result<Option<String>, AppError>;

    /// Projected redirect lookup returning only the destination URL.
    async fn find_destination_by_code(&self, code: &str) -> Result<Option<String>, AppError>;

    /// Atomically adds 1 to the click counter. Never read-then-write: two
    /// concurrent redirects must not lose an update.
    async fn increment_clicks(&self, code: &str) -> Result<(), AppError>;

    /// Fetches a link by primary key, regardless of owner.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Lists an owner's links with search, sort, and pagination.
    async fn list_for_owner(
        &self,
        owner_id: i64,
        query: &LinkQuery,
    ) -> Result<Vec<ShortLink>, AppError>;

    /// Counts an owner's links matching the same search filter as
    /// [`Self::list_for_owner`].
    async fn count_for_owner(&self, owner_id: i64, search: Option<String>)
    -> Result<i64, AppError>;

    /// Returns the subset of `ids` that exist and belong to `owner_id`.
    async fn find_owned_ids(&self, ids: &[i64], owner_id: i64) -> Result<Vec<i64>, AppError>;

    /// Deletes the given links, restricted to rows owned by `owner_id`.
    /// Returns the codes of the rows removed so callers can drop cached
    /// redirect entries.
    async fn delete_owned(&self, ids: &[i64], owner_id: i64) -> Result<Vec<String>, AppError>;

    /// Aggregate totals for an owner's links.
    async fn stats_for_owner(&self, owner_id: i64) -> Result<OwnerStats, AppError>;

    /// Per-day creation/click roll-up for the trailing `days` days.
    async fn activity_for_owner(
        &self,
        owner_id: i64,
        days: i64,
    ) -> Result<Vec<DailyActivity>, AppError>;

    /// The owner's most-clicked links, capped at `limit`.
    async fn top_for_owner(&self, owner_id: i64, limit: i64) -> Result<Vec<ShortLink>, AppError>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
