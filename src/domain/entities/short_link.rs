//! ShortLink entity: the mapping from a short code to its destination URL.

use chrono::{DateTime, Utc};

/// A persisted short link.
///
/// Immutable after creation except for `click_count`, which is only ever
/// changed through the store's atomic increment. `owner_id` is `None` for
/// links created anonymously.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub id: i64,
    pub code: String,
    pub destination_url: String,
    pub owner_id: Option<i64>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    pub fn new(
        id: i64,
        code: String,
        destination_url: String,
        owner_id: Option<i64>,
        click_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            destination_url,
            owner_id,
            click_count,
            created_at,
        }
    }

    /// Returns true if the link was created without an owning identity.
    pub fn is_anonymous(&self) -> bool {
        self.owner_id.is_none()
    }
}

/// Input data for inserting a new short link.
///
/// `click_count` always starts at 0 and `created_at` is assigned by the
/// store, so neither appears here.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub code: String,
    pub destination_url: String,
    pub owner_id: Option<i64>,
}
