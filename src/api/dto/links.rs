//! DTOs for link listing and deletion endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::{LinkQuery, SortField, SortOrder};
use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_SEARCH_LENGTH: usize = 200;

/// Query parameters for `GET /api/links`.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksParams {
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl ListLinksParams {
    /// Converts request parameters into a repository query.
    ///
    /// `limit` is clamped to `1..=100` and `skip` to non-negative rather
    /// than rejected. Over-long search strings are rejected outright since
    /// silently truncating them would change the result set.
    pub fn into_query(self) -> Result<LinkQuery, AppError> {
        if let Some(ref search) = self.search
            && search.chars().count() > MAX_SEARCH_LENGTH
        {
            return Err(AppError::bad_request(
                "Search query is too long",
                json!({ "max_length": MAX_SEARCH_LENGTH }),
            ));
        }

        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = self.skip.unwrap_or(0).max(0);

        Ok(LinkQuery {
            search: self.search,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            limit,
            offset,
        })
    }
}

/// A single link as rendered in API responses.
#[derive(Debug, Serialize)]
pub struct LinkDto {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub destination_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkDto {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            short_url,
            destination_url: link.destination_url,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

/// Paginated listing response.
#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<LinkDto>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub has_more: bool,
}

/// Request body for `POST /api/links/batch-delete`.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchDeleteRequest {
    #[validate(length(min = 1, max = 50, message = "Between 1 and 50 ids per request"))]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub deleted: u64,
}
