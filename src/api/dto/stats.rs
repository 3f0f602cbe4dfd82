//! DTOs for the owner statistics endpoint.

use chrono::NaiveDate;
use serde::Serialize;

use super::links::LinkDto;

/// Aggregate statistics for an owner's links.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_links: i64,
    pub total_clicks: i64,
    /// Mean clicks per link, rounded to two decimal places.
    pub avg_clicks: f64,
    pub recent_activity: Vec<DailyActivityDto>,
    pub top_links: Vec<LinkDto>,
}

/// One day of creation and click activity.
#[derive(Debug, Serialize)]
pub struct DailyActivityDto {
    pub day: NaiveDate,
    pub links_created: i64,
    pub clicks: i64,
}
