//! Handler for owner statistics endpoint.

use axum::{Json, extract::State};

use crate::api::dto::links::LinkDto;
use crate::api::dto::stats::{DailyActivityDto, StatsResponse};
use crate::api::middleware::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Returns aggregate statistics for the caller's links.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// The response combines lifetime totals, a 7-day per-day activity roll-up,
/// and the caller's five most-clicked links.
///
/// # Errors
///
/// Returns `401` for anonymous callers.
pub async fn stats_handler(
    State(state): State<AppState>,
    Caller(owner): Caller,
) -> Result<Json<StatsResponse>, AppError> {
    let owner_id = owner.require()?;

    let overview = state.stats_service.overview(owner_id).await?;

    let recent_activity = overview
        .recent_activity
        .into_iter()
        .map(|activity| DailyActivityDto {
            day: activity.day,
            links_created: activity.links_created,
            clicks: activity.clicks,
        })
        .collect();

    let top_links = overview
        .top_links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.code);
            LinkDto::new(link, short_url)
        })
        .collect();

    Ok(Json(StatsResponse {
        total_links: overview.stats.total_links,
        total_clicks: overview.stats.total_clicks,
        avg_clicks: round2(overview.stats.avg_clicks),
        recent_activity,
        top_links,
    }))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
