//! Handlers for link listing and deletion endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{
    BatchDeleteRequest, BatchDeleteResponse, LinkDto, ListLinksParams, ListLinksResponse,
};
use crate::api::middleware::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links with search, sort, and pagination.
///
/// # Endpoint
///
/// `GET /api/links?search=&sort_by=&sort_order=&limit=&skip=`
///
/// # Errors
///
/// - `401` for anonymous callers
/// - `400` for an over-long search string
pub async fn list_links_handler(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Query(params): Query<ListLinksParams>,
) -> Result<Json<ListLinksResponse>, AppError> {
    let owner_id = owner.require()?;
    let query = params.into_query()?;

    let (links, total_count) = state.link_service.list_links(owner_id, &query).await?;

    let total_pages = if total_count == 0 {
        0
    } else {
        (total_count + query.limit - 1) / query.limit
    };
    let current_page = query.offset / query.limit + 1;
    let has_more = query.offset + (links.len() as i64) < total_count;

    let links = links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.code);
            LinkDto::new(link, short_url)
        })
        .collect();

    Ok(Json(ListLinksResponse {
        links,
        total_count,
        total_pages,
        current_page,
        has_more,
    }))
}

/// Deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// - `401` for anonymous callers
/// - `404` for unknown ids
/// - `403` when the link belongs to someone else
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let owner_id = owner.require()?;

    let code = state.link_service.delete_link(id, owner_id).await?;
    let _ = state.cache.invalidate(&code).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes up to 50 of the caller's links in one request.
///
/// # Endpoint
///
/// `POST /api/links/batch-delete`
///
/// All-or-nothing: if any id is unknown or owned by someone else the whole
/// batch is rejected and nothing is deleted.
///
/// # Errors
///
/// - `401` for anonymous callers
/// - `400` for an empty or oversized batch
/// - `403` listing the offending ids when the batch is rejected
pub async fn batch_delete_handler(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Json(payload): Json<BatchDeleteRequest>,
) -> Result<Json<BatchDeleteResponse>, AppError> {
    let owner_id = owner.require()?;
    payload.validate()?;

    let codes = state
        .link_service
        .delete_links(&payload.ids, owner_id)
        .await?;

    for code in &codes {
        let _ = state.cache.invalidate(code).await;
    }

    Ok(Json(BatchDeleteResponse {
        deleted: codes.len() as u64,
    }))
}
