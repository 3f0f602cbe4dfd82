//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Check the cache for the destination
/// 2. On a miss, resolve through the database and backfill the cache
/// 3. Queue a click event for the background worker
/// 4. Return `307 Temporary Redirect`
///
/// A full or closed click queue drops the event rather than delaying the
/// redirect, and cache failures fall back to the database.
///
/// # Errors
///
/// Returns `404` if the code is not mapped.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    if let Ok(Some(destination)) = state.cache.get_destination(&code).await {
        debug!("Serving {} from cache", code);
        state.link_service.record_click(&code);
        return Ok(Redirect::temporary(&destination));
    }

    let destination = state.link_service.resolve(&code).await?;

    // Backfill the cache off the request path
    let cache = state.cache.clone();
    let cached_code = code.clone();
    let cached_destination = destination.clone();
    tokio::spawn(async move {
        if let Err(e) = cache
            .set_destination(&cached_code, &cached_destination)
            .await
        {
            error!("Failed to cache destination for {}: {}", cached_code, e);
        }
    });

    Ok(Redirect::temporary(&destination))
}
