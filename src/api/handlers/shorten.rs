//! Handlers for link creation endpoints.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{CustomShortenRequest, ShortenRequest, ShortenResponse};
use crate::api::middleware::Caller;
use crate::domain::entities::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link with a generated code.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// Anonymous callers are allowed. Re-shortening a destination the caller
/// already shortened returns the existing code instead of minting a new one,
/// so a `201` here does not always mean a new row.
///
/// # Errors
///
/// - `400` for a malformed or non-HTTP(S) destination
/// - `500` if no unique code could be allocated
pub async fn shorten_handler(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let code = match owner {
        Owner::Anonymous => state.link_service.create_anonymous(&payload.url).await?,
        Owner::Owned(owner_id) => {
            state
                .link_service
                .create_for_owner(&payload.url, owner_id)
                .await?
        }
    };

    let short_url = state.short_url(&code);

    Ok((StatusCode::CREATED, Json(ShortenResponse { code, short_url })))
}

/// Creates a short link under a caller-chosen alias.
///
/// # Endpoint
///
/// `POST /api/shorten/custom`
///
/// Claiming an alias requires authentication. Unlike generated codes there
/// is no dedup by destination: a caller may point several aliases at the
/// same URL.
///
/// # Errors
///
/// - `401` for anonymous callers
/// - `400` for a malformed destination or alias
/// - `409` when the alias is already mapped
pub async fn custom_shorten_handler(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Json(payload): Json<CustomShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let owner_id = owner.require()?;
    payload.validate()?;

    let code = state
        .link_service
        .create_custom(&payload.url, &payload.alias, owner_id)
        .await?;

    let short_url = state.short_url(&code);

    Ok((StatusCode::CREATED, Json(ShortenResponse { code, short_url })))
}
