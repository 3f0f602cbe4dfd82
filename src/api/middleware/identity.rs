//! Caller identity extraction from bearer tokens.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use tracing::warn;

use crate::domain::entities::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Extractor resolving the request's [`Owner`] identity.
///
/// A missing, malformed, unknown, or revoked bearer token downgrades the
/// caller to [`Owner::Anonymous`] instead of rejecting the request. Shorten
/// and redirect endpoints work for everyone; endpoints that need an owner
/// call [`Owner::require`] and answer 401 themselves.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
pub struct Caller(pub Owner);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Caller(Owner::Anonymous));
        };

        match state.auth_service.identify(&token).await {
            Ok(Some(owner_id)) => Ok(Caller(Owner::Owned(owner_id))),
            Ok(None) => Ok(Caller(Owner::Anonymous)),
            Err(e) => {
                // Identity lookup failure must not break public endpoints.
                warn!("Token lookup failed, treating caller as anonymous: {}", e);
                Ok(Caller(Owner::Anonymous))
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
