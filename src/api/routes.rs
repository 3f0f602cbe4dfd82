//! API route configuration.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::handlers::{
    batch_delete_handler, custom_shorten_handler, delete_link_handler, list_links_handler,
    shorten_handler, stats_handler,
};
use crate::state::AppState;

/// All `/api` routes.
///
/// # Endpoints
///
/// - `POST   /shorten`            - Shorten a URL with a generated code
/// - `POST   /shorten/custom`     - Shorten a URL under a chosen alias
/// - `GET    /links`              - List the caller's links (auth required)
/// - `DELETE /links/{id}`         - Delete one link (auth required)
/// - `POST   /links/batch-delete` - Delete up to 50 links (auth required)
/// - `GET    /stats`              - Aggregate statistics (auth required)
///
/// Shorten endpoints accept anonymous callers; the rest resolve the bearer
/// token to an owner and reject anonymous requests with 401.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/custom", post(custom_shorten_handler))
        .route("/links", get(list_links_handler))
        .route("/links/{id}", delete(delete_link_handler))
        .route("/links/batch-delete", post(batch_delete_handler))
        .route("/stats", get(stats_handler))
}
