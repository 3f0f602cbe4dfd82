//! Handler for the health endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{ComponentCheck, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Probes the database, the click queue, and the cache.
///
/// # Endpoint
///
/// `GET /health`
///
/// Responds `200` when every probe passes and `503` with the same body shape
/// when any component is degraded, so load balancers and humans read the
/// same report. The `NullCache` always reports healthy, which keeps
/// cacheless deployments green.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (database, cache) = tokio::join!(check_database(&state), check_cache(&state));

    let checks = HealthChecks {
        database,
        click_queue: check_click_queue(&state),
        cache,
    };

    if checks.all_ok() {
        Ok(Json(HealthResponse::from_checks(checks)))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::from_checks(checks)),
        ))
    }
}

async fn check_database(state: &AppState) -> ComponentCheck {
    match state.link_service.ping().await {
        Ok(()) => ComponentCheck::ok("Connected".to_string()),
        Err(e) => ComponentCheck::failing(format!("Database error: {}", e)),
    }
}

fn check_click_queue(state: &AppState) -> ComponentCheck {
    if state.click_sender.is_closed() {
        ComponentCheck::failing("Click queue is closed".to_string())
    } else {
        ComponentCheck::ok(format!("Capacity: {}", state.click_sender.capacity()))
    }
}

async fn check_cache(state: &AppState) -> ComponentCheck {
    if state.cache.health_check().await {
        ComponentCheck::ok(None)
    } else {
        ComponentCheck::failing("Cache backend unreachable".to_string())
    }
}
