//! DTOs for the health endpoint.

use serde::Serialize;

/// Outcome of probing a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Ok,
    Error,
}

/// Probe result for one component, with an optional human-readable detail.
#[derive(Debug, Serialize)]
pub struct ComponentCheck {
    pub status: ComponentState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentCheck {
    pub fn ok(message: impl Into<Option<String>>) -> Self {
        Self {
            status: ComponentState::Ok,
            message: message.into(),
        }
    }

    pub fn failing(message: String) -> Self {
        Self {
            status: ComponentState::Error,
            message: Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ComponentState::Ok
    }
}

/// All component probes in one response.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: ComponentCheck,
    pub click_queue: ComponentCheck,
    pub cache: ComponentCheck,
}

impl HealthChecks {
    pub fn all_ok(&self) -> bool {
        self.database.is_ok() && self.click_queue.is_ok() && self.cache.is_ok()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

impl HealthResponse {
    pub fn from_checks(checks: HealthChecks) -> Self {
        Self {
            status: if checks.all_ok() { "healthy" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }
}
