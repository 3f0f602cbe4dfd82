use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload embedded in every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Application-level error taxonomy.
///
/// Each variant carries a human-readable message and a JSON `details` object
/// with structured context. Variants map 1:1 onto stable error codes so API
/// clients can branch on failures (e.g. prompt for a different alias on
/// `alias_taken` instead of showing a generic server error).
#[derive(Debug)]
pub enum AppError {
    /// Destination URL missing or malformed.
    InvalidDestination { message: String, details: Value },
    /// Custom alias fails the length or character-set rules.
    InvalidAlias { message: String, details: Value },
    /// Custom alias is already mapped to another destination.
    AliasTaken { message: String, details: Value },
    /// Generated-code allocation ran out of retry attempts.
    ExhaustedRetries { message: String, details: Value },
    /// No mapping exists for the requested code or id.
    NotFound { message: String, details: Value },
    /// Request shape failed validation (query params, batch sizes, ...).
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    Forbidden { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_destination(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidDestination {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_alias(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidAlias {
            message: message.into(),
            details,
        }
    }

    pub fn alias_taken(message: impl Into<String>, details: Value) -> Self {
        Self::AliasTaken {
            message: message.into(),
            details,
        }
    }

    pub fn exhausted_retries(message: impl Into<String>, details: Value) -> Self {
        Self::ExhaustedRetries {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn parts(self) -> (StatusCode, &'static str, String, Value) {
        match self {
            Self::InvalidDestination { message, details } => (
                StatusCode::BAD_REQUEST,
                "invalid_destination",
                message,
                details,
            ),
            Self::InvalidAlias { message, details } => {
                (StatusCode::BAD_REQUEST, "invalid_alias", message, details)
            }
            Self::AliasTaken { message, details } => {
                (StatusCode::CONFLICT, "alias_taken", message, details)
            }
            Self::ExhaustedRetries { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "exhausted_retries",
                message,
                details,
            ),
            Self::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            Self::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            Self::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            Self::Forbidden { message, details } => {
                (StatusCode::FORBIDDEN, "forbidden", message, details)
            }
            Self::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        }
    }

    /// Converts the error into the serializable payload used when a response
    /// reports a failure without the surrounding HTTP envelope.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            Self::InvalidDestination { message, details } => {
                ("invalid_destination", message, details)
            }
            Self::InvalidAlias { message, details } => ("invalid_alias", message, details),
            Self::AliasTaken { message, details } => ("alias_taken", message, details),
            Self::ExhaustedRetries { message, details } => ("exhausted_retries", message, details),
            Self::NotFound { message, details } => ("not_found", message, details),
            Self::Validation { message, details } => ("validation_error", message, details),
            Self::Unauthorized { message, details } => ("unauthorized", message, details),
            Self::Forbidden { message, details } => ("forbidden", message, details),
            Self::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.to_error_info();
        write!(f, "{}: {}", info.code, info.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation_on_code(&e) {
            return AppError::alias_taken(
                "Short code already exists",
                json!({ "constraint": "links_code_key" }),
            );
        }

        tracing::error!("Database error: {e}");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(e.field_errors()).unwrap_or_else(|_| json!({})),
        )
    }
}

/// Returns true when the error is a unique-constraint violation on the
/// short-code column. The allocation service treats this as "collision, try
/// again" (generated codes) or `AliasTaken` (custom codes), never as a hard
/// failure.
fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some("links_code_key"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            AppError::invalid_destination("a", json!({})),
            AppError::invalid_alias("b", json!({})),
            AppError::alias_taken("c", json!({})),
            AppError::exhausted_retries("d", json!({})),
            AppError::not_found("e", json!({})),
            AppError::bad_request("f", json!({})),
            AppError::unauthorized("g", json!({})),
            AppError::forbidden("h", json!({})),
            AppError::internal("i", json!({})),
        ];

        let mut codes: Vec<&str> = errors.iter().map(|e| e.to_error_info().code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_includes_code_and_message() {
        let err = AppError::alias_taken("alias in use", json!({ "code": "promo" }));
        assert_eq!(err.to_string(), "alias_taken: alias in use");
    }
}
