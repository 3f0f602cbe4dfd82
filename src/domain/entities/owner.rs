//! Caller identity at the allocation-service boundary.

use crate::error::AppError;
use serde_json::json;

/// The identity attached to an inbound request.
///
/// Authentication is optional: requests with a valid token act as
/// `Owned(id)`, everything else acts as `Anonymous`. Modelled as a tagged
/// variant rather than a bare `Option<i64>` so call sites state which case
/// they handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Anonymous,
    Owned(i64),
}

impl Owner {
    /// The owner id to persist on a link: `None` for anonymous callers.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Anonymous => None,
            Self::Owned(id) => Some(*id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Unwraps the owner id, failing with `Unauthorized` for anonymous
    /// callers. Used by endpoints that require an authenticated identity.
    pub fn require(&self) -> Result<i64, AppError> {
        self.id().ok_or_else(|| {
            AppError::unauthorized(
                "Authentication required",
                json!({ "reason": "No valid API token presented" }),
            )
        })
    }
}

impl From<Option<i64>> for Owner {
    fn from(id: Option<i64>) -> Self {
        match id {
            Some(id) => Self::Owned(id),
            None => Self::Anonymous,
        }
    }
}
