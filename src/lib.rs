//! # snaplink
//!
//! A URL shortening service: collision-safe short-code allocation, cached
//! redirects, and asynchronous click tracking, served over Axum with
//! PostgreSQL storage.
//!
//! The crate is layered so the allocation and redirect logic never touches
//! HTTP or SQL directly:
//!
//! - [`domain`] holds entities, repository traits, and the click worker
//! - [`application`] holds the services orchestrating allocation, stats,
//!   and identity
//! - [`infrastructure`] implements the repository and cache traits against
//!   PostgreSQL and Redis
//! - [`api`] is the HTTP surface: handlers, DTOs, and middleware
//!
//! Running the server needs `DATABASE_URL` and `TOKEN_SIGNING_SECRET`;
//! `REDIS_URL` optionally enables redirect caching. See [`config`] for the
//! full list of settings and `src/bin/admin.rs` for token issuance.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod routes;
pub mod server;
pub mod state;
pub mod utils;

pub use error::AppError;
pub use state::AppState;

/// Frequently used types, re-exported for library users and tests.
pub mod prelude {
    pub use crate::application::services::{AuthService, LinkService, StatsService};
    pub use crate::domain::entities::{NewShortLink, Owner, ShortLink};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
