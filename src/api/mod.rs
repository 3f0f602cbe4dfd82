//! HTTP surface: request handlers, DTOs, middleware, and route wiring.
//!
//! Handlers stay thin; they validate input, call a service, and shape the
//! response. Everything stateful lives behind [`crate::state::AppState`].

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
