//! HTTP middleware for request processing.

pub mod identity;
pub mod tracing;

pub use identity::Caller;
