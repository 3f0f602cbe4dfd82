//! Request and response shapes for the REST API, with serde serialization
//! and validator-derived input checks.

pub mod health;
pub mod links;
pub mod shorten;
pub mod stats;
