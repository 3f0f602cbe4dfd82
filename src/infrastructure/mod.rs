//! Infrastructure layer: concrete storage and cache backends.

pub mod cache;
pub mod persistence;
