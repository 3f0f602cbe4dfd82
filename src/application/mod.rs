//! Application layer: service orchestration on top of the domain contracts.

pub mod services;
