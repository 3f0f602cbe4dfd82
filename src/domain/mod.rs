//! Domain layer: entities, repository contracts, and click tracking.

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
