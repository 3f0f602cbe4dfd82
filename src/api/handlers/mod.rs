//! Endpoint handlers, one module per group of routes.

pub mod health;
pub mod links;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use health::health_handler;
pub use links::{batch_delete_handler, delete_link_handler, list_links_handler};
pub use redirect::redirect_handler;
pub use shorten::{custom_shorten_handler, shorten_handler};
pub use stats::stats_handler;
