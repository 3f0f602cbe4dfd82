//! Core business entities.

pub mod owner;
pub mod short_link;

pub use owner::Owner;
pub use short_link::{NewShortLink, ShortLink};
