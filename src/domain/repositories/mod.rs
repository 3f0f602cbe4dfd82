//! Repository traits decoupling the domain from storage backends.

pub mod link_repository;
pub mod token_repository;

pub use link_repository::{
    DailyActivity, LinkQuery, LinkRepository, OwnerStats, SortField, SortOrder,
};
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
