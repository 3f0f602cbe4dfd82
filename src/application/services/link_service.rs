//! Short link allocation, resolution, and management.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{NewShortLink, Owner, ShortLink};
use crate::domain::repositories::{LinkQuery, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, GENERATED_CODE_LENGTH, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;

/// Retry budget for generated-code allocation.
///
/// Deliberately small: with 64^7 possible codes the collision probability is
/// negligible at realistic volumes. A deployment that actually exhausts this
/// budget needs longer codes, not more retries.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Orchestrates code generation, uniqueness checking, and persistence.
///
/// Allocation never overwrites: the pre-insert existence check produces a
/// clean retry, and the store's unique constraint on `code` settles the
/// residual check-then-insert race. Redirect resolution hands the click
/// increment to the background worker and returns without waiting on it.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    click_sender: mpsc::Sender<ClickEvent>,
    max_attempts: usize,
}

impl LinkService {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        generator: Arc<dyn CodeGenerator>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            repository,
            generator,
            click_sender,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the allocation retry budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Shortens a URL for an anonymous caller.
    ///
    /// Identical anonymous submissions collapse to one mapping: if an
    /// ownerless link for the normalized destination already exists, its
    /// code is returned and nothing is inserted.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidDestination`] for malformed or non-HTTP(S) URLs,
    /// [`AppError::ExhaustedRetries`] if no unique code was found within the
    /// retry budget.
    pub async fn create_anonymous(&self, destination_url: &str) -> Result<String, AppError> {
        self.create_generated(destination_url, Owner::Anonymous)
            .await
    }

    /// Shortens a URL under an owning identity.
    ///
    /// Dedup is scoped to `(destination, owner)`: a caller re-shortening a
    /// URL they already own gets their previous code back.
    pub async fn create_for_owner(
        &self,
        destination_url: &str,
        owner_id: i64,
    ) -> Result<String, AppError> {
        self.create_generated(destination_url, Owner::Owned(owner_id))
            .await
    }

    /// Creates a mapping under a caller-chosen alias. Aliases are always
    /// owned; the HTTP layer rejects anonymous callers before getting here.
    ///
    /// No dedup-by-destination here: a caller may mint several aliases for
    /// the same destination. There is exactly one candidate code, so this
    /// path skips the generation loop entirely.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidAlias`] for malformed aliases,
    /// [`AppError::AliasTaken`] when the alias is already mapped (whether
    /// caught by the pre-check or by the unique constraint on insert).
    pub async fn create_custom(
        &self,
        destination_url: &str,
        requested_code: &str,
        owner_id: i64,
    ) -> Result<String, AppError> {
        let destination = normalize_destination(destination_url)?;
        validate_custom_code(requested_code)?;

        if self.repository.exists_by_code(requested_code).await? {
            return Err(AppError::alias_taken(
                "Custom alias already exists",
                json!({ "code": requested_code }),
            ));
        }

        let link = self
            .repository
            .insert(NewShortLink {
                code: requested_code.to_string(),
                destination_url: destination,
                owner_id: Some(owner_id),
            })
            .await?;

        Ok(link.code)
    }

    /// Resolves a short code to its destination URL.
    ///
    /// Queues a click event for the background worker and returns
    /// immediately; a full or closed queue drops the event rather than
    /// delaying the redirect.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] when no mapping exists for `code`.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let destination = self
            .repository
            .find_destination_by_code(code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })?;

        self.record_click(code);

        Ok(destination)
    }

    /// Queues a click event without blocking. Used directly by the redirect
    /// path when the destination was served from cache.
    pub fn record_click(&self, code: &str) {
        if self.click_sender.try_send(ClickEvent::new(code)).is_err() {
            counter!("clicks_dropped_total").increment(1);
            debug!("Click queue unavailable, dropping event for {}", code);
        }
    }

    /// Cheap storage connectivity probe for health checks.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Lists an owner's links along with the unpaginated total for the same
    /// filter.
    pub async fn list_links(
        &self,
        owner_id: i64,
        query: &LinkQuery,
    ) -> Result<(Vec<ShortLink>, i64), AppError> {
        let links = self.repository.list_for_owner(owner_id, query).await?;
        let total = self
            .repository
            .count_for_owner(owner_id, query.search.clone())
            .await?;

        Ok((links, total))
    }

    /// Deletes one link after verifying ownership.
    ///
    /// Returns the deleted link's code so the caller can invalidate any
    /// cached redirect entry.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for unknown ids, [`AppError::Forbidden`] when
    /// the link belongs to someone else (or to nobody).
    pub async fn delete_link(&self, id: i64, owner_id: i64) -> Result<String, AppError> {
        let link = self.repository.find_by_id(id).await?.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "id": id }))
        })?;

        if link.owner_id != Some(owner_id) {
            return Err(AppError::forbidden(
                "You can only delete your own links",
                json!({ "id": id }),
            ));
        }

        self.repository.delete_owned(&[id], owner_id).await?;
        Ok(link.code)
    }

    /// Deletes a batch of links, rejecting the whole request if any id is
    /// unknown or owned by someone else.
    ///
    /// Returns the codes of the links removed.
    pub async fn delete_links(&self, ids: &[i64], owner_id: i64) -> Result<Vec<String>, AppError> {
        let owned = self.repository.find_owned_ids(ids, owner_id).await?;

        let rejected: Vec<i64> = ids.iter().copied().filter(|id| !owned.contains(id)).collect();
        if !rejected.is_empty() {
            return Err(AppError::forbidden(
                "Some links were not found or are not yours",
                json!({ "invalid_ids": rejected }),
            ));
        }

        self.repository.delete_owned(ids, owner_id).await
    }
}

/// Normalizes a destination URL, translating parse failures into the
/// caller-facing error.
fn normalize_destination(destination_url: &str) -> Result<String, AppError> {
    normalize_url(destination_url).map_err(|e| {
        AppError::invalid_destination(
            "Invalid destination URL",
            json!({ "reason": e.to_string() }),
        )
    })
}

impl LinkService {
    async fn create_generated(
        &self,
        destination_url: &str,
        owner: Owner,
    ) -> Result<String, AppError> {
        let destination = normalize_destination(destination_url)?;

        if let Some(existing) = self
            .repository
            .find_code_by_destination(&destination, owner)
            .await?
        {
            return Ok(existing);
        }

        for _ in 0..self.max_attempts {
            let code = self.generator.generate(GENERATED_CODE_LENGTH);

            if self.repository.exists_by_code(&code).await? {
                continue;
            }

            let new_link = NewShortLink {
                code,
                destination_url: destination.clone(),
                owner_id: owner.id(),
            };

            match self.repository.insert(new_link).await {
                Ok(link) => return Ok(link.code),
                // A concurrent writer won the check-then-insert race for
                // this code; the attempt is spent, generate a fresh one.
                Err(AppError::AliasTaken { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::exhausted_retries(
            "Failed to allocate a unique short code",
            json!({ "attempts": self.max_attempts }),
        ))
    }
}
