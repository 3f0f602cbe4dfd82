//! Shared fixtures for integration tests: in-memory repositories and an
//! in-process test server.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc;

use snaplink::application::services::auth_service::hash_token;
use snaplink::application::services::{AuthService, LinkService, StatsService};
use snaplink::domain::click_worker::run_click_worker;
use snaplink::domain::entities::{NewShortLink, Owner, ShortLink};
use snaplink::domain::repositories::{
    ApiToken, DailyActivity, LinkQuery, LinkRepository, OwnerStats, SortField, SortOrder,
    TokenRepository,
};
use snaplink::error::AppError;
use snaplink::infrastructure::cache::NullCache;
use snaplink::routes::router;
use snaplink::state::AppState;
use snaplink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_TOKEN: &str = "raw-integration-token";
pub const TEST_BASE_URL: &str = "http://sl.test";

/// In-memory link store mirroring the PostgreSQL repository semantics,
/// including the unique-code insert behavior the allocation loop relies on.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<ShortLink>>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn click_count(&self, code: &str) -> Option<i64> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.click_count)
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

fn matches_search(link: &ShortLink, search: Option<&str>) -> bool {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        None => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            link.code.to_lowercase().contains(&needle)
                || link.destination_url.to_lowercase().contains(&needle)
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut links = self.links.lock().unwrap();

        if links.iter().any(|l| l.code == new_link.code) {
            return Err(AppError::alias_taken(
                "Short code already exists",
                json!({ "code": new_link.code }),
            ));
        }

        let link = ShortLink::new(
            self.next_id.fetch_add(1, Ordering::SeqCst),
            new_link.code,
            new_link.destination_url,
            new_link.owner_id,
            0,
            Utc::now(),
        );
        links.push(link.clone());

        Ok(link)
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.lock().unwrap().iter().any(|l| l.code == code))
    }

    async fn find_code_by_destination(
        &self,
        destination_url: &str,
        owner: Owner,
    ) -> Result<Option<String>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.destination_url == destination_url && l.owner_id == owner.id())
            .map(|l| l.code.clone()))
    }

    async fn find_destination_by_code(&self, code: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.destination_url.clone()))
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        let mut links = self.links.lock().unwrap();
        if let Some(link) = links.iter_mut().find(|l| l.code == code) {
            link.click_count += 1;
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
        query: &LinkQuery,
    ) -> Result<Vec<ShortLink>, AppError> {
        let links = self.links.lock().unwrap();

        let mut matching: Vec<ShortLink> = links
            .iter()
            .filter(|l| l.owner_id == Some(owner_id))
            .filter(|l| matches_search(l, query.search.as_deref()))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::ClickCount => a.click_count.cmp(&b.click_count),
                SortField::Code => a.code.cmp(&b.code),
                SortField::DestinationUrl => a.destination_url.cmp(&b.destination_url),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(matching
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn count_for_owner(
        &self,
        owner_id: i64,
        search: Option<String>,
    ) -> Result<i64, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == Some(owner_id))
            .filter(|l| matches_search(l, search.as_deref()))
            .count() as i64)
    }

    async fn find_owned_ids(&self, ids: &[i64], owner_id: i64) -> Result<Vec<i64>, AppError> {
        let links = self.links.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| {
                links
                    .iter()
                    .any(|l| l.id == *id && l.owner_id == Some(owner_id))
            })
            .collect())
    }

    async fn delete_owned(&self, ids: &[i64], owner_id: i64) -> Result<Vec<String>, AppError> {
        let mut links = self.links.lock().unwrap();
        let mut deleted = Vec::new();

        links.retain(|l| {
            if ids.contains(&l.id) && l.owner_id == Some(owner_id) {
                deleted.push(l.code.clone());
                false
            } else {
                true
            }
        });

        Ok(deleted)
    }

    async fn stats_for_owner(&self, owner_id: i64) -> Result<OwnerStats, AppError> {
        let links = self.links.lock().unwrap();
        let owned: Vec<&ShortLink> = links
            .iter()
            .filter(|l| l.owner_id == Some(owner_id))
            .collect();

        let total_links = owned.len() as i64;
        let total_clicks: i64 = owned.iter().map(|l| l.click_count).sum();
        let avg_clicks = if total_links == 0 {
            0.0
        } else {
            total_clicks as f64 / total_links as f64
        };

        Ok(OwnerStats {
            total_links,
            total_clicks,
            avg_clicks,
        })
    }

    async fn activity_for_owner(
        &self,
        owner_id: i64,
        days: i64,
    ) -> Result<Vec<DailyActivity>, AppError> {
        let cutoff = Utc::now() - chrono::Duration::days(days);
        let links = self.links.lock().unwrap();

        let mut by_day: Vec<DailyActivity> = Vec::new();
        for link in links
            .iter()
            .filter(|l| l.owner_id == Some(owner_id) && l.created_at >= cutoff)
        {
            let day = link.created_at.date_naive();
            match by_day.iter_mut().find(|a| a.day == day) {
                Some(entry) => {
                    entry.links_created += 1;
                    entry.clicks += link.click_count;
                }
                None => by_day.push(DailyActivity {
                    day,
                    links_created: 1,
                    clicks: link.click_count,
                }),
            }
        }
        by_day.sort_by_key(|a| a.day);

        Ok(by_day)
    }

    async fn top_for_owner(&self, owner_id: i64, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let links = self.links.lock().unwrap();
        let mut owned: Vec<ShortLink> = links
            .iter()
            .filter(|l| l.owner_id == Some(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.click_count.cmp(&a.click_count));
        owned.truncate(limit.max(0) as usize);
        Ok(owned)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory token store for bearer-token identity tests.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
    next_id: AtomicI64,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seeds an active token, returning the owner id it resolves to.
    pub fn seed_token(&self, name: &str, token_hash: &str) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(ApiToken {
            id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            revoked_at: None,
        });
        id
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_owner_by_hash(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .map(|t| t.id))
    }

    async fn update_last_used(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let id = self.seed_token(name, token_hash);
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .expect("token just inserted"))
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn revoke_token(&self, name: &str) -> Result<bool, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens
            .iter_mut()
            .find(|t| t.name == name && t.revoked_at.is_none())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Code generator replaying a scripted sequence, falling back to random
/// codes once the script is exhausted. Lets collision tests control exactly
/// which codes the allocation loop sees.
pub struct ScriptedCodeGenerator {
    script: Mutex<VecDeque<String>>,
}

impl ScriptedCodeGenerator {
    pub fn new(codes: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            script: Mutex::new(codes.into_iter().map(str::to_string).collect()),
        }
    }
}

impl CodeGenerator for ScriptedCodeGenerator {
    fn generate(&self, length: usize) -> String {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| RandomCodeGenerator.generate(length))
    }
}

/// A fully wired in-process application over in-memory storage.
pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<InMemoryLinkRepository>,
}

impl TestApp {
    /// Waits until the background worker has brought `code`'s click count up
    /// to `expected`. Panics after a couple of seconds.
    pub async fn wait_for_clicks(&self, code: &str, expected: i64) {
        for _ in 0..200 {
            if self.links.click_count(code) == Some(expected) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "click count for {} did not reach {} (got {:?})",
            code,
            expected,
            self.links.click_count(code)
        );
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_generator(Arc::new(RandomCodeGenerator)).await
}

pub async fn spawn_app_with_generator(generator: Arc<dyn CodeGenerator>) -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::new());
    let tokens = Arc::new(InMemoryTokenRepository::new());
    tokens.seed_token("integration", &hash_token(TEST_SECRET, TEST_TOKEN));

    let (click_tx, click_rx) = mpsc::channel(1024);
    tokio::spawn(run_click_worker(
        click_rx,
        links.clone() as Arc<dyn LinkRepository>,
    ));

    let link_service = Arc::new(LinkService::new(
        links.clone() as Arc<dyn LinkRepository>,
        generator,
        click_tx.clone(),
    ));
    let stats_service = Arc::new(StatsService::new(links.clone() as Arc<dyn LinkRepository>));
    let auth_service = Arc::new(AuthService::new(tokens, TEST_SECRET.to_string()));

    let state = AppState {
        base_url: TEST_BASE_URL.to_string(),
        link_service,
        stats_service,
        auth_service,
        cache: Arc::new(NullCache::new()),
        click_sender: click_tx,
    };

    let server = TestServer::new(router(state)).expect("failed to start test server");

    TestApp { server, links }
}
