//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, Owner, ShortLink};
use crate::domain::repositories::{
    DailyActivity, LinkQuery, LinkRepository, OwnerStats, SortField, SortOrder,
};
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, code, destination_url, owner_id, click_count, created_at";

/// PostgreSQL repository for short link storage.
///
/// The `UNIQUE` constraint on `links.code` is the real uniqueness mechanism;
/// everything else here is cheap pre-checks and projections on top of it.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    destination_url: String,
    owner_id: Option<i64>,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for ShortLink {
    fn from(row: LinkRow) -> Self {
        ShortLink::new(
            row.id,
            row.code,
            row.destination_url,
            row.owner_id,
            row.click_count,
            row.created_at,
        )
    }
}

/// Escapes LIKE wildcards in user-supplied search input.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::ClickCount => "click_count",
        SortField::Code => "code",
        SortField::DestinationUrl => "destination_url",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)))
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            "INSERT INTO links (code, destination_url, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.code)
            .bind(&new_link.destination_url)
            .bind(new_link.owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn find_code_by_destination(
        &self,
        destination_url: &str,
        owner: Owner,
    ) -> Result<Option<String>, AppError> {
        let code = match owner {
            Owner::Owned(owner_id) => {
                sqlx::query_scalar(
                    "SELECT code FROM links
                     WHERE destination_url = $1 AND owner_id = $2
                     LIMIT 1",
                )
                .bind(destination_url)
                .bind(owner_id)
                .fetch_optional(self.pool.as_ref())
                .await?
            }
            Owner::Anonymous => {
                sqlx::query_scalar(
                    "SELECT code FROM links
                     WHERE destination_url = $1 AND owner_id IS NULL
                     LIMIT 1",
                )
                .bind(destination_url)
                .fetch_optional(self.pool.as_ref())
                .await?
            }
        };

        Ok(code)
    }

    async fn find_destination_by_code(&self, code: &str) -> Result<Option<String>, AppError> {
        let destination =
            sqlx::query_scalar("SELECT destination_url FROM links WHERE code = $1")
                .bind(code)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(destination)
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
        query: &LinkQuery,
    ) -> Result<Vec<ShortLink>, AppError> {
        // Sort column and direction come from closed enums, never from the
        // request string, so interpolating them is safe.
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links
             WHERE owner_id = $1
               AND ($2::text IS NULL OR code ILIKE $2 OR destination_url ILIKE $2)
             ORDER BY {} {}
             LIMIT $3 OFFSET $4",
            sort_column(query.sort_by),
            sort_direction(query.sort_order),
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(owner_id)
            .bind(search_pattern(query.search.as_deref()))
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_for_owner(
        &self,
        owner_id: i64,
        search: Option<String>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links
             WHERE owner_id = $1
               AND ($2::text IS NULL OR code ILIKE $2 OR destination_url ILIKE $2)",
        )
        .bind(owner_id)
        .bind(search_pattern(search.as_deref()))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn find_owned_ids(&self, ids: &[i64], owner_id: i64) -> Result<Vec<i64>, AppError> {
        let found: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM links WHERE id = ANY($1) AND owner_id = $2")
                .bind(ids)
                .bind(owner_id)
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(found)
    }

    async fn delete_owned(&self, ids: &[i64], owner_id: i64) -> Result<Vec<String>, AppError> {
        let codes: Vec<String> = sqlx::query_scalar(
            "DELETE FROM links WHERE id = ANY($1) AND owner_id = $2 RETURNING code",
        )
        .bind(ids)
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(codes)
    }

    async fn stats_for_owner(&self, owner_id: i64) -> Result<OwnerStats, AppError> {
        let (total_links, total_clicks, avg_clicks): (i64, i64, f64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COALESCE(SUM(click_count), 0)::bigint,
                    COALESCE(AVG(click_count), 0)::float8
             FROM links
             WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

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
        let rows: Vec<(NaiveDate, i64, i64)> = sqlx::query_as(
            "SELECT created_at::date AS day,
                    COUNT(*)::bigint,
                    COALESCE(SUM(click_count), 0)::bigint
             FROM links
             WHERE owner_id = $1
               AND created_at >= NOW() - make_interval(days => $2)
             GROUP BY day
             ORDER BY day",
        )
        .bind(owner_id)
        .bind(i32::try_from(days).unwrap_or(i32::MAX))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(day, links_created, clicks)| DailyActivity {
                day,
                links_created,
                clicks,
            })
            .collect())
    }

    async fn top_for_owner(&self, owner_id: i64, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links
             WHERE owner_id = $1
             ORDER BY click_count DESC, created_at DESC
             LIMIT $2"
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
