//! Owner-facing analytics roll-ups.

use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::{DailyActivity, LinkRepository, OwnerStats};
use crate::error::AppError;

/// Days of history included in the activity roll-up.
const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Number of links in the "top links" section of the overview.
const TOP_LINKS_LIMIT: i64 = 5;

/// Everything the dashboard overview endpoint returns for one owner.
#[derive(Debug, Clone)]
pub struct OwnerOverview {
    pub stats: OwnerStats,
    pub recent_activity: Vec<DailyActivity>,
    pub top_links: Vec<ShortLink>,
}

/// Computes aggregate statistics over an owner's links.
pub struct StatsService {
    repository: Arc<dyn LinkRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Builds the overview: totals, last-7-days activity, top 5 links.
    pub async fn overview(&self, owner_id: i64) -> Result<OwnerOverview, AppError> {
        let stats = self.repository.stats_for_owner(owner_id).await?;
        let recent_activity = self
            .repository
            .activity_for_owner(owner_id, ACTIVITY_WINDOW_DAYS)
            .await?;
        let top_links = self
            .repository
            .top_for_owner(owner_id, TOP_LINKS_LIMIT)
            .await?;

        Ok(OwnerOverview {
            stats,
            recent_activity,
            top_links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;

    #[tokio::test]
    async fn test_overview_assembles_all_sections() {
        let mut repo = MockLinkRepository::new();

        repo.expect_stats_for_owner()
            .withf(|owner_id| *owner_id == 42)
            .times(1)
            .returning(|_| {
                Ok(OwnerStats {
                    total_links: 3,
                    total_clicks: 12,
                    avg_clicks: 4.0,
                })
            });

        repo.expect_activity_for_owner()
            .withf(|_, days| *days == 7)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        repo.expect_top_for_owner()
            .withf(|_, limit| *limit == 5)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let overview = StatsService::new(Arc::new(repo)).overview(42).await.unwrap();

        assert_eq!(overview.stats.total_links, 3);
        assert_eq!(overview.stats.total_clicks, 12);
        assert!(overview.recent_activity.is_empty());
        assert!(overview.top_links.is_empty());
    }
}
