use crate::models::Leaderboard;
use crate::services::contributor_fetcher::ContributorFetcher;
use crate::services::graphql::FetchError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Immutable view of the last computed leaderboards
#[derive(Clone, Debug, Default, Serialize)]
pub struct LeaderboardSnapshot {
    pub days: u32,
    pub replies: Leaderboard,
    pub pull_requests: Leaderboard,
    pub replies_refreshed_at: Option<DateTime<Utc>>,
    pub pull_requests_refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    /// Another refresh was still in flight, nothing was fetched
    AlreadyRunning,
}

/// Owns the published snapshot; only `refresh` replaces it
pub struct LeaderboardService {
    fetcher: ContributorFetcher,
    snapshot: RwLock<Arc<LeaderboardSnapshot>>,
    refreshing: AtomicBool,
}

impl LeaderboardService {
    pub fn new(fetcher: ContributorFetcher) -> Self {
        let snapshot = LeaderboardSnapshot {
            days: fetcher.days(),
            ..Default::default()
        };
        Self {
            fetcher,
            snapshot: RwLock::new(Arc::new(snapshot)),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Current snapshot; cheap to call from request handlers
    pub fn snapshot(&self) -> Arc<LeaderboardSnapshot> {
        let guard = match self.snapshot.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(&*guard)
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Fetch replies, then pull requests, publishing each leaderboard as soon
    /// as it is complete. On failure the previous data for the failed
    /// category stays visible.
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        let Some(_guard) = RefreshGuard::acquire(&self.refreshing) else {
            log::warn!("Leaderboard refresh already running, skipping");
            return Ok(RefreshOutcome::AlreadyRunning);
        };

        log::info!(
            "Refreshing leaderboards for {} (last {} days)",
            self.fetcher.repository(),
            self.fetcher.days()
        );

        let replies = self.fetcher.fetch_replies().await?;
        log::info!("💬 {} contributors replied in discussions", replies.len());
        self.publish(|snapshot| {
            snapshot.replies = replies;
            snapshot.replies_refreshed_at = Some(Utc::now());
        });

        let pull_requests = self.fetcher.fetch_pull_requests().await?;
        log::info!("🔀 {} contributors had pull requests merged", pull_requests.len());
        self.publish(|snapshot| {
            snapshot.pull_requests = pull_requests;
            snapshot.pull_requests_refreshed_at = Some(Utc::now());
        });

        Ok(RefreshOutcome::Completed)
    }

    fn publish<F: FnOnce(&mut LeaderboardSnapshot)>(&self, update: F) {
        let mut guard = match self.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = LeaderboardSnapshot::clone(&**guard);
        update(&mut next);
        *guard = Arc::new(next);
    }
}

/// Clears the in-flight flag when the refresh ends, including on error
struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::graphql::testing::ScriptedTransport;
    use crate::services::pagination::RepositoryRef;
    use crate::services::rate_limit::NoDelay;
    use chrono::Duration;
    use serde_json::{json, Value};

    fn recent() -> String {
        (Utc::now() - Duration::hours(1)).to_rfc3339()
    }

    fn discussions_page(commenter: &str) -> Value {
        json!({
            "repository": { "discussions": {
                "pageInfo": { "hasNextPage": false, "endCursor": null },
                "nodes": [{
                    "updatedAt": recent(),
                    "author": { "login": "founder" },
                    "comments": { "nodes": [
                        { "author": { "login": commenter }, "createdAt": recent(), "replies": { "nodes": [] } }
                    ]}
                }]
            }}
        })
    }

    fn pull_requests_page(author: &str) -> Value {
        json!({
            "repository": { "pullRequests": {
                "pageInfo": { "hasNextPage": false, "endCursor": null },
                "nodes": [{ "author": { "login": author }, "updatedAt": recent(), "merged": true }]
            }}
        })
    }

    fn service(transport: Arc<ScriptedTransport>) -> LeaderboardService {
        LeaderboardService::new(ContributorFetcher::new(
            transport,
            Arc::new(NoDelay),
            RepositoryRef::new("zauberzeug", "nicegui"),
            10,
        ))
    }

    #[test]
    fn test_initial_snapshot_is_empty() {
        let service = service(Arc::new(ScriptedTransport::new()));
        let snapshot = service.snapshot();

        assert_eq!(snapshot.days, 10);
        assert!(snapshot.replies.is_empty());
        assert!(snapshot.pull_requests.is_empty());
        assert!(snapshot.replies_refreshed_at.is_none());
    }

    #[tokio::test]
    async fn test_refresh_publishes_both_leaderboards() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_data(discussions_page("bob"))
            .push_data(pull_requests_page("alice"));
        let service = service(transport);

        let before = service.snapshot();
        assert_eq!(service.refresh().await.unwrap(), RefreshOutcome::Completed);
        let after = service.snapshot();

        assert_eq!(after.replies.count_for("bob"), Some(1));
        assert_eq!(after.pull_requests.count_for("alice"), Some(1));
        assert!(after.pull_requests_refreshed_at.is_some());
        // Previously handed out snapshots are never mutated
        assert!(before.replies.is_empty());
        assert!(!service.is_refreshing());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_data() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_data(discussions_page("bob"))
            .push_data(pull_requests_page("alice"))
            .push_data(discussions_page("carol"))
            .push_error(FetchError::GraphQl(vec!["API rate limit exceeded".to_string()]));
        let service = service(transport);

        service.refresh().await.unwrap();
        let err = service.refresh().await.unwrap_err();
        assert!(matches!(err, FetchError::GraphQl(_)));

        let snapshot = service.snapshot();
        assert_eq!(snapshot.replies.count_for("carol"), Some(1));
        assert_eq!(snapshot.replies.count_for("bob"), None);
        assert_eq!(snapshot.pull_requests.count_for("alice"), Some(1));
        assert!(!service.is_refreshing());
    }

    #[tokio::test]
    async fn test_overlapping_refresh_is_skipped() {
        let transport = Arc::new(ScriptedTransport::new());
        let service = service(transport.clone());

        let guard = RefreshGuard::acquire(&service.refreshing).unwrap();
        assert!(service.is_refreshing());
        assert_eq!(service.refresh().await.unwrap(), RefreshOutcome::AlreadyRunning);
        assert!(transport.requests().is_empty());
        drop(guard);

        assert!(!service.is_refreshing());
    }
}
