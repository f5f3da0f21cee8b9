pub mod collectors;
pub mod contributor_fetcher;
pub mod graphql;
pub mod leaderboard_service;
pub mod pagination;
pub mod rate_limit;
pub mod refresh_scheduler;

pub use contributor_fetcher::ContributorFetcher;
pub use leaderboard_service::{LeaderboardService, LeaderboardSnapshot, RefreshOutcome};
pub use refresh_scheduler::RefreshScheduler;
