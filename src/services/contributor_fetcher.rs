use crate::models::Leaderboard;
use crate::services::collectors::{
    collect_discussion_logins, collect_merged_pull_request_logins, exclude_bots, DiscussionScope,
};
use crate::services::graphql::{FetchError, GitHubGraphQlClient, GraphQlTransport};
use crate::services::pagination::{PaginatedQueryRunner, RecencyWindow, RepositoryRef};
use crate::services::rate_limit::RateLimiter;
use crate::utils::config::Config;
use chrono::Utc;
use std::sync::Arc;

/// Fetches contributor leaderboards for one repository over a trailing window
pub struct ContributorFetcher {
    transport: Arc<dyn GraphQlTransport>,
    limiter: Arc<dyn RateLimiter>,
    repository: RepositoryRef,
    days: u32,
}

impl ContributorFetcher {
    pub fn new(
        transport: Arc<dyn GraphQlTransport>,
        limiter: Arc<dyn RateLimiter>,
        repository: RepositoryRef,
        days: u32,
    ) -> Self {
        Self {
            transport,
            limiter,
            repository,
            days,
        }
    }

    /// Build a fetcher talking to the configured GitHub GraphQL endpoint
    pub fn from_config(config: &Config, limiter: Arc<dyn RateLimiter>) -> Result<Self, FetchError> {
        let client = GitHubGraphQlClient::new(config.graphql_url.clone(), config.github_token.clone())?;
        Ok(Self::new(
            Arc::new(client),
            limiter,
            RepositoryRef::new(config.github_owner.clone(), config.github_repo.clone()),
            config.days,
        ))
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    fn window(&self) -> RecencyWindow {
        RecencyWindow::last_days(self.days, Utc::now())
    }

    fn runner(&self) -> PaginatedQueryRunner<'_> {
        PaginatedQueryRunner::new(self.transport.as_ref(), self.limiter.as_ref())
    }

    /// Discussion comments and their replies
    pub async fn fetch_replies(&self) -> Result<Leaderboard, FetchError> {
        self.fetch_discussions(DiscussionScope::CommentsAndReplies).await
    }

    /// Top-level discussion comments only
    pub async fn fetch_comments(&self) -> Result<Leaderboard, FetchError> {
        self.fetch_discussions(DiscussionScope::CommentsOnly).await
    }

    async fn fetch_discussions(&self, scope: DiscussionScope) -> Result<Leaderboard, FetchError> {
        let logins =
            collect_discussion_logins(&self.runner(), &self.repository, scope, &self.window()).await?;
        Ok(Leaderboard::from_logins(logins))
    }

    /// Merged pull requests, without automation accounts
    pub async fn fetch_pull_requests(&self) -> Result<Leaderboard, FetchError> {
        let logins =
            collect_merged_pull_request_logins(&self.runner(), &self.repository, &self.window()).await?;
        Ok(Leaderboard::from_logins(exclude_bots(logins)))
    }
}
