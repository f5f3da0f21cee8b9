use crate::models::github::Connection;
use crate::services::graphql::{FetchError, GraphQlTransport};
use crate::services::rate_limit::RateLimiter;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::ops::ControlFlow;

/// Trailing time window ending "now"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecencyWindow {
    cutoff: DateTime<Utc>,
}

impl RecencyWindow {
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Self {
        Self {
            cutoff: now - Duration::days(i64::from(days)),
        }
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Events exactly at the cutoff are still inside the window
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.cutoff
    }
}

/// Owner/name pair sent with every page request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    fn variables(&self, cursor: Option<&str>) -> Value {
        json!({
            "owner": self.owner,
            "repo": self.name,
            "after": cursor,
        })
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A cursor-paginated query over one connection below `repository`
#[derive(Clone, Copy, Debug)]
pub struct PagedQuery {
    pub name: &'static str,
    pub text: &'static str,
    /// Field under `data.repository` that holds the paginated connection
    pub connection: &'static str,
}

/// Drives a paged query until the visitor stops it or the pages run out
pub struct PaginatedQueryRunner<'a> {
    transport: &'a dyn GraphQlTransport,
    limiter: &'a dyn RateLimiter,
}

impl<'a> PaginatedQueryRunner<'a> {
    pub fn new(transport: &'a dyn GraphQlTransport, limiter: &'a dyn RateLimiter) -> Self {
        Self { transport, limiter }
    }

    /// Visit every node in server order.
    ///
    /// `visit` returns `ControlFlow::Break` on the first node outside the
    /// window; no further node or page is touched after that. Returns the
    /// number of pages fetched.
    pub async fn run<N, F>(
        &self,
        query: &PagedQuery,
        repository: &RepositoryRef,
        mut visit: F,
    ) -> Result<usize, FetchError>
    where
        N: DeserializeOwned + Send,
        F: FnMut(N) -> ControlFlow<()> + Send,
    {
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            if pages > 0 {
                self.limiter.wait().await;
            }

            let data = self
                .transport
                .execute(query.text, repository.variables(cursor.as_deref()))
                .await?;
            pages += 1;

            let page: Connection<N> = extract_connection(data, query.connection)?;
            log::debug!(
                "📥 {} page {} for {}: {} nodes (has next: {})",
                query.name,
                pages,
                repository,
                page.nodes.len(),
                page.page_info.has_next_page
            );

            for node in page.nodes {
                if visit(node).is_break() {
                    log::debug!("{} reached the end of the recency window on page {}", query.name, pages);
                    return Ok(pages);
                }
            }

            if !page.page_info.has_next_page {
                return Ok(pages);
            }

            cursor = match page.page_info.end_cursor {
                Some(next) => Some(next),
                None => {
                    return Err(FetchError::MalformedResponse(format!(
                        "{} reported another page without an end cursor",
                        query.name
                    )))
                }
            };
        }
    }
}

fn extract_connection<N: DeserializeOwned>(
    mut data: Value,
    connection: &str,
) -> Result<Connection<N>, FetchError> {
    let value = data
        .pointer_mut(&format!("/repository/{}", connection))
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or_else(|| FetchError::MalformedResponse(format!("missing repository.{}", connection)))?;

    serde_json::from_value(value)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid {} page: {}", connection, e)))
}
