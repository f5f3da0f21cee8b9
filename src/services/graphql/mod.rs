pub mod github;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use github::GitHubGraphQlClient;

/// Failures while talking to the GraphQL API
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or timeout while issuing the request
    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("GitHub API request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// The response carried an `errors` payload; messages are kept verbatim
    #[error("GitHub API Error: {}", .0.join("; "))]
    GraphQl(Vec<String>),
    #[error("Invalid GitHub response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Whether the server answered but rejected or failed the query
    pub fn is_protocol(&self) -> bool {
        matches!(self, FetchError::HttpStatus { .. } | FetchError::GraphQl(_))
    }
}

/// Executes a single GraphQL request and returns the `data` object
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, FetchError>;
}
