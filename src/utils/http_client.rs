use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("people-board/", env!("CARGO_PKG_VERSION"));
/// Per-request timeout for GitHub API calls
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Create a configured HTTP client for making requests to the GitHub API
pub fn create_http_client() -> reqwest::Result<Client> {
    ClientBuilder::new()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_http_client() {
        assert!(create_http_client().is_ok());
        assert!(USER_AGENT.starts_with("people-board/"));
    }
}
