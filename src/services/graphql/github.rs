use super::{FetchError, GraphQlTransport};
use crate::utils::http_client::create_http_client;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";

/// GitHub GraphQL client backed by reqwest
pub struct GitHubGraphQlClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl GitHubGraphQlClient {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self, FetchError> {
        Ok(Self {
            client: create_http_client()?,
            endpoint: endpoint.into(),
            token,
        })
    }
}

#[async_trait]
impl GraphQlTransport for GitHubGraphQlClient {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, FetchError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, ACCEPT_GITHUB_V3)
            .json(&json!({
                "query": query,
                "variables": variables,
            }));

        // Without a token the request goes out unauthenticated and GitHub rejects it
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let response_data: GraphQlResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(format!("body is not valid JSON: {}", e)))?;

        if let Some(errors) = response_data.errors {
            let messages = errors.iter().map(error_message).collect::<Vec<_>>();
            log::error!("GitHub GraphQL errors: {:?}", messages);
            return Err(FetchError::GraphQl(messages));
        }

        response_data
            .data
            .ok_or_else(|| FetchError::MalformedResponse("no data in GitHub response".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<Value>>,
}

fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.to_string())
}
