use chrono::{DateTime, Utc};
use serde::Deserialize;

// GitHub GraphQL response types

/// One page of a GraphQL connection (`pageInfo` + `nodes`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    pub page_info: PageInfo,
    pub nodes: Vec<N>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Nested connection where only the first page is requested
#[derive(Debug, Deserialize)]
pub struct Nodes<N> {
    pub nodes: Vec<N>,
}

impl<N> Default for Nodes<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Author {
    pub login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub updated_at: DateTime<Utc>,
    pub author: Option<Author>,
    pub comments: Nodes<Comment>,
}

impl Discussion {
    pub fn author_login(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.login.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: Option<Author>,
    pub created_at: DateTime<Utc>,
    /// Absent when the comments-only discussion query is used
    #[serde(default)]
    pub replies: Nodes<Reply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub author: Option<Author>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub author: Option<Author>,
    pub updated_at: DateTime<Utc>,
    pub merged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discussion_without_replies_field() {
        let discussion: Discussion = serde_json::from_value(json!({
            "updatedAt": "2024-05-01T12:00:00Z",
            "author": null,
            "comments": {
                "nodes": [
                    { "author": { "login": "bob" }, "createdAt": "2024-05-01T10:00:00Z" }
                ]
            }
        }))
        .unwrap();

        assert_eq!(discussion.author_login(), None);
        assert_eq!(discussion.comments.nodes.len(), 1);
        assert!(discussion.comments.nodes[0].replies.nodes.is_empty());
    }

    #[test]
    fn test_connection_page_info() {
        let page: Connection<PullRequest> = serde_json::from_value(json!({
            "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29y" },
            "nodes": [
                { "author": { "login": "alice" }, "updatedAt": "2024-05-01T12:00:00Z", "merged": true }
            ]
        }))
        .unwrap();

        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("Y3Vyc29y"));
        assert_eq!(page.nodes[0].author.as_ref().unwrap().login, "alice");
    }
}
