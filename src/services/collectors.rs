use crate::models::github::{Discussion, PullRequest};
use crate::services::graphql::FetchError;
use crate::services::pagination::{PagedQuery, PaginatedQueryRunner, RecencyWindow, RepositoryRef};
use std::ops::ControlFlow;

/// Automation account whose merged pull requests are not counted
pub const DEPENDENCY_BOT_LOGIN: &str = "dependabot";

const DISCUSSION_COMMENTS_QUERY: PagedQuery = PagedQuery {
    name: "discussion comments",
    text: r#"
        query($owner: String!, $repo: String!, $after: String) {
            repository(owner: $owner, name: $repo) {
                discussions(first: 50, orderBy: { field: UPDATED_AT, direction: DESC }, after: $after) {
                    pageInfo {
                        hasNextPage
                        endCursor
                    }
                    nodes {
                        updatedAt
                        author { login }
                        comments(first: 100) {
                            nodes {
                                author { login }
                                createdAt
                            }
                        }
                    }
                }
            }
        }
    "#,
    connection: "discussions",
};

const DISCUSSION_REPLIES_QUERY: PagedQuery = PagedQuery {
    name: "discussion replies",
    text: r#"
        query($owner: String!, $repo: String!, $after: String) {
            repository(owner: $owner, name: $repo) {
                discussions(first: 50, orderBy: { field: UPDATED_AT, direction: DESC }, after: $after) {
                    pageInfo {
                        hasNextPage
                        endCursor
                    }
                    nodes {
                        updatedAt
                        author { login }
                        comments(first: 100) {
                            nodes {
                                author { login }
                                createdAt
                                replies(first: 50) {
                                    nodes {
                                        createdAt
                                        author { login }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    "#,
    connection: "discussions",
};

const PULL_REQUESTS_QUERY: PagedQuery = PagedQuery {
    name: "pull requests",
    text: r#"
        query($owner: String!, $repo: String!, $after: String) {
            repository(owner: $owner, name: $repo) {
                pullRequests(first: 50, orderBy: { field: UPDATED_AT, direction: DESC }, after: $after) {
                    pageInfo {
                        hasNextPage
                        endCursor
                    }
                    nodes {
                        author { login }
                        updatedAt
                        merged
                    }
                }
            }
        }
    "#,
    connection: "pullRequests",
};

/// Which discussion activity is counted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscussionScope {
    /// Top-level comments only
    CommentsOnly,
    /// Top-level comments plus the replies nested under them
    CommentsAndReplies,
}

impl DiscussionScope {
    fn query(self) -> &'static PagedQuery {
        match self {
            DiscussionScope::CommentsOnly => &DISCUSSION_COMMENTS_QUERY,
            DiscussionScope::CommentsAndReplies => &DISCUSSION_REPLIES_QUERY,
        }
    }
}

/// Walk discussions (most recently updated first) and emit one login per
/// qualifying comment or reply.
pub async fn collect_discussion_logins(
    runner: &PaginatedQueryRunner<'_>,
    repository: &RepositoryRef,
    scope: DiscussionScope,
    window: &RecencyWindow,
) -> Result<Vec<String>, FetchError> {
    let mut logins = Vec::new();

    runner
        .run(scope.query(), repository, |discussion: Discussion| {
            if !window.contains(discussion.updated_at) {
                return ControlFlow::Break(());
            }
            collect_from_discussion(&discussion, window, &mut logins);
            ControlFlow::Continue(())
        })
        .await?;

    log::info!(
        "💬 Collected {} discussion contributions for {}",
        logins.len(),
        repository
    );

    Ok(logins)
}

fn collect_from_discussion(discussion: &Discussion, window: &RecencyWindow, logins: &mut Vec<String>) {
    let founder = discussion.author_login();
    let is_self_reply = |login: &str| founder == Some(login);

    for comment in &discussion.comments.nodes {
        let Some(author) = &comment.author else {
            continue;
        };
        if is_self_reply(&author.login) {
            continue;
        }
        // A discussion can be bumped by new activity on an old comment
        if !window.contains(comment.created_at) {
            continue;
        }
        logins.push(author.login.clone());

        // Replies are compared against the discussion founder, not the comment author
        for reply in &comment.replies.nodes {
            match &reply.author {
                Some(reply_author) if !is_self_reply(&reply_author.login) => {
                    logins.push(reply_author.login.clone());
                }
                _ => {}
            }
        }
    }
}

/// Walk pull requests (most recently updated first) and emit the author of
/// every merged one inside the window. Bot accounts are still included here.
pub async fn collect_merged_pull_request_logins(
    runner: &PaginatedQueryRunner<'_>,
    repository: &RepositoryRef,
    window: &RecencyWindow,
) -> Result<Vec<String>, FetchError> {
    let mut logins = Vec::new();

    runner
        .run(&PULL_REQUESTS_QUERY, repository, |pr: PullRequest| {
            let author = match pr.author {
                Some(author) if pr.merged => author,
                _ => return ControlFlow::Continue(()),
            };
            if !window.contains(pr.updated_at) {
                return ControlFlow::Break(());
            }
            logins.push(author.login);
            ControlFlow::Continue(())
        })
        .await?;

    log::info!(
        "🔀 Collected {} merged pull requests for {}",
        logins.len(),
        repository
    );

    Ok(logins)
}

/// Remove automation accounts from a collected login sequence
pub fn exclude_bots(logins: Vec<String>) -> Vec<String> {
    logins
        .into_iter()
        .filter(|login| login != DEPENDENCY_BOT_LOGIN)
        .collect()
}
