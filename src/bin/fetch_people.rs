//! One-shot console report of the most active discussion commenters and
//! pull request authors.
//!
//! Requires a GitHub token with `read:org` and `read:user`:
//! `GITHUB_TOKEN=ghp_XXX cargo run --bin fetch_people`

use people_board::models::Leaderboard;
use people_board::services::rate_limit::NoDelay;
use people_board::services::ContributorFetcher;
use people_board::utils::config::{Config, REPORT_DEFAULT_DAYS};
use std::sync::Arc;

/// Commenters below this count are left out of the report
const MIN_COMMENTS: usize = 2;

fn print_section(label: &str, board: &Leaderboard) {
    println!("{}: {}", label, board.len());
    for entry in board.entries() {
        println!("{}: {}", entry.login, entry.count);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env_with_days(REPORT_DEFAULT_DAYS)?;
    let fetcher = ContributorFetcher::from_config(&config, Arc::new(NoDelay))?;

    let comments = fetcher.fetch_comments().await?;
    print_section("COMMENTS", &comments.with_min_count(MIN_COMMENTS));

    let pull_requests = fetcher.fetch_pull_requests().await?;
    print_section("PULL REQUESTS", &pull_requests);

    Ok(())
}
