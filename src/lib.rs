//! Contributor leaderboards for a GitHub repository: who replied in
//! discussions and whose pull requests were merged within the last N days.

pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;
