pub mod github;
pub mod leaderboard;

pub use leaderboard::{Leaderboard, LeaderboardEntry};
