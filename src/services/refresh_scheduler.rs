use std::sync::Arc;
use tokio::time::{sleep, Duration};

use crate::services::leaderboard_service::{LeaderboardService, RefreshOutcome};

pub struct RefreshScheduler {
    service: Arc<LeaderboardService>,
    interval_seconds: u64,
}

impl RefreshScheduler {
    pub fn new(service: Arc<LeaderboardService>, interval_seconds: u64) -> Self {
        Self {
            service,
            interval_seconds,
        }
    }

    /// Start the background scheduler: refresh now, then once per interval
    pub async fn start(self: Arc<Self>) {
        log::info!(
            "Starting leaderboard scheduler (refreshing every {} seconds)",
            self.interval_seconds
        );

        loop {
            self.tick().await;
            sleep(Duration::from_secs(self.interval_seconds)).await;
        }
    }

    /// Run one refresh cycle; errors are logged and the previous data stays published
    pub async fn tick(&self) {
        match self.service.refresh().await {
            Ok(RefreshOutcome::Completed) => log::info!("Leaderboard refresh completed"),
            Ok(RefreshOutcome::AlreadyRunning) => {}
            Err(e) => log::error!("Error in leaderboard scheduler: {}", e),
        }
    }
}
