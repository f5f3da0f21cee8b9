use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Pacing policy applied between consecutive page requests
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn wait(&self);
}

/// Sleeps a fixed amount of time before every follow-up page
#[derive(Clone, Copy, Debug)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn wait(&self) {
        if !self.0.is_zero() {
            sleep(self.0).await;
        }
    }
}

/// No pacing at all
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

#[async_trait]
impl RateLimiter for NoDelay {
    async fn wait(&self) {}
}
