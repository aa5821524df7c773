//! Forgets rate limiter entries for clients that have gone quiet.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::scheduler::Job;
use crate::middleware::RateLimiterState;

pub struct RateLimitCleanupJob {
    limiter: Arc<RateLimiterState>,
    period: Duration,
}

impl RateLimitCleanupJob {
    pub fn new(limiter: Arc<RateLimiterState>, period: Duration) -> Self {
        Self { limiter, period }
    }
}

#[async_trait::async_trait]
impl Job for RateLimitCleanupJob {
    fn name(&self) -> &'static str {
        "rate_limit_cleanup"
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn execute(&self) -> Result<(), String> {
        let remaining = self.limiter.retain_recent();
        debug!(tracked_clients = remaining, "Rate limiter pruned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_keeps_limited_clients() {
        let limiter = Arc::new(RateLimiterState::new(1).unwrap());
        assert!(limiter.check("203.0.113.9").is_ok());

        let job = RateLimitCleanupJob::new(limiter.clone(), Duration::from_secs(60));
        assert!(job.execute().await.is_ok());
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
