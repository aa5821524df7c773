//! Prunes session slots that outlived their token.

use domain::services::IdentityService;
use std::time::Duration;

use super::scheduler::Job;

pub struct SessionCleanupJob {
    identity: IdentityService,
    period: Duration,
}

impl SessionCleanupJob {
    pub fn new(identity: IdentityService, period: Duration) -> Self {
        Self { identity, period }
    }
}

#[async_trait::async_trait]
impl Job for SessionCleanupJob {
    fn name(&self) -> &'static str {
        "session_cleanup"
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn execute(&self) -> Result<(), String> {
        self.identity
            .prune_expired_sessions()
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
