//! Background maintenance jobs.

mod rate_limit_cleanup;
mod scheduler;
mod session_cleanup;

pub use rate_limit_cleanup::RateLimitCleanupJob;
pub use scheduler::{Job, JobScheduler};
pub use session_cleanup::SessionCleanupJob;

use std::time::Duration;

use crate::app::AppState;

/// Scheduler with the jobs `state` needs, not yet started.
pub fn maintenance_jobs(state: &AppState) -> JobScheduler {
    let period = Duration::from_secs(state.config.security.cleanup_interval_secs.max(1));
    let mut scheduler = JobScheduler::new();

    scheduler.register(SessionCleanupJob::new(state.identity.clone(), period));
    if let Some(limiter) = &state.rate_limiter {
        scheduler.register(RateLimitCleanupJob::new(limiter.clone(), period));
    }
    scheduler
}
