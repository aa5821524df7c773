//! Database metrics.
//!
//! Every repository query is wrapped in a [`QueryTimer`]; the pool gauges are
//! refreshed by the readiness check.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record how long `query` took.
pub fn record_query_duration(query: &'static str, duration_secs: f64) {
    histogram!("database_query_duration_seconds", "query" => query).record(duration_secs);
}

/// Count a failed query. Row-not-found is not a failure and is not counted.
pub fn record_query_error(query: &'static str) {
    counter!("database_query_errors_total", "query" => query).increment(1);
}

/// Snapshot of the connection pool.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one named query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_identity_by_id");
/// let result = sqlx::query_as::<_, IdentityEntity>(...).fetch_optional(&pool).await;
/// timer.finish(&result);
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time, and an error count if `result` failed.
    pub fn finish<T>(self, result: &Result<T, sqlx::Error>) {
        record_query_duration(self.query, self.start.elapsed().as_secs_f64());
        if result.is_err() {
            record_query_error(self.query);
        }
    }
}
