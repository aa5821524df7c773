//! Session slot repository for database operations.

use async_trait::async_trait;
use chrono::Duration;
use domain::models::SessionIdentity;
use domain::repositories::{RepoResult, SessionStore};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::entities::SessionEntity;
use crate::metrics::QueryTimer;

/// Session slots stored as JSONB snapshots of the session identity.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Creates a new PgSessionStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn save(&self, session_id: Uuid, identity: &SessionIdentity) -> RepoResult<()> {
        let timer = QueryTimer::new("save_session");
        let result = sqlx::query(
            r#"
            INSERT INTO sessions (id, identity_id, identity)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET identity_id = EXCLUDED.identity_id,
                identity = EXCLUDED.identity,
                last_seen_at = NOW()
            "#,
        )
        .bind(session_id)
        .bind(identity.id)
        .bind(Json(identity))
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        result.map(|_| ()).map_err(map_sqlx_error)
    }

    async fn load(
        &self,
        session_id: Uuid,
        max_age: Duration,
    ) -> RepoResult<Option<SessionIdentity>> {
        let timer = QueryTimer::new("load_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            UPDATE sessions
            SET last_seen_at = NOW()
            WHERE id = $1
              AND created_at > NOW() - make_interval(secs => $2)
            RETURNING id, identity_id, identity, created_at, last_seen_at
            "#,
        )
        .bind(session_id)
        .bind(interval_secs(max_age))
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result
            .map_err(map_sqlx_error)?
            .map(|entity| entity.identity.0))
    }

    async fn clear(&self, session_id: Uuid) -> RepoResult<()> {
        let timer = QueryTimer::new("clear_session");
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        result.map(|_| ()).map_err(map_sqlx_error)
    }

    async fn clear_identity(&self, identity_id: Uuid) -> RepoResult<u64> {
        let timer = QueryTimer::new("clear_identity_sessions");
        let result = sqlx::query("DELETE FROM sessions WHERE identity_id = $1")
            .bind(identity_id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.rows_affected())
    }

    async fn prune_expired(&self, max_age: Duration) -> RepoResult<u64> {
        let timer = QueryTimer::new("prune_expired_sessions");
        let result = sqlx::query(
            "DELETE FROM sessions WHERE created_at <= NOW() - make_interval(secs => $1)",
        )
        .bind(interval_secs(max_age))
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.rows_affected())
    }
}

/// `make_interval` takes fractional seconds as double precision.
fn interval_secs(max_age: Duration) -> f64 {
    max_age.num_milliseconds() as f64 / 1000.0
}
