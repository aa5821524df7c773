//! Session slot entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::SessionIdentity;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub identity: Json<SessionIdentity>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}
