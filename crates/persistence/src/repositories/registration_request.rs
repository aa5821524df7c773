//! Registration request repository for database operations.

use async_trait::async_trait;
use domain::models::{
    DecisionOutcome, DecisionRecord, Identity, NewIdentity, NewRegistrationRequest,
    RegistrationRequest,
};
use domain::repositories::{RegistrationRequestRepository, RepoResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::identity::insert_identity;
use super::map_sqlx_error;
use crate::entities::{ApprovalStatusDb, RegistrationRequestEntity, RequestedRoleDb};
use crate::metrics::QueryTimer;

/// Repository for registration request database operations.
#[derive(Clone)]
pub struct PgRegistrationRequestRepository {
    pool: PgPool,
}

impl PgRegistrationRequestRepository {
    /// Creates a new PgRegistrationRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_with_identity(
        &self,
        identity: &NewIdentity,
        request: &NewRegistrationRequest,
    ) -> Result<(Identity, RegistrationRequest), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let identity = insert_identity(&mut *tx, identity).await?;

        let profile = &request.profile;
        let request = sqlx::query_as::<_, RegistrationRequestEntity>(
            r#"
            INSERT INTO registration_requests (id, identity_id, first_name, last_name, email,
                                               phone, member_id, university, department,
                                               position, specialization, requested_role,
                                               request_notes, requested_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, identity_id, first_name, last_name, email, phone, member_id,
                      university, department, position, specialization, requested_role,
                      request_notes, requested_at, status, admin_notes, rejection_reason,
                      decided_by, decided_by_email, decided_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(identity.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.member_id)
        .bind(&profile.university)
        .bind(&profile.department)
        .bind(&profile.position)
        .bind(&profile.specialization)
        .bind(RequestedRoleDb::from(request.requested_role))
        .bind(&request.request_notes)
        .bind(identity.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((identity.into(), request.into()))
    }
}

#[async_trait]
impl RegistrationRequestRepository for PgRegistrationRequestRepository {
    async fn create_with_identity(
        &self,
        identity: NewIdentity,
        request: NewRegistrationRequest,
    ) -> RepoResult<(Identity, RegistrationRequest)> {
        let timer = QueryTimer::new("create_registration_request");
        let result = self.insert_with_identity(&identity, &request).await;
        timer.finish(&result);
        result.map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<RegistrationRequest>> {
        let timer = QueryTimer::new("find_registration_request_by_id");
        let result = sqlx::query_as::<_, RegistrationRequestEntity>(
            r#"
            SELECT id, identity_id, first_name, last_name, email, phone, member_id,
                   university, department, position, specialization, requested_role,
                   request_notes, requested_at, status, admin_notes, rejection_reason,
                   decided_by, decided_by_email, decided_at
            FROM registration_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn list(&self) -> RepoResult<Vec<RegistrationRequest>> {
        let timer = QueryTimer::new("list_registration_requests");
        let result = sqlx::query_as::<_, RegistrationRequestEntity>(
            r#"
            SELECT id, identity_id, first_name, last_name, email, phone, member_id,
                   university, department, position, specialization, requested_role,
                   request_notes, requested_at, status, admin_notes, rejection_reason,
                   decided_by, decided_by_email, decided_at
            FROM registration_requests
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn apply_decision(
        &self,
        id: Uuid,
        decision: DecisionRecord,
    ) -> RepoResult<DecisionOutcome> {
        let timer = QueryTimer::new("apply_registration_decision");

        // The status predicate makes the check-and-set a single statement.
        let updated = sqlx::query_as::<_, RegistrationRequestEntity>(
            r#"
            UPDATE registration_requests
            SET status = $2,
                admin_notes = $3,
                rejection_reason = $4,
                decided_by = $5,
                decided_by_email = $6,
                decided_at = $7
            WHERE id = $1 AND status = 'pending'
            RETURNING id, identity_id, first_name, last_name, email, phone, member_id,
                      university, department, position, specialization, requested_role,
                      request_notes, requested_at, status, admin_notes, rejection_reason,
                      decided_by, decided_by_email, decided_at
            "#,
        )
        .bind(id)
        .bind(ApprovalStatusDb::from(decision.status))
        .bind(&decision.admin_notes)
        .bind(&decision.rejection_reason)
        .bind(decision.decided_by)
        .bind(&decision.decided_by_email)
        .bind(decision.decided_at)
        .fetch_optional(&self.pool)
        .await;

        let result = match updated {
            Ok(Some(entity)) => Ok(DecisionOutcome::Applied(entity.into())),
            Ok(None) => sqlx::query_scalar::<_, ApprovalStatusDb>(
                "SELECT status FROM registration_requests WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|status| match status {
                Some(status) => DecisionOutcome::AlreadyDecided(status.into()),
                None => DecisionOutcome::NotFound,
            }),
            Err(e) => Err(e),
        };
        timer.finish(&result);
        result.map_err(map_sqlx_error)
    }
}
