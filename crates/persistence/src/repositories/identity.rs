//! Identity repository for database operations.

use async_trait::async_trait;
use domain::models::{
    ApprovalStatus, Identity, NewIdentity, ProfileUpdate, Role, StoredCredentials,
};
use domain::repositories::{IdentityRepository, RepoResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::entities::{ApprovalStatusDb, IdentityEntity, RequestedRoleDb, RoleDb};
use crate::metrics::QueryTimer;

/// Repository for identity-related database operations.
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    /// Creates a new PgIdentityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Inserts an identity inside an existing connection or transaction.
pub(crate) async fn insert_identity<'e, E>(
    executor: E,
    identity: &NewIdentity,
) -> Result<IdentityEntity, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, IdentityEntity>(
        r#"
        INSERT INTO identities (id, email, password_hash, first_name, last_name, role, phone,
                                member_id, approval_status, requested_role, university,
                                department, position, specialization, directory_visible)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING id, email, password_hash, first_name, last_name, role, phone, member_id,
                  approval_status, requested_role, university, department, position,
                  specialization, directory_visible, is_active, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&identity.email)
    .bind(&identity.password_hash)
    .bind(&identity.first_name)
    .bind(&identity.last_name)
    .bind(RoleDb::from(identity.role))
    .bind(&identity.phone)
    .bind(&identity.member_id)
    .bind(identity.approval_status.map(ApprovalStatusDb::from))
    .bind(identity.requested_role.map(RequestedRoleDb::from))
    .bind(&identity.university)
    .bind(&identity.department)
    .bind(&identity.position)
    .bind(&identity.specialization)
    .bind(identity.directory_visible)
    .fetch_one(executor)
    .await
}

#[async_trait]
impl IdentityRepository for PgIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Identity>> {
        let timer = QueryTimer::new("find_identity_by_id");
        let result = sqlx::query_as::<_, IdentityEntity>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, role, phone, member_id,
                   approval_status, requested_role, university, department, position,
                   specialization, directory_visible, is_active, created_at, updated_at
            FROM identities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn find_credentials(&self, email: &str) -> RepoResult<Option<StoredCredentials>> {
        let timer = QueryTimer::new("find_identity_credentials");
        let result = sqlx::query_as::<_, IdentityEntity>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, role, phone, member_id,
                   approval_status, requested_role, university, department, position,
                   specialization, directory_visible, is_active, created_at, updated_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn create(&self, identity: NewIdentity) -> RepoResult<Identity> {
        let timer = QueryTimer::new("create_identity");
        let result = insert_identity(&self.pool, &identity).await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.into())
    }

    async fn list(&self) -> RepoResult<Vec<Identity>> {
        let timer = QueryTimer::new("list_identities");
        let result = sqlx::query_as::<_, IdentityEntity>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, role, phone, member_id,
                   approval_status, requested_role, university, department, position,
                   specialization, directory_visible, is_active, created_at, updated_at
            FROM identities
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

    async fn update_approval(
        &self,
        id: Uuid,
        role: Option<Role>,
        status: ApprovalStatus,
    ) -> RepoResult<Option<Identity>> {
        let timer = QueryTimer::new("update_identity_approval");
        let result = sqlx::query_as::<_, IdentityEntity>(
            r#"
            UPDATE identities
            SET role = COALESCE($2, role),
                approval_status = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, role, phone, member_id,
                      approval_status, requested_role, university, department, position,
                      specialization, directory_visible, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role.map(RoleDb::from))
        .bind(ApprovalStatusDb::from(status))
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        profile: ProfileUpdate,
    ) -> RepoResult<Option<Identity>> {
        let timer = QueryTimer::new("update_identity_profile");
        let result = sqlx::query_as::<_, IdentityEntity>(
            r#"
            UPDATE identities
            SET first_name = $2,
                last_name = $3,
                phone = $4,
                university = $5,
                department = $6,
                position = $7,
                specialization = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, role, phone, member_id,
                      approval_status, requested_role, university, department, position,
                      specialization, directory_visible, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.university)
        .bind(&profile.department)
        .bind(&profile.position)
        .bind(&profile.specialization)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> RepoResult<Option<Identity>> {
        let timer = QueryTimer::new("set_identity_active");
        let result = sqlx::query_as::<_, IdentityEntity>(
            r#"
            UPDATE identities
            SET is_active = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, role, phone, member_id,
                      approval_status, requested_role, university, department, position,
                      specialization, directory_visible, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }
}
