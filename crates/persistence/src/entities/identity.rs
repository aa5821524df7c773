//! Identity entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ApprovalStatus, Identity, RequestedRole, Role, StoredCredentials};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for identity roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum RoleDb {
    Admin,
    Editor,
    Member,
    Visitor,
}

impl From<Role> for RoleDb {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => RoleDb::Admin,
            Role::Editor => RoleDb::Editor,
            Role::Member => RoleDb::Member,
            Role::Visitor => RoleDb::Visitor,
        }
    }
}

impl From<RoleDb> for Role {
    fn from(role: RoleDb) -> Self {
        match role {
            RoleDb::Admin => Role::Admin,
            RoleDb::Editor => Role::Editor,
            RoleDb::Member => Role::Member,
            RoleDb::Visitor => Role::Visitor,
        }
    }
}

/// Database enum shared by identities and registration requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "approval_status", rename_all = "lowercase")]
pub enum ApprovalStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<ApprovalStatus> for ApprovalStatusDb {
    fn from(status: ApprovalStatus) -> Self {
        match status {
            ApprovalStatus::Pending => ApprovalStatusDb::Pending,
            ApprovalStatus::Approved => ApprovalStatusDb::Approved,
            ApprovalStatus::Rejected => ApprovalStatusDb::Rejected,
        }
    }
}

impl From<ApprovalStatusDb> for ApprovalStatus {
    fn from(status: ApprovalStatusDb) -> Self {
        match status {
            ApprovalStatusDb::Pending => ApprovalStatus::Pending,
            ApprovalStatusDb::Approved => ApprovalStatus::Approved,
            ApprovalStatusDb::Rejected => ApprovalStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "requested_role", rename_all = "lowercase")]
pub enum RequestedRoleDb {
    Editor,
    Member,
}

impl From<RequestedRole> for RequestedRoleDb {
    fn from(role: RequestedRole) -> Self {
        match role {
            RequestedRole::Editor => RequestedRoleDb::Editor,
            RequestedRole::Member => RequestedRoleDb::Member,
        }
    }
}

impl From<RequestedRoleDb> for RequestedRole {
    fn from(role: RequestedRoleDb) -> Self {
        match role {
            RequestedRoleDb::Editor => RequestedRole::Editor,
            RequestedRoleDb::Member => RequestedRole::Member,
        }
    }
}

/// Database row mapping for the identities table.
#[derive(Debug, Clone, FromRow)]
pub struct IdentityEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: RoleDb,
    pub phone: Option<String>,
    pub member_id: Option<String>,
    pub approval_status: Option<ApprovalStatusDb>,
    pub requested_role: Option<RequestedRoleDb>,
    pub university: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub specialization: Option<String>,
    pub directory_visible: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IdentityEntity> for Identity {
    fn from(entity: IdentityEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            role: entity.role.into(),
            phone: entity.phone,
            member_id: entity.member_id,
            approval_status: entity.approval_status.map(Into::into),
            requested_role: entity.requested_role.map(Into::into),
            university: entity.university,
            department: entity.department,
            position: entity.position,
            specialization: entity.specialization,
            directory_visible: entity.directory_visible,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<IdentityEntity> for StoredCredentials {
    fn from(mut entity: IdentityEntity) -> Self {
        let password_hash = std::mem::take(&mut entity.password_hash);
        Self {
            identity: entity.into(),
            password_hash,
        }
    }
}
