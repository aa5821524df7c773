//! Registration request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ApplicantProfile, RegistrationRequest};
use sqlx::FromRow;
use uuid::Uuid;

use super::identity::{ApprovalStatusDb, RequestedRoleDb};

/// Database row mapping for the registration_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRequestEntity {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub member_id: Option<String>,
    pub university: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub specialization: Option<String>,
    pub requested_role: RequestedRoleDb,
    pub request_notes: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub status: ApprovalStatusDb,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub decided_by: Option<Uuid>,
    pub decided_by_email: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl From<RegistrationRequestEntity> for RegistrationRequest {
    fn from(entity: RegistrationRequestEntity) -> Self {
        Self {
            id: entity.id,
            identity_id: entity.identity_id,
            profile: ApplicantProfile {
                first_name: entity.first_name,
                last_name: entity.last_name,
                email: entity.email,
                phone: entity.phone,
                member_id: entity.member_id,
                university: entity.university,
                department: entity.department,
                position: entity.position,
                specialization: entity.specialization,
            },
            requested_role: entity.requested_role.into(),
            request_notes: entity.request_notes,
            requested_at: entity.requested_at,
            status: entity.status.into(),
            admin_notes: entity.admin_notes,
            rejection_reason: entity.rejection_reason,
            decided_by: entity.decided_by,
            decided_by_email: entity.decided_by_email,
            decided_at: entity.decided_at,
        }
    }
}
