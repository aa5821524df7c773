//! Registration request models for the approval workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::role::{parse_filter, ApprovalStatus, ParseVariantError, RequestedRole, Role};

/// Profile fields copied from the applicant at submission time.
///
/// This is a denormalized copy for display; it is not kept in sync with the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub member_id: Option<String>,
    pub university: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub specialization: Option<String>,
}

/// A request to join the union with a given role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub id: Uuid,
    pub identity_id: Uuid,
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    pub requested_role: RequestedRole,
    pub request_notes: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub status: ApprovalStatus,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub decided_by: Option<Uuid>,
    pub decided_by_email: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// Data needed to create a registration request. The identity id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewRegistrationRequest {
    pub profile: ApplicantProfile,
    pub requested_role: RequestedRole,
    pub request_notes: Option<String>,
}

/// A terminal decision as written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub status: ApprovalStatus,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub decided_by: Uuid,
    pub decided_by_email: String,
    pub decided_at: DateTime<Utc>,
}

/// Result of the atomic check-and-set performed by storage.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    Applied(RegistrationRequest),
    NotFound,
    /// The request had already left `pending`; nothing was written.
    AlreadyDecided(ApprovalStatus),
}

/// Event emitted after a decision, consumed by the identity side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ApprovalEvent {
    #[serde(rename_all = "camelCase")]
    Approved { identity_id: Uuid, new_role: Role },
    #[serde(rename_all = "camelCase")]
    Rejected { identity_id: Uuid, reason: String },
}

impl ApprovalEvent {
    pub fn identity_id(&self) -> Uuid {
        match self {
            ApprovalEvent::Approved { identity_id, .. }
            | ApprovalEvent::Rejected { identity_id, .. } => *identity_id,
        }
    }
}

/// Body of `POST .../:id/approve`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequestBody {
    #[validate(length(max = 2000, message = "Admin notes must be at most 2000 characters"))]
    pub admin_notes: Option<String>,
}

/// Body of `POST .../:id/reject`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequestBody {
    #[validate(
        length(max = 2000, message = "Rejection reason must be at most 2000 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub rejection_reason: String,

    #[validate(length(max = 2000, message = "Admin notes must be at most 2000 characters"))]
    pub admin_notes: Option<String>,
}

/// What an admin decides on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    Approve,
    Reject,
}

/// Decision payload: `{requestId, action, adminNotes?, rejectionReason?}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload {
    pub request_id: Uuid,

    pub action: DecisionAction,

    #[validate(length(max = 2000, message = "Admin notes must be at most 2000 characters"))]
    pub admin_notes: Option<String>,

    #[validate(length(max = 2000, message = "Rejection reason must be at most 2000 characters"))]
    pub rejection_reason: Option<String>,
}

/// Conjunctive filter over registration requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFilter {
    pub status: Option<ApprovalStatus>,
    pub role: Option<RequestedRole>,
    pub search: Option<String>,
}

impl RequestFilter {
    /// Whether `request` satisfies every provided criterion.
    ///
    /// The search term matches case-insensitively against first name, last name,
    /// email and university. A blank term matches everything.
    pub fn matches(&self, request: &RegistrationRequest) -> bool {
        if self.status.is_some_and(|status| request.status != status) {
            return false;
        }
        if self.role.is_some_and(|role| request.requested_role != role) {
            return false;
        }

        let term = match self.search.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(term) => term.to_lowercase(),
        };

        let profile = &request.profile;
        [
            Some(profile.first_name.as_str()),
            Some(profile.last_name.as_str()),
            Some(profile.email.as_str()),
            profile.university.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Query string of the listing endpoint. `all` means no filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsQuery {
    pub status: Option<String>,
    pub role: Option<String>,
    pub search: Option<String>,
}

impl TryFrom<ListRequestsQuery> for RequestFilter {
    type Error = ParseVariantError;

    fn try_from(query: ListRequestsQuery) -> Result<Self, Self::Error> {
        Ok(RequestFilter {
            status: parse_filter(query.status.as_deref())?,
            role: parse_filter(query.role.as_deref())?,
            search: query.search,
        })
    }
}

/// Request counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total: usize,
}

impl RegistrationStats {
    pub fn from_requests(requests: &[RegistrationRequest]) -> Self {
        requests.iter().fold(Self::default(), |mut stats, request| {
            match request.status {
                ApprovalStatus::Pending => stats.pending += 1,
                ApprovalStatus::Approved => stats.approved += 1,
                ApprovalStatus::Rejected => stats.rejected += 1,
            }
            stats.total += 1;
            stats
        })
    }
}
