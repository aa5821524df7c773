//! Identity domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use std::str::FromStr;

use super::role::{ApprovalStatus, ParseVariantError, RequestedRole, Role};

/// A user of the portal, authenticated or prospective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub member_id: Option<String>,
    pub approval_status: Option<ApprovalStatus>,
    pub requested_role: Option<RequestedRole>,
    pub university: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub specialization: Option<String>,
    /// Listed in the member directory for non-admin viewers.
    pub directory_visible: bool,
    /// Inactive identities cannot log in.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Snapshot stored in the session slot and exposed to clients.
    pub fn session_view(&self) -> SessionIdentity {
        SessionIdentity {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            phone: self.phone.clone(),
            member_id: self.member_id.clone(),
            approval_status: self.approval_status,
            requested_role: self.requested_role,
        }
    }
}

/// The identity object held by a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_role: Option<RequestedRole>,
}

/// Data needed to create an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub member_id: Option<String>,
    pub approval_status: Option<ApprovalStatus>,
    pub requested_role: Option<RequestedRole>,
    pub university: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub specialization: Option<String>,
    pub directory_visible: bool,
}

/// An identity together with its stored password hash. Never serialized.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub identity: Identity,
    pub password_hash: String,
}

/// Registration submission payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_password_confirmation"))]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 100, message = "First name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub first_name: String,

    #[validate(
        length(min = 1, max = 100, message = "Last name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub confirm_password: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(custom(function = "shared::validation::validate_member_id"))]
    pub member_id: Option<String>,

    #[validate(custom(function = "shared::validation::validate_requested_role"))]
    pub requested_role: String,

    #[validate(length(max = 200, message = "University must be at most 200 characters"))]
    pub university: Option<String>,

    #[validate(length(max = 200, message = "Department must be at most 200 characters"))]
    pub department: Option<String>,

    #[validate(length(max = 200, message = "Position must be at most 200 characters"))]
    pub position: Option<String>,

    #[validate(length(max = 200, message = "Specialization must be at most 200 characters"))]
    pub specialization: Option<String>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub request_notes: Option<String>,
}

fn validate_password_confirmation(request: &RegisterRequest) -> Result<(), ValidationError> {
    match &request.confirm_password {
        Some(confirm) if confirm != &request.password => {
            let mut err = ValidationError::new("password_mismatch");
            err.message = Some("Passwords do not match".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Login payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Own-profile edit. Email, role and approval state are not editable here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 100, message = "First name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub first_name: String,

    #[validate(
        length(min = 1, max = 100, message = "Last name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub last_name: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 200, message = "University must be at most 200 characters"))]
    pub university: Option<String>,

    #[validate(length(max = 200, message = "Department must be at most 200 characters"))]
    pub department: Option<String>,

    #[validate(length(max = 200, message = "Position must be at most 200 characters"))]
    pub position: Option<String>,

    #[validate(length(max = 200, message = "Specialization must be at most 200 characters"))]
    pub specialization: Option<String>,
}

/// Normalized profile fields written by a profile edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub university: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub specialization: Option<String>,
}

/// Body of the user activation toggle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub request_id: Uuid,
    pub user: SessionIdentity,
}

/// Account state filter of the user management list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Active,
    Inactive,
}

impl FromStr for ActivityStatus {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ActivityStatus::Active),
            "inactive" => Ok(ActivityStatus::Inactive),
            _ => Err(ParseVariantError {
                kind: "account status",
                value: s.to_string(),
            }),
        }
    }
}

/// Filter for the user management list.
#[derive(Debug, Clone, Default)]
pub struct IdentityFilter {
    pub role: Option<Role>,
    pub status: Option<ActivityStatus>,
    pub search: Option<String>,
}

impl IdentityFilter {
    pub fn matches(&self, identity: &Identity) -> bool {
        if let Some(role) = self.role {
            if identity.role != role {
                return false;
            }
        }
        match self.status {
            Some(ActivityStatus::Active) if !identity.is_active => return false,
            Some(ActivityStatus::Inactive) if identity.is_active => return false,
            _ => {}
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                [
                    Some(identity.first_name.as_str()),
                    Some(identity.last_name.as_str()),
                    Some(identity.email.as_str()),
                    identity.university.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }
}

/// Query string accepted by the user management list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub role: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Counts shown in user management.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityStats {
    pub total: usize,
    pub admins: usize,
    pub editors: usize,
    pub members: usize,
    pub visitors: usize,
    pub pending_approvals: usize,
    /// Active identities holding the member role.
    pub active_members: usize,
    pub inactive: usize,
}

impl IdentityStats {
    pub fn from_identities(identities: &[Identity]) -> Self {
        identities.iter().fold(Self::default(), |mut stats, identity| {
            stats.total += 1;
            match identity.role {
                Role::Admin => stats.admins += 1,
                Role::Editor => stats.editors += 1,
                Role::Member => stats.members += 1,
                Role::Visitor => stats.visitors += 1,
            }
            if identity.approval_status == Some(ApprovalStatus::Pending) {
                stats.pending_approvals += 1;
            }
            if !identity.is_active {
                stats.inactive += 1;
            } else if identity.role == Role::Member {
                stats.active_members += 1;
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::parse_filter;
    use serde_json::json;

    fn identity(first: &str, last: &str, email: &str, role: Role) -> Identity {
        let now = Utc::now();
        Identity {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role,
            phone: None,
            member_id: None,
            approval_status: None,
            requested_role: None,
            university: None,
            department: None,
            position: None,
            specialization: None,
            directory_visible: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn register_payload() -> serde_json::Value {
        json!({
            "firstName": "Amina",
            "lastName": "Benali",
            "email": "amina@example.org",
            "password": "secret1",
            "confirmPassword": "secret1",
            "requestedRole": "member",
            "university": "A University"
        })
    }

    #[test]
    fn test_register_request_valid() {
        let request: RegisterRequest = serde_json::from_value(register_payload()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.university.as_deref(), Some("A University"));
    }

    #[test]
    fn test_register_request_short_password() {
        let mut payload = register_payload();
        payload["password"] = json!("12345");
        payload["confirmPassword"] = json!("12345");
        let request: RegisterRequest = serde_json::from_value(payload).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_request_password_mismatch() {
        let mut payload = register_payload();
        payload["confirmPassword"] = json!("secret2");
        let request: RegisterRequest = serde_json::from_value(payload).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_confirmation_optional() {
        let mut payload = register_payload();
        payload.as_object_mut().unwrap().remove("confirmPassword");
        let request: RegisterRequest = serde_json::from_value(payload).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let mut payload = register_payload();
        payload["email"] = json!("not-an-email");
        let request: RegisterRequest = serde_json::from_value(payload).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_request_rejects_admin_role() {
        let mut payload = register_payload();
        payload["requestedRole"] = json!("admin");
        let request: RegisterRequest = serde_json::from_value(payload).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("requested_role"));
    }

    #[test]
    fn test_register_request_blank_name() {
        let mut payload = register_payload();
        payload["firstName"] = json!("   ");
        let request: RegisterRequest = serde_json::from_value(payload).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }

    #[test]
    fn test_login_request_requires_password() {
        let request = LoginRequest {
            email: "admin@example.org".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_session_identity_serialization() {
        let mut record = identity("Amina", "Benali", "amina@example.org", Role::Visitor);
        record.approval_status = Some(ApprovalStatus::Pending);
        record.requested_role = Some(RequestedRole::Editor);

        let value = serde_json::to_value(record.session_view()).unwrap();
        assert_eq!(value["firstName"], "Amina");
        assert_eq!(value["role"], "visitor");
        assert_eq!(value["approvalStatus"], "pending");
        assert_eq!(value["requestedRole"], "editor");
        assert!(value.get("phone").is_none());
    }

    #[test]
    fn test_identity_filter_search_fields() {
        let mut record = identity("Karim", "Haddad", "karim@example.org", Role::Member);
        record.university = Some("B College".to_string());

        let by_university = IdentityFilter {
            search: Some("college".to_string()),
            ..Default::default()
        };
        assert!(by_university.matches(&record));

        let by_email = IdentityFilter {
            role: Some(Role::Member),
            search: Some("KARIM@".to_string()),
            ..Default::default()
        };
        assert!(by_email.matches(&record));

        let wrong_role = IdentityFilter {
            role: Some(Role::Editor),
            ..Default::default()
        };
        assert!(!wrong_role.matches(&record));
    }

    #[test]
    fn test_identity_filter_status() {
        let active = identity("Karim", "Haddad", "karim@example.org", Role::Member);
        let mut inactive = identity("Sara", "Idrissi", "sara@example.org", Role::Member);
        inactive.is_active = false;

        let only_active = IdentityFilter {
            status: Some(ActivityStatus::Active),
            ..Default::default()
        };
        assert!(only_active.matches(&active));
        assert!(!only_active.matches(&inactive));

        let only_inactive = IdentityFilter {
            status: Some(ActivityStatus::Inactive),
            ..Default::default()
        };
        assert!(!only_inactive.matches(&active));
        assert!(only_inactive.matches(&inactive));

        assert_eq!(
            parse_filter::<ActivityStatus>(Some("all")).unwrap(),
            None
        );
        assert!(parse_filter::<ActivityStatus>(Some("suspended")).is_err());
    }

    #[test]
    fn test_update_profile_request_rules() {
        let valid: UpdateProfileRequest = serde_json::from_value(json!({
            "firstName": "Amina",
            "lastName": "Benali",
            "phone": "(555) 123-4567",
            "position": "Professor"
        }))
        .unwrap();
        assert!(valid.validate().is_ok());

        let blank: UpdateProfileRequest = serde_json::from_value(json!({
            "firstName": " ",
            "lastName": "Benali",
            "phone": "call me"
        }))
        .unwrap();
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_identity_stats() {
        let mut pending = identity("A", "B", "a@example.org", Role::Visitor);
        pending.approval_status = Some(ApprovalStatus::Pending);
        let mut dormant = identity("M", "N", "m@example.org", Role::Member);
        dormant.is_active = false;
        let identities = vec![
            identity("Root", "Admin", "admin@example.org", Role::Admin),
            identity("E", "D", "e@example.org", Role::Editor),
            identity("K", "H", "k@example.org", Role::Member),
            dormant,
            pending,
        ];

        let stats = IdentityStats::from_identities(&identities);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.admins, 1);
        assert_eq!(stats.editors, 1);
        assert_eq!(stats.members, 2);
        assert_eq!(stats.visitors, 1);
        assert_eq!(stats.pending_approvals, 1);
        assert_eq!(stats.active_members, 1);
        assert_eq!(stats.inactive, 1);
    }
}
