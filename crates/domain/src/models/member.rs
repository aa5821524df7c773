//! Member directory and dashboard read models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::DocumentStats;
use super::identity::{Identity, IdentityStats};
use super::news::NewsStats;
use super::registration_request::RegistrationStats;
use super::role::Role;

/// One row of the member directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntry {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub member_id: Option<String>,
    pub role: Role,
    pub university: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub specialization: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl From<&Identity> for MemberEntry {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            email: identity.email.clone(),
            phone: identity.phone.clone(),
            member_id: identity.member_id.clone(),
            role: identity.role,
            university: identity.university.clone(),
            department: identity.department.clone(),
            position: identity.position.clone(),
            specialization: identity.specialization.clone(),
            joined_at: identity.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    pub search: Option<String>,
}

impl MemberQuery {
    /// Directory membership plus search. Opted-out and inactive identities are only shown to admins.
    pub fn matches(&self, identity: &Identity, viewer_is_admin: bool) -> bool {
        if !matches!(identity.role, Role::Member | Role::Editor | Role::Admin) {
            return false;
        }
        if !(identity.directory_visible && identity.is_active) && !viewer_is_admin {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                [
                    Some(identity.first_name.as_str()),
                    Some(identity.last_name.as_str()),
                    identity.university.as_deref(),
                    identity.specialization.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub registrations: RegistrationStats,
    pub users: IdentityStats,
    pub documents: DocumentStats,
    pub news: NewsStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(first: &str, role: Role, visible: bool) -> Identity {
        let now = Utc::now();
        Identity {
            id: Uuid::new_v4(),
            email: format!("{}@example.org", first.to_lowercase()),
            first_name: first.to_string(),
            last_name: "Alaoui".to_string(),
            role,
            phone: None,
            member_id: None,
            approval_status: None,
            requested_role: None,
            university: Some("Mohammed V University".to_string()),
            department: None,
            position: None,
            specialization: Some("Computer Science".to_string()),
            directory_visible: visible,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_visitors_are_not_listed() {
        let query = MemberQuery::default();
        assert!(!query.matches(&identity("Pending", Role::Visitor, true), true));
        assert!(query.matches(&identity("Member", Role::Member, true), false));
    }

    #[test]
    fn test_opted_out_hidden_unless_admin() {
        let query = MemberQuery::default();
        let hidden = identity("Hidden", Role::Member, false);
        assert!(!query.matches(&hidden, false));
        assert!(query.matches(&hidden, true));
    }

    #[test]
    fn test_inactive_hidden_unless_admin() {
        let query = MemberQuery::default();
        let mut inactive = identity("Dormant", Role::Member, true);
        inactive.is_active = false;
        assert!(!query.matches(&inactive, false));
        assert!(query.matches(&inactive, true));
    }

    #[test]
    fn test_search_specialization() {
        let query = MemberQuery {
            search: Some("computer".to_string()),
        };
        assert!(query.matches(&identity("Samir", Role::Editor, true), false));

        let miss = MemberQuery {
            search: Some("biology".to_string()),
        };
        assert!(!miss.matches(&identity("Samir", Role::Editor, true), false));
    }

    #[test]
    fn test_entry_from_identity() {
        let record = identity("Samir", Role::Member, true);
        let entry = MemberEntry::from(&record);
        assert_eq!(entry.id, record.id);
        assert_eq!(entry.joined_at, record.created_at);
    }
}
