//! Identity and session service: login, registration, logout.
//!
//! Sessions are explicit: every operation takes the session id it acts on.
//! The service also consumes approval events to update identities.

use async_trait::async_trait;
use chrono::Duration;
use shared::password::{hash_password, verify_password};
use shared::validation::normalize_optional;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::approval::ApprovalEventListener;
use crate::errors::{DomainError, DomainResult, RepositoryError};
use crate::models::{
    ApplicantProfile, ApprovalEvent, ApprovalStatus, Identity, LoginRequest, NewIdentity,
    NewRegistrationRequest, ParseVariantError, ProfileUpdate, RegisterRequest,
    RegistrationReceipt, RequestedRole, Role, SessionIdentity, UpdateProfileRequest,
};
use crate::repositories::{IdentityRepository, RegistrationRequestRepository, SessionStore};

/// How long a session slot lives unless configured otherwise.
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 3600;

#[derive(Clone)]
pub struct IdentityService {
    identities: Arc<dyn IdentityRepository>,
    registrations: Arc<dyn RegistrationRequestRepository>,
    sessions: Arc<dyn SessionStore>,
    session_lifetime: Duration,
}

impl IdentityService {
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        registrations: Arc<dyn RegistrationRequestRepository>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            identities,
            registrations,
            sessions,
            session_lifetime: Duration::seconds(DEFAULT_SESSION_LIFETIME_SECS),
        }
    }

    /// Slots older than `lifetime` are treated as logged out.
    pub fn with_session_lifetime(mut self, lifetime: Duration) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    /// Checks credentials and, on success, stores the identity in `session_id`'s slot.
    ///
    /// Unknown email and wrong password yield the same [`DomainError::Authentication`],
    /// and a failed attempt writes nothing.
    pub async fn login(
        &self,
        session_id: Uuid,
        request: LoginRequest,
    ) -> DomainResult<SessionIdentity> {
        request.validate()?;

        let Some(stored) = self.identities.find_credentials(&request.email).await? else {
            warn!("Login rejected: invalid credentials");
            return Err(DomainError::Authentication);
        };

        if !verify_password(&request.password, &stored.password_hash)? {
            warn!(identity_id = %stored.identity.id, "Login rejected: invalid credentials");
            return Err(DomainError::Authentication);
        }

        if !stored.identity.is_active {
            warn!(identity_id = %stored.identity.id, "Login rejected: account inactive");
            return Err(DomainError::Authentication);
        }

        let session = stored.identity.session_view();
        self.sessions.save(session_id, &session).await?;

        info!(
            identity_id = %session.id,
            session_id = %session_id,
            role = %session.role,
            "Login succeeded"
        );
        Ok(session)
    }

    /// Creates a `visitor` identity with approval `pending` and its registration request.
    ///
    /// Does not open a session.
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<RegistrationReceipt> {
        request.validate()?;

        let requested_role: RequestedRole = request
            .requested_role
            .parse()
            .map_err(|e: ParseVariantError| DomainError::Validation(e.to_string()))?;
        let password_hash = hash_password(&request.password)?;

        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let email = request.email.trim().to_string();
        let profile = ApplicantProfile {
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            email: email.clone(),
            phone: normalize_optional(request.phone),
            member_id: normalize_optional(request.member_id),
            university: normalize_optional(request.university),
            department: normalize_optional(request.department),
            position: normalize_optional(request.position),
            specialization: normalize_optional(request.specialization),
        };

        let identity = NewIdentity {
            email,
            password_hash,
            first_name,
            last_name,
            role: Role::Visitor,
            phone: profile.phone.clone(),
            member_id: profile.member_id.clone(),
            approval_status: Some(ApprovalStatus::Pending),
            requested_role: Some(requested_role),
            university: profile.university.clone(),
            department: profile.department.clone(),
            position: profile.position.clone(),
            specialization: profile.specialization.clone(),
            directory_visible: true,
        };
        let registration = NewRegistrationRequest {
            profile,
            requested_role,
            request_notes: normalize_optional(request.request_notes),
        };

        let (identity, registration) = self
            .registrations
            .create_with_identity(identity, registration)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    DomainError::Conflict("Email already registered".to_string())
                }
                other => DomainError::Repository(other),
            })?;

        info!(
            identity_id = %identity.id,
            registration_id = %registration.id,
            requested_role = %requested_role,
            "Registration request submitted"
        );

        Ok(RegistrationReceipt {
            request_id: registration.id,
            user: identity.session_view(),
        })
    }

    /// The identity held by `session_id`, or `Unauthenticated` if the slot is empty.
    pub async fn current(&self, session_id: Uuid) -> DomainResult<SessionIdentity> {
        self.sessions
            .load(session_id, self.session_lifetime)
            .await?
            .ok_or(DomainError::Unauthenticated)
    }

    /// Clears the session slot. Idempotent.
    pub async fn logout(&self, session_id: Uuid) -> DomainResult<()> {
        self.sessions.clear(session_id).await?;
        info!(session_id = %session_id, "Session cleared");
        Ok(())
    }

    /// Removes expired session slots.
    pub async fn prune_expired_sessions(&self) -> DomainResult<u64> {
        let removed = self.sessions.prune_expired(self.session_lifetime).await?;
        if removed > 0 {
            info!(removed, "Expired sessions pruned");
        }
        Ok(removed)
    }

    /// Full stored profile of the session's identity.
    pub async fn profile(&self, session_id: Uuid) -> DomainResult<Identity> {
        let session = self.current(session_id).await?;
        self.identities
            .find_by_id(session.id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Identity not found".to_string()))
    }

    /// Edits the session identity's own profile.
    ///
    /// The session snapshot picks up the new names and phone; role and approval
    /// state in the snapshot stay as they were at login.
    pub async fn update_profile(
        &self,
        session_id: Uuid,
        request: UpdateProfileRequest,
    ) -> DomainResult<Identity> {
        request.validate()?;
        let session = self.current(session_id).await?;

        let update = ProfileUpdate {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            phone: normalize_optional(request.phone),
            university: normalize_optional(request.university),
            department: normalize_optional(request.department),
            position: normalize_optional(request.position),
            specialization: normalize_optional(request.specialization),
        };
        let identity = self
            .identities
            .update_profile(session.id, update)
            .await?
            .ok_or_else(|| DomainError::NotFound("Identity not found".to_string()))?;

        let refreshed = SessionIdentity {
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            phone: identity.phone.clone(),
            ..session
        };
        self.sessions.save(session_id, &refreshed).await?;

        info!(identity_id = %identity.id, "Profile updated");
        Ok(identity)
    }

    /// Activates or deactivates an identity. Deactivation ends its open sessions.
    ///
    /// An admin cannot deactivate their own identity.
    pub async fn set_active(
        &self,
        actor: &SessionIdentity,
        identity_id: Uuid,
        active: bool,
    ) -> DomainResult<Identity> {
        if !active && actor.id == identity_id {
            return Err(DomainError::Validation(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let identity = self
            .identities
            .set_active(identity_id, active)
            .await?
            .ok_or_else(|| DomainError::NotFound("Identity not found".to_string()))?;

        let ended = if active {
            0
        } else {
            self.sessions.clear_identity(identity_id).await?
        };

        info!(
            identity_id = %identity_id,
            active,
            ended_sessions = ended,
            changed_by = %actor.id,
            "Identity activity changed"
        );
        Ok(identity)
    }

    /// Creates an approved admin unless an identity with `email` already exists.
    ///
    /// Returns the new identity, or `None` when nothing was created.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> DomainResult<Option<Identity>> {
        if self.identities.find_credentials(email).await?.is_some() {
            return Ok(None);
        }

        let identity = NewIdentity {
            email: email.to_string(),
            password_hash: hash_password(password)?,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role: Role::Admin,
            phone: None,
            member_id: None,
            approval_status: Some(ApprovalStatus::Approved),
            requested_role: None,
            university: None,
            department: None,
            position: None,
            specialization: None,
            directory_visible: false,
        };

        Ok(Some(self.identities.create(identity).await?))
    }
}

#[async_trait]
impl ApprovalEventListener for IdentityService {
    async fn on_approval_event(&self, event: &ApprovalEvent) -> DomainResult<()> {
        let updated = match event {
            ApprovalEvent::Approved {
                identity_id,
                new_role,
            } => {
                self.identities
                    .update_approval(*identity_id, Some(*new_role), ApprovalStatus::Approved)
                    .await?
            }
            ApprovalEvent::Rejected { identity_id, .. } => {
                self.identities
                    .update_approval(*identity_id, None, ApprovalStatus::Rejected)
                    .await?
            }
        };

        match updated {
            Some(identity) => {
                info!(
                    identity_id = %identity.id,
                    role = %identity.role,
                    "Identity updated from approval decision"
                );
                Ok(())
            }
            None => Err(DomainError::NotFound("Identity not found".to_string())),
        }
    }
}
