//! Registration approval workflow.
//!
//! A request moves from `pending` to `approved` or `rejected` exactly once.
//! The pending check and the write happen in one storage primitive, so
//! concurrent deciders on the same request get one winner and one
//! `InvalidState`.

use async_trait::async_trait;
use chrono::Utc;
use shared::validation::normalize_optional;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{DomainError, DomainResult};
use crate::models::{
    ApprovalEvent, ApprovalStatus, DecisionAction, DecisionOutcome, DecisionPayload,
    DecisionRecord, RegistrationRequest, RegistrationStats, RequestFilter, Role,
    SessionIdentity,
};
use crate::repositories::RegistrationRequestRepository;

/// Consumer of approval events (the identity side).
#[async_trait]
pub trait ApprovalEventListener: Send + Sync {
    async fn on_approval_event(&self, event: &ApprovalEvent) -> DomainResult<()>;
}

/// A recorded decision and the event it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub request: RegistrationRequest,
    pub event: ApprovalEvent,
}

#[derive(Clone)]
pub struct ApprovalWorkflow {
    requests: Arc<dyn RegistrationRequestRepository>,
    listener: Arc<dyn ApprovalEventListener>,
}

impl ApprovalWorkflow {
    pub fn new(
        requests: Arc<dyn RegistrationRequestRepository>,
        listener: Arc<dyn ApprovalEventListener>,
    ) -> Self {
        Self { requests, listener }
    }

    /// Requests matching `filter`, in insertion order.
    pub async fn list(&self, filter: &RequestFilter) -> DomainResult<Vec<RegistrationRequest>> {
        let requests = self.requests.list().await?;
        Ok(requests.into_iter().filter(|r| filter.matches(r)).collect())
    }

    pub async fn stats(&self) -> DomainResult<RegistrationStats> {
        let requests = self.requests.list().await?;
        Ok(RegistrationStats::from_requests(&requests))
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<RegistrationRequest> {
        self.requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Registration request not found".to_string()))
    }

    /// Approves a pending request and grants the requested role.
    pub async fn approve(
        &self,
        id: Uuid,
        approver: &SessionIdentity,
        admin_notes: Option<String>,
    ) -> DomainResult<Decision> {
        let record = DecisionRecord {
            status: ApprovalStatus::Approved,
            admin_notes: normalize_optional(admin_notes),
            rejection_reason: None,
            decided_by: approver.id,
            decided_by_email: approver.email.clone(),
            decided_at: Utc::now(),
        };

        let request = self.apply(id, record).await?;
        let event = ApprovalEvent::Approved {
            identity_id: request.identity_id,
            new_role: Role::from(request.requested_role),
        };

        info!(
            registration_id = %request.id,
            identity_id = %request.identity_id,
            new_role = %request.requested_role,
            decided_by = %approver.id,
            "Registration request approved"
        );

        self.emit(request, event).await
    }

    /// Rejects a pending request. `reason` must not be blank; the role is left as is.
    pub async fn reject(
        &self,
        id: Uuid,
        approver: &SessionIdentity,
        reason: &str,
        admin_notes: Option<String>,
    ) -> DomainResult<Decision> {
        if reason.trim().is_empty() {
            return Err(DomainError::Validation(
                "Rejection reason is required".to_string(),
            ));
        }

        let record = DecisionRecord {
            status: ApprovalStatus::Rejected,
            admin_notes: normalize_optional(admin_notes),
            rejection_reason: Some(reason.to_string()),
            decided_by: approver.id,
            decided_by_email: approver.email.clone(),
            decided_at: Utc::now(),
        };

        let request = self.apply(id, record).await?;
        let event = ApprovalEvent::Rejected {
            identity_id: request.identity_id,
            reason: reason.to_string(),
        };

        info!(
            registration_id = %request.id,
            identity_id = %request.identity_id,
            decided_by = %approver.id,
            "Registration request rejected"
        );

        self.emit(request, event).await
    }

    /// Dispatches a `{requestId, action, adminNotes?, rejectionReason?}` payload.
    pub async fn decide(
        &self,
        approver: &SessionIdentity,
        payload: DecisionPayload,
    ) -> DomainResult<Decision> {
        payload.validate()?;

        match payload.action {
            DecisionAction::Approve => {
                self.approve(payload.request_id, approver, payload.admin_notes)
                    .await
            }
            DecisionAction::Reject => {
                let reason = payload.rejection_reason.unwrap_or_default();
                self.reject(payload.request_id, approver, &reason, payload.admin_notes)
                    .await
            }
        }
    }

    async fn apply(&self, id: Uuid, record: DecisionRecord) -> DomainResult<RegistrationRequest> {
        match self.requests.apply_decision(id, record).await? {
            DecisionOutcome::Applied(request) => Ok(request),
            DecisionOutcome::NotFound => Err(DomainError::NotFound(
                "Registration request not found".to_string(),
            )),
            DecisionOutcome::AlreadyDecided(status) => Err(DomainError::InvalidState(format!(
                "Registration request has already been {}",
                status
            ))),
        }
    }

    async fn emit(&self, request: RegistrationRequest, event: ApprovalEvent) -> DomainResult<Decision> {
        if let Err(e) = self.listener.on_approval_event(&event).await {
            // The decision is already stored; only the identity update is missing.
            error!(
                registration_id = %request.id,
                identity_id = %event.identity_id(),
                error = %e,
                "Failed to apply approval event to identity"
            );
            return Err(e);
        }

        Ok(Decision { request, event })
    }
}

/// Listener that records events in memory. Used in tests.
#[derive(Debug, Default)]
pub struct RecordingApprovalListener {
    events: Mutex<Vec<ApprovalEvent>>,
    simulate_failure: bool,
}

impl RecordingApprovalListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener whose every call fails.
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            simulate_failure: true,
        }
    }

    pub async fn events(&self) -> Vec<ApprovalEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl ApprovalEventListener for RecordingApprovalListener {
    async fn on_approval_event(&self, event: &ApprovalEvent) -> DomainResult<()> {
        self.events.lock().await.push(event.clone());
        if self.simulate_failure {
            return Err(DomainError::Repository(
                crate::errors::RepositoryError::Storage("Simulated failure".to_string()),
            ));
        }
        Ok(())
    }
}
