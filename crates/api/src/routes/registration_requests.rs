//! Registration request review: listing, statistics and decisions.
//!
//! All handlers sit behind the registration-approval guard (admin only).

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use domain::models::registration_request::{
    ApproveRequestBody, ListRequestsQuery, RejectRequestBody,
};
use domain::models::{
    ApprovalEvent, DecisionPayload, RegistrationRequest, RegistrationStats, RequestFilter,
};
use domain::services::Decision;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{OptionalJson, Session};
use crate::middleware::metrics::record_registration_decision;

/// A recorded decision together with the event it emitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub request: RegistrationRequest,
    pub event: ApprovalEvent,
}

/// Counts the decision and wraps it for the response.
fn decision_response(decision: Decision) -> Json<DecisionResponse> {
    let label = match decision.event {
        ApprovalEvent::Approved { .. } => "approved",
        ApprovalEvent::Rejected { .. } => "rejected",
    };
    record_registration_decision(label);

    Json(DecisionResponse {
        request: decision.request,
        event: decision.event,
    })
}

/// GET /api/v1/admin/registration-requests?status=&role=&search=
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<RegistrationRequest>>, ApiError> {
    let filter =
        RequestFilter::try_from(query).map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(Json(state.approvals.list(&filter).await?))
}

/// GET /api/v1/admin/registration-requests/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<RegistrationStats>, ApiError> {
    Ok(Json(state.approvals.stats().await?))
}

/// GET /api/v1/admin/registration-requests/:id
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationRequest>, ApiError> {
    Ok(Json(state.approvals.get(id).await?))
}

/// Approve a pending request. The body may be omitted, but a body that is
/// present must parse, or nothing is decided.
///
/// POST /api/v1/admin/registration-requests/:id/approve
pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Session(session): Session,
    OptionalJson(body): OptionalJson<ApproveRequestBody>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let body = body.unwrap_or_default();
    body.validate()?;

    let decision = state
        .approvals
        .approve(id, &session.identity, body.admin_notes)
        .await?;
    Ok(decision_response(decision))
}

/// Reject a pending request. A non-blank `rejectionReason` is required.
///
/// POST /api/v1/admin/registration-requests/:id/reject
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Session(session): Session,
    body: Result<Json<RejectRequestBody>, JsonRejection>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let Json(body) = body?;
    body.validate()?;

    let decision = state
        .approvals
        .reject(id, &session.identity, &body.rejection_reason, body.admin_notes)
        .await?;
    Ok(decision_response(decision))
}

/// Apply a `{requestId, action, adminNotes?, rejectionReason?}` decision.
///
/// POST /api/v1/admin/registration-requests/decisions
pub async fn decide(
    State(state): State<AppState>,
    Session(session): Session,
    payload: Result<Json<DecisionPayload>, JsonRejection>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let Json(payload) = payload?;
    let decision = state.approvals.decide(&session.identity, payload).await?;
    Ok(decision_response(decision))
}
