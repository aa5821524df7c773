//! Authentication routes: registration, login, logout and the current session.

use axum::{extract::State, http::StatusCode, Json};
use domain::errors::DomainError;
use domain::models::{
    Identity, LoginRequest, RegisterRequest, RegistrationReceipt, SessionIdentity,
    UpdateProfileRequest,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;
use crate::middleware::metrics::{record_login, record_registration_submitted};

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: SessionIdentity,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Submit a registration request.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegistrationReceipt>), ApiError> {
    let receipt = state.identity.register(request).await?;
    record_registration_submitted();
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Open a new session.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session_id = Uuid::new_v4();

    let user = match state.identity.login(session_id, request).await {
        Ok(user) => user,
        Err(e) => {
            if matches!(e, DomainError::Authentication) {
                record_login("failure");
            }
            return Err(e.into());
        }
    };

    let access_token = match state.jwt.issue_session_token(user.id, session_id) {
        Ok(token) => token,
        Err(e) => {
            // Do not leave a session open that no token can reach.
            state.identity.logout(session_id).await?;
            return Err(ApiError::Internal(format!("Failed to issue token: {}", e)));
        }
    };

    record_login("success");

    Ok(Json(LoginResponse {
        user,
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.access_token_expiry_secs,
    }))
}

/// Close the current session.
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<StatusCode, ApiError> {
    state.identity.logout(session.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(Session(session): Session) -> Json<SessionIdentity> {
    Json(session.identity)
}

/// Full stored profile of the signed-in identity.
///
/// GET /api/v1/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<Json<Identity>, ApiError> {
    Ok(Json(state.identity.profile(session.session_id).await?))
}

/// Edit the signed-in identity's own profile.
///
/// PUT /api/v1/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Session(session): Session,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Identity>, ApiError> {
    Ok(Json(
        state
            .identity
            .update_profile(session.session_id, request)
            .await?,
    ))
}
