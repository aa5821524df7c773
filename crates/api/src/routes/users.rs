//! User management (admin).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::identity::ListUsersQuery;
use domain::models::role::parse_filter;
use domain::models::{Identity, IdentityFilter, IdentityStats, SetActiveRequest};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub users: Vec<Identity>,
    pub stats: IdentityStats,
}

/// GET /api/v1/admin/users?role=&status=&search=
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let filter = IdentityFilter {
        role: parse_filter(query.role.as_deref())
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        status: parse_filter(query.status.as_deref())
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        search: query.search,
    };

    let users = state.directory.users(&filter).await?;
    let stats = state.directory.user_stats().await?;
    Ok(Json(ListUsersResponse { users, stats }))
}

/// Activate or deactivate a user. Deactivation ends the user's sessions.
///
/// PUT /api/v1/admin/users/:id/status
pub async fn set_user_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Session(session): Session,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<Identity>, ApiError> {
    Ok(Json(
        state
            .identity
            .set_active(&session.identity, id, body.is_active)
            .await?,
    ))
}
