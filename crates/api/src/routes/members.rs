//! Member directory.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::{MemberEntry, MemberQuery};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Session;

/// GET /api/v1/members?search=
pub async fn list_members(
    State(state): State<AppState>,
    Session(session): Session,
    Query(query): Query<MemberQuery>,
) -> Result<Json<Vec<MemberEntry>>, ApiError> {
    Ok(Json(
        state.directory.members(&session.identity, &query).await?,
    ))
}
