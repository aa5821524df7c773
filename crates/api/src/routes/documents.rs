//! Document library routes: public listing and management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{Document, DocumentInput, DocumentQuery, DocumentStats};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{OptionalSession, Session};

/// Management listing with the library's statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageDocumentsResponse {
    pub documents: Vec<Document>,
    pub stats: DocumentStats,
}

/// GET /api/v1/documents?search=&category=&publicOnly=&sort=&order=
pub async fn list_documents(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let viewer = session.as_ref().map(|s| &s.identity);
    Ok(Json(state.content.list_documents(viewer, &query).await?))
}

/// GET /api/v1/documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let viewer = session.as_ref().map(|s| &s.identity);
    Ok(Json(state.content.get_document(viewer, id).await?))
}

/// POST /api/v1/documents/:id/download
pub async fn download_document(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let viewer = session.as_ref().map(|s| &s.identity);
    Ok(Json(state.content.download_document(viewer, id).await?))
}

/// GET /api/v1/admin/documents
pub async fn manage_documents(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<ManageDocumentsResponse>, ApiError> {
    let documents = state.content.manage_documents(&query).await?;
    let stats = state.content.document_stats().await?;
    Ok(Json(ManageDocumentsResponse { documents, stats }))
}

/// POST /api/v1/admin/documents
pub async fn create_document(
    State(state): State<AppState>,
    Session(session): Session,
    Json(input): Json<DocumentInput>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let document = state
        .content
        .create_document(input, &session.identity)
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// PUT /api/v1/admin/documents/:id
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DocumentInput>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.content.update_document(id, input).await?))
}

/// DELETE /api/v1/admin/documents/:id
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.content.delete_document(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
