//! Document entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Document;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the documents table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub category: String,
    pub is_public: bool,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub download_count: i64,
    pub view_count: i64,
}

impl From<DocumentEntity> for Document {
    fn from(entity: DocumentEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            file_name: entity.file_name,
            file_type: entity.file_type,
            file_size: entity.file_size,
            category: entity.category,
            is_public: entity.is_public,
            uploaded_by: entity.uploaded_by,
            uploaded_at: entity.uploaded_at,
            download_count: entity.download_count,
            view_count: entity.view_count,
        }
    }
}
