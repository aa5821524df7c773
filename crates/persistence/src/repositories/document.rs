//! Document repository for database operations.

use async_trait::async_trait;
use domain::models::{Document, DocumentInput};
use domain::repositories::{DocumentRepository, RepoResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::entities::DocumentEntity;
use crate::metrics::QueryTimer;

/// Repository for document metadata.
#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    /// Creates a new PgDocumentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn list(&self) -> RepoResult<Vec<Document>> {
        let timer = QueryTimer::new("list_documents");
        let result = sqlx::query_as::<_, DocumentEntity>(
            r#"
            SELECT id, title, description, file_name, file_type, file_size, category,
                   is_public, uploaded_by, uploaded_at, download_count, view_count
            FROM documents
            ORDER BY uploaded_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Document>> {
        let timer = QueryTimer::new("find_document_by_id");
        let result = sqlx::query_as::<_, DocumentEntity>(
            r#"
            SELECT id, title, description, file_name, file_type, file_size, category,
                   is_public, uploaded_by, uploaded_at, download_count, view_count
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn create(&self, input: DocumentInput, uploaded_by: &str) -> RepoResult<Document> {
        let timer = QueryTimer::new("create_document");
        let result = sqlx::query_as::<_, DocumentEntity>(
            r#"
            INSERT INTO documents (id, title, description, file_name, file_type, file_size,
                                   category, is_public, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, file_name, file_type, file_size, category,
                      is_public, uploaded_by, uploaded_at, download_count, view_count
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.file_name)
        .bind(&input.file_type)
        .bind(input.file_size)
        .bind(&input.category)
        .bind(input.is_public)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.into())
    }

    async fn update(&self, id: Uuid, input: DocumentInput) -> RepoResult<Option<Document>> {
        let timer = QueryTimer::new("update_document");
        let result = sqlx::query_as::<_, DocumentEntity>(
            r#"
            UPDATE documents
            SET title = $2, description = $3, file_name = $4, file_type = $5,
                file_size = $6, category = $7, is_public = $8
            WHERE id = $1
            RETURNING id, title, description, file_name, file_type, file_size, category,
                      is_public, uploaded_by, uploaded_at, download_count, view_count
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.file_name)
        .bind(&input.file_type)
        .bind(input.file_size)
        .bind(&input.category)
        .bind(input.is_public)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let timer = QueryTimer::new("delete_document");
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.rows_affected() > 0)
    }

    async fn increment_downloads(&self, id: Uuid) -> RepoResult<Option<Document>> {
        let timer = QueryTimer::new("increment_document_downloads");
        let result = sqlx::query_as::<_, DocumentEntity>(
            r#"
            UPDATE documents
            SET download_count = download_count + 1
            WHERE id = $1
            RETURNING id, title, description, file_name, file_type, file_size, category,
                      is_public, uploaded_by, uploaded_at, download_count, view_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result.map_err(map_sqlx_error)?.map(Into::into))
    }
}
