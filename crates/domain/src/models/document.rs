//! Document library models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;
use validator::Validate;

/// Metadata record for a file in the document library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub file_type: String,
    /// Size in bytes.
    pub file_size: i64,
    pub category: String,
    pub is_public: bool,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub download_count: i64,
    pub view_count: i64,
}

/// Create/update payload for a document.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,

    #[validate(length(min = 1, max = 20, message = "File type must be 1-20 characters"))]
    pub file_type: String,

    #[validate(range(min = 0, message = "File size must not be negative"))]
    pub file_size: i64,

    #[validate(
        length(min = 1, max = 100, message = "Category must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub category: String,

    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSort {
    Title,
    #[default]
    Date,
    Size,
    Downloads,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Listing query for documents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub public_only: bool,
    #[serde(default)]
    pub sort: DocumentSort,
    #[serde(default)]
    pub order: SortOrder,
}

impl DocumentQuery {
    /// Whether `document` is visible to the viewer and matches search and category.
    pub fn matches(&self, document: &Document, authenticated: bool) -> bool {
        let visible = document.is_public || (authenticated && !self.public_only);
        if !visible {
            return false;
        }

        if let Some(category) = self.category.as_deref().map(str::trim) {
            if !category.is_empty() && category != "all" && document.category != category {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                document.title.to_lowercase().contains(&term)
                    || document.description.to_lowercase().contains(&term)
            }
        }
    }

    fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = match self.sort {
            DocumentSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            DocumentSort::Date => a.uploaded_at.cmp(&b.uploaded_at),
            DocumentSort::Size => a.file_size.cmp(&b.file_size),
            DocumentSort::Downloads => a.download_count.cmp(&b.download_count),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filters and sorts `documents` for the given viewer.
    pub fn apply(&self, documents: Vec<Document>, authenticated: bool) -> Vec<Document> {
        let mut visible: Vec<Document> = documents
            .into_iter()
            .filter(|document| self.matches(document, authenticated))
            .collect();
        visible.sort_by(|a, b| self.compare(a, b));
        visible
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub total: usize,
    pub public: usize,
    pub private: usize,
    pub total_downloads: i64,
}

impl DocumentStats {
    pub fn from_documents(documents: &[Document]) -> Self {
        documents.iter().fold(Self::default(), |mut stats, document| {
            stats.total += 1;
            if document.is_public {
                stats.public += 1;
            } else {
                stats.private += 1;
            }
            stats.total_downloads += document.download_count;
            stats
        })
    }
}
