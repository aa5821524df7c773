//! News article models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::role::{parse_filter, ParseVariantError};

/// Publication state of an article. Only `Published` is shown publicly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    Draft,
    Published,
    Archived,
}

impl NewsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Draft => "draft",
            NewsStatus::Published => "published",
            NewsStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsStatus {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(NewsStatus::Draft),
            "published" => Ok(NewsStatus::Published),
            "archived" => Ok(NewsStatus::Archived),
            _ => Err(ParseVariantError {
                kind: "news status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub status: NewsStatus,
    pub is_featured: bool,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub view_count: i64,
}

/// Create/update payload for an article.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewsInput {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: String,

    #[serde(default)]
    pub content: String,

    #[validate(
        length(min = 1, max = 100, message = "Category must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub category: String,

    pub status: NewsStatus,

    #[serde(default)]
    pub is_featured: bool,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,

    /// Defaults to now.
    pub published_at: Option<DateTime<Utc>>,
}

/// Public listing query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

fn category_matches(filter: Option<&str>, category: &str) -> bool {
    match filter.map(str::trim) {
        None | Some("") | Some("all") => true,
        Some(wanted) => wanted == category,
    }
}

fn contains_ci(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

impl NewsQuery {
    pub fn matches(&self, article: &NewsArticle) -> bool {
        if article.status != NewsStatus::Published {
            return false;
        }
        if !category_matches(self.category.as_deref(), &article.category) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                contains_ci(&article.title, &term) || contains_ci(&article.excerpt, &term)
            }
        }
    }

    /// Published articles matching the query, featured first, then newest first.
    pub fn apply(&self, articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
        let mut visible: Vec<NewsArticle> =
            articles.into_iter().filter(|a| self.matches(a)).collect();
        visible.sort_by(|a, b| {
            b.is_featured
                .cmp(&a.is_featured)
                .then_with(|| b.published_at.cmp(&a.published_at))
        });
        visible
    }
}

/// Management listing query. Covers every status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageNewsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl ManageNewsQuery {
    /// Applies the filter; newest first.
    pub fn apply(&self, articles: Vec<NewsArticle>) -> Result<Vec<NewsArticle>, ParseVariantError> {
        let status: Option<NewsStatus> = parse_filter(self.status.as_deref())?;
        let term = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        let mut matching: Vec<NewsArticle> = articles
            .into_iter()
            .filter(|article| status.map_or(true, |s| article.status == s))
            .filter(|article| category_matches(self.category.as_deref(), &article.category))
            .filter(|article| {
                term.as_deref()
                    .map_or(true, |term| contains_ci(&article.title, term))
            })
            .collect();
        matching.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(matching)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub featured: usize,
    pub total_views: i64,
}

impl NewsStats {
    pub fn from_articles(articles: &[NewsArticle]) -> Self {
        articles.iter().fold(Self::default(), |mut stats, article| {
            stats.total += 1;
            match article.status {
                NewsStatus::Published => stats.published += 1,
                NewsStatus::Draft => stats.drafts += 1,
                NewsStatus::Archived => {}
            }
            if article.is_featured {
                stats.featured += 1;
            }
            stats.total_views += article.view_count;
            stats
        })
    }
}
