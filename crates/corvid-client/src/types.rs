//! Request and response types for the Corvid API.
//!
//! These types mirror the generated operation surface.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// A platform user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: u64,
    /// Unique handle.
    pub username: String,
    /// Display name, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Platform role, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Creation time (ISO 8601).
    pub created_at: String,
}

/// Request to update a user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New profile bio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Response for list users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// Users on this page.
    pub users: Vec<User>,
    /// Total count across pages.
    pub total: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Articles
// ─────────────────────────────────────────────────────────────────────────────

/// A published article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Article ID.
    pub id: u64,
    /// URL slug.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Body, as markdown.
    pub body: String,
    /// Tags attached to the article.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Author's user ID.
    pub author_id: u64,
    /// Publication time (ISO 8601), absent for drafts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

/// Request to create an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateArticleRequest {
    /// Title.
    pub title: String,
    /// Body, as markdown.
    pub body: String,
    /// Tags to attach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Response for list articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListArticlesResponse {
    /// Articles on this page.
    pub articles: Vec<Article>,
    /// Total count across pages.
    pub total: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Service status report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Overall status, e.g. `"ok"`.
    pub status: String,
    /// Server version, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
