//! Post model
//!
//! A blog post with its categories. `created_on` is fixed at insert time,
//! `last_modified` moves on every save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// Maximum length of a post title, in characters
pub const POST_TITLE_MAX_LEN: usize = 255;

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_on: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    /// Categories this post belongs to, ordered by name
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Input for creating a post
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Input for updating a post. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub body: Option<String>,
    /// Replaces the full category set when present
    pub category_ids: Option<Vec<i64>>,
}
