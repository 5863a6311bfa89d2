//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a comment author name, in characters
pub const COMMENT_AUTHOR_MAX_LEN: usize = 60;

/// Comment entity. Each comment belongs to exactly one post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub author: String,
    pub body: String,
    pub created_on: DateTime<Utc>,
    pub post_id: i64,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateCommentInput {
    pub post_id: i64,
    pub author: String,
    pub body: String,
}
