//! Comment submission form

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{max_length_message, REQUIRED_MESSAGE};
use crate::models::COMMENT_AUTHOR_MAX_LEN;

/// Raw url-encoded form body. Absent fields deserialize as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentFormData {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
}

impl CommentFormData {
    /// Build from decoded key/value pairs. A repeated key keeps its last
    /// value and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut data = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "author" => data.author = value,
                "body" => data.body = value,
                _ => {}
            }
        }
        data
    }
}

/// Validated comment values, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedComment {
    pub author: String,
    pub body: String,
}

/// Comment form state as rendered by `blog_detail.html`.
///
/// `author` and `body` hold what the reader typed so an invalid submission
/// can be shown back unchanged. `errors` maps field name to messages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentForm {
    pub author: String,
    pub body: String,
    pub errors: BTreeMap<String, Vec<String>>,
    pub is_bound: bool,
    #[serde(skip)]
    cleaned: Option<CleanedComment>,
}

impl CommentForm {
    /// An empty, unbound form
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind submitted data and validate it
    pub fn bind(data: CommentFormData) -> Self {
        let mut errors = BTreeMap::new();

        let author = data.author.trim();
        let author_len = author.chars().count();
        if author.is_empty() {
            errors.insert("author".to_string(), vec![REQUIRED_MESSAGE.to_string()]);
        } else if author_len > COMMENT_AUTHOR_MAX_LEN {
            errors.insert(
                "author".to_string(),
                vec![max_length_message(COMMENT_AUTHOR_MAX_LEN, author_len)],
            );
        }

        let body = data.body.trim();
        if body.is_empty() {
            errors.insert("body".to_string(), vec![REQUIRED_MESSAGE.to_string()]);
        }

        let cleaned = errors.is_empty().then(|| CleanedComment {
            author: author.to_string(),
            body: body.to_string(),
        });

        Self {
            author: data.author,
            body: data.body,
            errors,
            is_bound: true,
            cleaned,
        }
    }

    /// True for a bound form without errors
    pub fn is_valid(&self) -> bool {
        self.is_bound && self.errors.is_empty()
    }

    /// Cleaned values, present only when the form is valid
    pub fn cleaned(&self) -> Option<&CleanedComment> {
        self.cleaned.as_ref()
    }

    /// Messages attached to one field
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}
