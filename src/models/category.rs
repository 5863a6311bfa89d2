//! Category model

use serde::{Deserialize, Serialize};

/// Maximum length of a category name, in characters
pub const CATEGORY_NAME_MAX_LEN: usize = 20;

/// A post category. Posts and categories are linked many-to-many.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Input for creating or renaming a category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}
