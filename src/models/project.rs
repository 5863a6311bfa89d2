//! Project model
//!
//! Portfolio entries shown on the projects pages.

use serde::{Deserialize, Serialize};

/// Maximum length of a project title, in characters
pub const PROJECT_TITLE_MAX_LEN: usize = 100;
/// Maximum length of a project's technology label, in characters
pub const PROJECT_TECHNOLOGY_MAX_LEN: usize = 20;

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub technology: String,
    /// Image path relative to the static root; empty when there is none
    pub image: String,
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectInput {
    pub title: String,
    pub description: String,
    pub technology: String,
    #[serde(default)]
    pub image: String,
}

/// Input for updating a project. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technology: Option<String>,
    pub image: Option<String>,
}

impl Project {
    /// Apply an update in place
    pub fn apply(&mut self, input: UpdateProjectInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(technology) = input.technology {
            self.technology = technology;
        }
        if let Some(image) = input.image {
            self.image = image;
        }
    }
}
