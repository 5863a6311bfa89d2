//! Admin service
//!
//! Record management behind the admin API: categories, posts and projects.
//! Text fields are trimmed and validated the same way the public comment
//! form is, so stored values never exceed their column limits.

use crate::db::repositories::{CategoryRepository, PostRepository, ProjectRepository};
use crate::forms::{max_length_message, REQUIRED_MESSAGE};
use crate::models::{
    Category, CategoryInput, CreatePostInput, CreateProjectInput, Post, Project, UpdatePostInput,
    UpdateProjectInput, CATEGORY_NAME_MAX_LEN, POST_TITLE_MAX_LEN, PROJECT_TECHNOLOGY_MAX_LEN,
    PROJECT_TITLE_MAX_LEN,
};
use anyhow::Context;
use std::sync::Arc;

/// Error types for admin service operations
#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    /// Record not found
    #[error("{0} not found: {1}")]
    NotFound(&'static str, i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Admin service over all administrable records
pub struct AdminService {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
    projects: Arc<dyn ProjectRepository>,
}

impl AdminService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        posts: Arc<dyn PostRepository>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            categories,
            posts,
            projects,
        }
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn list_categories(&self) -> Result<Vec<Category>, AdminServiceError> {
        Ok(self
            .categories
            .list()
            .await
            .context("Failed to list categories")?)
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, AdminServiceError> {
        self.categories
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or(AdminServiceError::NotFound("Category", id))
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, AdminServiceError> {
        let name = clean_text("name", &input.name, Some(CATEGORY_NAME_MAX_LEN))?;
        let created = self
            .categories
            .create(&name)
            .await
            .context("Failed to create category")?;
        tracing::info!(id = created.id, name = %created.name, "Category created");
        Ok(created)
    }

    pub async fn update_category(
        &self,
        id: i64,
        input: CategoryInput,
    ) -> Result<Category, AdminServiceError> {
        let mut category = self.get_category(id).await?;
        category.name = clean_text("name", &input.name, Some(CATEGORY_NAME_MAX_LEN))?;
        Ok(self
            .categories
            .update(&category)
            .await
            .context("Failed to update category")?)
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), AdminServiceError> {
        let deleted = self
            .categories
            .delete(id)
            .await
            .context("Failed to delete category")?;
        if !deleted {
            return Err(AdminServiceError::NotFound("Category", id));
        }
        tracing::info!(id, "Category deleted");
        Ok(())
    }

    // ========================================================================
    // Posts
    // ========================================================================

    pub async fn list_posts(&self) -> Result<Vec<Post>, AdminServiceError> {
        Ok(self.posts.list_recent().await.context("Failed to list posts")?)
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, AdminServiceError> {
        self.posts
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(AdminServiceError::NotFound("Post", id))
    }

    pub async fn create_post(&self, input: CreatePostInput) -> Result<Post, AdminServiceError> {
        let input = CreatePostInput {
            title: clean_text("title", &input.title, Some(POST_TITLE_MAX_LEN))?,
            body: clean_text("body", &input.body, None)?,
            category_ids: input.category_ids,
        };
        self.check_categories_exist(&input.category_ids).await?;

        let created = self
            .posts
            .create(&input)
            .await
            .context("Failed to create post")?;
        tracing::info!(id = created.id, "Post created");
        Ok(created)
    }

    pub async fn update_post(
        &self,
        id: i64,
        input: UpdatePostInput,
    ) -> Result<Post, AdminServiceError> {
        let input = UpdatePostInput {
            title: input
                .title
                .map(|t| clean_text("title", &t, Some(POST_TITLE_MAX_LEN)))
                .transpose()?,
            body: input.body.map(|b| clean_text("body", &b, None)).transpose()?,
            category_ids: input.category_ids,
        };
        if let Some(ref ids) = input.category_ids {
            self.check_categories_exist(ids).await?;
        }

        self.posts
            .update(id, &input)
            .await
            .context("Failed to update post")?
            .ok_or(AdminServiceError::NotFound("Post", id))
    }

    /// Delete a post together with its comments
    pub async fn delete_post(&self, id: i64) -> Result<(), AdminServiceError> {
        let deleted = self.posts.delete(id).await.context("Failed to delete post")?;
        if !deleted {
            return Err(AdminServiceError::NotFound("Post", id));
        }
        tracing::info!(id, "Post deleted");
        Ok(())
    }

    async fn check_categories_exist(&self, ids: &[i64]) -> Result<(), AdminServiceError> {
        for &id in ids {
            let found = self
                .categories
                .get_by_id(id)
                .await
                .context("Failed to check category")?;
            if found.is_none() {
                return Err(AdminServiceError::ValidationError(format!(
                    "category_ids: unknown category {}",
                    id
                )));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub async fn list_projects(&self) -> Result<Vec<Project>, AdminServiceError> {
        Ok(self.projects.list().await.context("Failed to list projects")?)
    }

    pub async fn get_project(&self, id: i64) -> Result<Project, AdminServiceError> {
        self.projects
            .get_by_id(id)
            .await
            .context("Failed to get project")?
            .ok_or(AdminServiceError::NotFound("Project", id))
    }

    pub async fn create_project(
        &self,
        input: CreateProjectInput,
    ) -> Result<Project, AdminServiceError> {
        let input = CreateProjectInput {
            title: clean_text("title", &input.title, Some(PROJECT_TITLE_MAX_LEN))?,
            description: clean_text("description", &input.description, None)?,
            technology: clean_text("technology", &input.technology, Some(PROJECT_TECHNOLOGY_MAX_LEN))?,
            image: input.image.trim().to_string(),
        };
        let created = self
            .projects
            .create(&input)
            .await
            .context("Failed to create project")?;
        tracing::info!(id = created.id, "Project created");
        Ok(created)
    }

    pub async fn update_project(
        &self,
        id: i64,
        input: UpdateProjectInput,
    ) -> Result<Project, AdminServiceError> {
        let mut project = self.get_project(id).await?;
        project.apply(UpdateProjectInput {
            title: input
                .title
                .map(|t| clean_text("title", &t, Some(PROJECT_TITLE_MAX_LEN)))
                .transpose()?,
            description: input
                .description
                .map(|d| clean_text("description", &d, None))
                .transpose()?,
            technology: input
                .technology
                .map(|t| clean_text("technology", &t, Some(PROJECT_TECHNOLOGY_MAX_LEN)))
                .transpose()?,
            image: input.image.map(|i| i.trim().to_string()),
        });
        Ok(self
            .projects
            .update(&project)
            .await
            .context("Failed to update project")?)
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), AdminServiceError> {
        let deleted = self
            .projects
            .delete(id)
            .await
            .context("Failed to delete project")?;
        if !deleted {
            return Err(AdminServiceError::NotFound("Project", id));
        }
        tracing::info!(id, "Project deleted");
        Ok(())
    }
}

/// Trim a required text value and check its length in characters
fn clean_text(field: &str, value: &str, max_len: Option<usize>) -> Result<String, AdminServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AdminServiceError::ValidationError(format!(
            "{}: {}",
            field, REQUIRED_MESSAGE
        )));
    }
    if let Some(max) = max_len {
        let len = value.chars().count();
        if len > max {
            return Err(AdminServiceError::ValidationError(format!(
                "{}: {}",
                field,
                max_length_message(max, len)
            )));
        }
    }
    Ok(value.to_string())
}
