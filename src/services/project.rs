//! Project service

use crate::db::repositories::ProjectRepository;
use crate::models::Project;
use anyhow::Context;
use std::sync::Arc;

/// Error types for project service operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    /// Project not found
    #[error("Project not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Project service for the public portfolio pages
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }

    /// All projects in insertion order
    pub async fn list(&self) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.repo.list().await.context("Failed to list projects")?)
    }

    /// Get a project or fail with `NotFound`
    pub async fn get(&self, id: i64) -> Result<Project, ProjectServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get project")?
            .ok_or(ProjectServiceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxProjectRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateProjectInput;

    async fn setup() -> (Arc<dyn ProjectRepository>, ProjectService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxProjectRepository::boxed(pool);
        (repo.clone(), ProjectService::new(repo))
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let (repo, service) = setup().await;
        let created = repo
            .create(&CreateProjectInput {
                title: "Folio".to_string(),
                description: "This site".to_string(),
                technology: "Rust".to_string(),
                image: "img/folio.png".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(service.list().await.unwrap(), vec![created.clone()]);
        assert_eq!(service.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (_repo, service) = setup().await;
        assert!(matches!(
            service.get(3).await,
            Err(ProjectServiceError::NotFound(3))
        ));
    }
}
