//! Project repository
//!
//! Database operations for portfolio projects.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateProjectInput, Project};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{mysql::MySqlRow, sqlite::SqliteRow, Row};
use std::sync::Arc;

/// Project repository trait
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project
    async fn create(&self, input: &CreateProjectInput) -> Result<Project>;

    /// Get project by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Project>>;

    /// List all projects in insertion order
    async fn list(&self) -> Result<Vec<Project>>;

    /// Overwrite a project's fields
    async fn update(&self, project: &Project) -> Result<Project>;

    /// Delete a project
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based project repository implementation
pub struct SqlxProjectRepository {
    pool: DynDatabasePool,
}

impl SqlxProjectRepository {
    /// Create a new SQLx project repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ProjectRepository> {
        Arc::new(Self::new(pool))
    }
}

const INSERT_PROJECT: &str =
    "INSERT INTO projects (title, description, technology, image) VALUES (?, ?, ?, ?)";
const SELECT_PROJECTS: &str = "SELECT id, title, description, technology, image FROM projects";
const UPDATE_PROJECT: &str =
    "UPDATE projects SET title = ?, description = ?, technology = ?, image = ? WHERE id = ?";

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn create(&self, input: &CreateProjectInput) -> Result<Project> {
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INSERT_PROJECT)
                .bind(&input.title)
                .bind(&input.description)
                .bind(&input.technology)
                .bind(&input.image)
                .execute(self.pool.sqlite_pool()?)
                .await
                .context("Failed to create project")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(INSERT_PROJECT)
                .bind(&input.title)
                .bind(&input.description)
                .bind(&input.technology)
                .bind(&input.image)
                .execute(self.pool.mysql_pool()?)
                .await
                .context("Failed to create project")?
                .last_insert_id() as i64,
        };

        Ok(Project {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            technology: input.technology.clone(),
            image: input.image.clone(),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>> {
        let sql = format!("{} WHERE id = ?", SELECT_PROJECTS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite_pool()?)
                    .await
                    .context("Failed to get project by ID")?;
                row.as_ref().map(row_to_project_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql_pool()?)
                    .await
                    .context("Failed to get project by ID")?;
                row.as_ref().map(row_to_project_mysql).transpose()
            }
        }
    }

    async fn list(&self) -> Result<Vec<Project>> {
        let sql = format!("{} ORDER BY id", SELECT_PROJECTS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.sqlite_pool()?)
                    .await
                    .context("Failed to list projects")?;
                rows.iter().map(row_to_project_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.mysql_pool()?)
                    .await
                    .context("Failed to list projects")?;
                rows.iter().map(row_to_project_mysql).collect()
            }
        }
    }

    async fn update(&self, project: &Project) -> Result<Project> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_PROJECT)
                    .bind(&project.title)
                    .bind(&project.description)
                    .bind(&project.technology)
                    .bind(&project.image)
                    .bind(project.id)
                    .execute(self.pool.sqlite_pool()?)
                    .await
                    .context("Failed to update project")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_PROJECT)
                    .bind(&project.title)
                    .bind(&project.description)
                    .bind(&project.technology)
                    .bind(&project.image)
                    .bind(project.id)
                    .execute(self.pool.mysql_pool()?)
                    .await
                    .context("Failed to update project")?;
            }
        }
        Ok(project.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query("DELETE FROM projects WHERE id = ?")
                .bind(id)
                .execute(self.pool.sqlite_pool()?)
                .await
                .context("Failed to delete project")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query("DELETE FROM projects WHERE id = ?")
                .bind(id)
                .execute(self.pool.mysql_pool()?)
                .await
                .context("Failed to delete project")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }
}

fn row_to_project_sqlite(row: &SqliteRow) -> Result<Project> {
    Ok(Project {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        technology: row.try_get("technology")?,
        image: row.try_get("image")?,
    })
}

fn row_to_project_mysql(row: &MySqlRow) -> Result<Project> {
    Ok(Project {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        technology: row.try_get("technology")?,
        image: row.try_get("image")?,
    })
}
