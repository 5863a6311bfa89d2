//! Comment repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{mysql::MySqlRow, sqlite::SqliteRow, Row};
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Comment, CreateCommentInput};

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment attached to `input.post_id`
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment>;

    /// List the comments of a post in insertion order
    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>>;

    /// Count the comments of a post
    async fn count_by_post(&self, post_id: i64) -> Result<i64>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

const INSERT_COMMENT: &str =
    "INSERT INTO comments (author, body, created_on, post_id) VALUES (?, ?, ?, ?)";
const SELECT_BY_POST: &str =
    "SELECT id, author, body, created_on, post_id FROM comments WHERE post_id = ? ORDER BY id";
const COUNT_BY_POST: &str = "SELECT COUNT(*) FROM comments WHERE post_id = ?";

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INSERT_COMMENT)
                .bind(&input.author)
                .bind(&input.body)
                .bind(now)
                .bind(input.post_id)
                .execute(self.pool.sqlite_pool()?)
                .await
                .context("Failed to create comment")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(INSERT_COMMENT)
                .bind(&input.author)
                .bind(&input.body)
                .bind(now)
                .bind(input.post_id)
                .execute(self.pool.mysql_pool()?)
                .await
                .context("Failed to create comment")?
                .last_insert_id() as i64,
        };

        Ok(Comment {
            id,
            author: input.author.clone(),
            body: input.body.clone(),
            created_on: now,
            post_id: input.post_id,
        })
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(SELECT_BY_POST)
                    .bind(post_id)
                    .fetch_all(self.pool.sqlite_pool()?)
                    .await
                    .context("Failed to list comments")?;
                rows.iter().map(row_to_comment_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(SELECT_BY_POST)
                    .bind(post_id)
                    .fetch_all(self.pool.mysql_pool()?)
                    .await
                    .context("Failed to list comments")?;
                rows.iter().map(row_to_comment_mysql).collect()
            }
        }
    }

    async fn count_by_post(&self, post_id: i64) -> Result<i64> {
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query_scalar(COUNT_BY_POST)
                .bind(post_id)
                .fetch_one(self.pool.sqlite_pool()?)
                .await
                .context("Failed to count comments")?,
            DatabaseDriver::Mysql => sqlx::query_scalar(COUNT_BY_POST)
                .bind(post_id)
                .fetch_one(self.pool.mysql_pool()?)
                .await
                .context("Failed to count comments")?,
        };
        Ok(count)
    }
}

fn row_to_comment_sqlite(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        author: row.try_get("author")?,
        body: row.try_get("body")?,
        created_on: row.try_get("created_on")?,
        post_id: row.try_get("post_id")?,
    })
}

fn row_to_comment_mysql(row: &MySqlRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        author: row.try_get("author")?,
        body: row.try_get("body")?,
        created_on: row.try_get("created_on")?,
        post_id: row.try_get("post_id")?,
    })
}
