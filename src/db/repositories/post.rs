//! Post repository
//!
//! Database operations for posts and their category links.
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL
//!
//! Every post returned carries its categories. Writes that touch the
//! `post_categories` join table run in one transaction with the post row.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Category, CreatePostInput, Post, UpdatePostInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    mysql::MySqlRow, sqlite::SqliteRow, MySql, MySqlPool, QueryBuilder, Row, Sqlite, SqlitePool,
};
use std::collections::HashMap;
use std::sync::Arc;

use super::category::{row_to_category_mysql, row_to_category_sqlite};

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a post and link it to the given categories
    async fn create(&self, input: &CreatePostInput) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// List all posts, newest first
    async fn list_recent(&self) -> Result<Vec<Post>>;

    /// List posts having a category whose name contains `fragment`
    /// (case-sensitive), newest first. Each post appears once.
    async fn list_by_category_name(&self, fragment: &str) -> Result<Vec<Post>>;

    /// Update a post; returns `None` if it does not exist
    async fn update(&self, id: i64, input: &UpdatePostInput) -> Result<Option<Post>>;

    /// Delete a post. Its comments and category links are removed by cascade.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, input: &CreatePostInput) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_post_sqlite(self.pool.sqlite_pool()?, input).await,
            DatabaseDriver::Mysql => create_post_mysql(self.pool.mysql_pool()?, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_post_by_id_sqlite(self.pool.sqlite_pool()?, id).await,
            DatabaseDriver::Mysql => get_post_by_id_mysql(self.pool.mysql_pool()?, id).await,
        }
    }

    async fn list_recent(&self) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_recent_sqlite(self.pool.sqlite_pool()?).await,
            DatabaseDriver::Mysql => list_recent_mysql(self.pool.mysql_pool()?).await,
        }
    }

    async fn list_by_category_name(&self, fragment: &str) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_category_name_sqlite(self.pool.sqlite_pool()?, fragment).await
            }
            DatabaseDriver::Mysql => {
                list_by_category_name_mysql(self.pool.mysql_pool()?, fragment).await
            }
        }
    }

    async fn update(&self, id: i64, input: &UpdatePostInput) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_post_sqlite(self.pool.sqlite_pool()?, id, input).await,
            DatabaseDriver::Mysql => update_post_mysql(self.pool.mysql_pool()?, id, input).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query("DELETE FROM posts WHERE id = ?")
                .bind(id)
                .execute(self.pool.sqlite_pool()?)
                .await
                .context("Failed to delete post")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query("DELETE FROM posts WHERE id = ?")
                .bind(id)
                .execute(self.pool.mysql_pool()?)
                .await
                .context("Failed to delete post")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }
}

/// Sorted, duplicate-free category IDs (the join table key is `(post_id, category_id)`)
fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn group_categories(links: Vec<(i64, Category)>, posts: &mut [Post]) {
    let mut by_post: HashMap<i64, Vec<Category>> = HashMap::new();
    for (post_id, category) in links {
        by_post.entry(post_id).or_default().push(category);
    }
    for post in posts.iter_mut() {
        post.categories = by_post.remove(&post.id).unwrap_or_default();
    }
}

const SELECT_POSTS: &str = "SELECT p.id, p.title, p.body, p.created_on, p.last_modified FROM posts p";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_post_sqlite(pool: &SqlitePool, input: &CreatePostInput) -> Result<Post> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO posts (title, body, created_on, last_modified) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.body)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .context("Failed to create post")?;
    let id = result.last_insert_rowid();

    for category_id in unique_ids(&input.category_ids) {
        sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES (?, ?)")
            .bind(id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to link post {} to category {}", id, category_id))?;
    }

    tx.commit().await?;

    get_post_by_id_sqlite(pool, id)
        .await?
        .with_context(|| format!("Post {} missing after insert", id))
}

async fn get_post_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("{} WHERE p.id = ?", SELECT_POSTS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;

    let Some(row) = row else {
        return Ok(None);
    };
    let posts = attach_categories_sqlite(pool, vec![row_to_post_sqlite(&row)?]).await?;
    Ok(posts.into_iter().next())
}

async fn list_recent_sqlite(pool: &SqlitePool) -> Result<Vec<Post>> {
    let rows = sqlx::query(&format!(
        "{} ORDER BY p.created_on DESC, p.id DESC",
        SELECT_POSTS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    let posts = rows.iter().map(row_to_post_sqlite).collect::<Result<Vec<_>>>()?;
    attach_categories_sqlite(pool, posts).await
}

async fn list_by_category_name_sqlite(pool: &SqlitePool, fragment: &str) -> Result<Vec<Post>> {
    // instr() is case-sensitive, unlike LIKE
    let rows = sqlx::query(&format!(
        r#"{} WHERE EXISTS (
               SELECT 1 FROM post_categories pc
               JOIN categories c ON c.id = pc.category_id
               WHERE pc.post_id = p.id AND instr(c.name, ?) > 0
           )
           ORDER BY p.created_on DESC, p.id DESC"#,
        SELECT_POSTS
    ))
    .bind(fragment)
    .fetch_all(pool)
    .await
    .context("Failed to list posts by category")?;

    let posts = rows.iter().map(row_to_post_sqlite).collect::<Result<Vec<_>>>()?;
    attach_categories_sqlite(pool, posts).await
}

async fn update_post_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdatePostInput,
) -> Result<Option<Post>> {
    let Some(existing) = get_post_by_id_sqlite(pool, id).await? else {
        return Ok(None);
    };

    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE posts SET title = ?, body = ?, last_modified = ? WHERE id = ?")
        .bind(input.title.as_ref().unwrap_or(&existing.title))
        .bind(input.body.as_ref().unwrap_or(&existing.body))
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to update post")?;

    if let Some(category_ids) = &input.category_ids {
        sqlx::query("DELETE FROM post_categories WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear post categories")?;

        for category_id in unique_ids(category_ids) {
            sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES (?, ?)")
                .bind(id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to link post {} to category {}", id, category_id))?;
        }
    }

    tx.commit().await?;

    get_post_by_id_sqlite(pool, id).await
}

async fn attach_categories_sqlite(pool: &SqlitePool, mut posts: Vec<Post>) -> Result<Vec<Post>> {
    if posts.is_empty() {
        return Ok(posts);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT pc.post_id, c.id, c.name FROM post_categories pc \
         JOIN categories c ON c.id = pc.category_id WHERE pc.post_id IN (",
    );
    let mut ids = builder.separated(", ");
    for post in &posts {
        ids.push_bind(post.id);
    }
    ids.push_unseparated(") ORDER BY c.name, c.id");

    let rows = builder
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to load post categories")?;

    let mut links = Vec::with_capacity(rows.len());
    for row in &rows {
        links.push((row.try_get("post_id")?, row_to_category_sqlite(row)?));
    }
    group_categories(links, &mut posts);

    Ok(posts)
}

fn row_to_post_sqlite(row: &SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        created_on: row.try_get("created_on")?,
        last_modified: row.try_get("last_modified")?,
        categories: Vec::new(),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_post_mysql(pool: &MySqlPool, input: &CreatePostInput) -> Result<Post> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO posts (title, body, created_on, last_modified) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.body)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .context("Failed to create post")?;
    let id = result.last_insert_id() as i64;

    for category_id in unique_ids(&input.category_ids) {
        sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES (?, ?)")
            .bind(id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to link post {} to category {}", id, category_id))?;
    }

    tx.commit().await?;

    get_post_by_id_mysql(pool, id)
        .await?
        .with_context(|| format!("Post {} missing after insert", id))
}

async fn get_post_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("{} WHERE p.id = ?", SELECT_POSTS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;

    let Some(row) = row else {
        return Ok(None);
    };
    let posts = attach_categories_mysql(pool, vec![row_to_post_mysql(&row)?]).await?;
    Ok(posts.into_iter().next())
}

async fn list_recent_mysql(pool: &MySqlPool) -> Result<Vec<Post>> {
    let rows = sqlx::query(&format!(
        "{} ORDER BY p.created_on DESC, p.id DESC",
        SELECT_POSTS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    let posts = rows.iter().map(row_to_post_mysql).collect::<Result<Vec<_>>>()?;
    attach_categories_mysql(pool, posts).await
}

async fn list_by_category_name_mysql(pool: &MySqlPool, fragment: &str) -> Result<Vec<Post>> {
    // Binary comparison keeps the match case-sensitive regardless of collation
    let rows = sqlx::query(&format!(
        r#"{} WHERE EXISTS (
               SELECT 1 FROM post_categories pc
               JOIN categories c ON c.id = pc.category_id
               WHERE pc.post_id = p.id
                 AND LOCATE(CAST(? AS BINARY), CAST(c.name AS BINARY)) > 0
           )
           ORDER BY p.created_on DESC, p.id DESC"#,
        SELECT_POSTS
    ))
    .bind(fragment)
    .fetch_all(pool)
    .await
    .context("Failed to list posts by category")?;

    let posts = rows.iter().map(row_to_post_mysql).collect::<Result<Vec<_>>>()?;
    attach_categories_mysql(pool, posts).await
}

async fn update_post_mysql(
    pool: &MySqlPool,
    id: i64,
    input: &UpdatePostInput,
) -> Result<Option<Post>> {
    let Some(existing) = get_post_by_id_mysql(pool, id).await? else {
        return Ok(None);
    };

    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE posts SET title = ?, body = ?, last_modified = ? WHERE id = ?")
        .bind(input.title.as_ref().unwrap_or(&existing.title))
        .bind(input.body.as_ref().unwrap_or(&existing.body))
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to update post")?;

    if let Some(category_ids) = &input.category_ids {
        sqlx::query("DELETE FROM post_categories WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear post categories")?;

        for category_id in unique_ids(category_ids) {
            sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES (?, ?)")
                .bind(id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to link post {} to category {}", id, category_id))?;
        }
    }

    tx.commit().await?;

    get_post_by_id_mysql(pool, id).await
}

async fn attach_categories_mysql(pool: &MySqlPool, mut posts: Vec<Post>) -> Result<Vec<Post>> {
    if posts.is_empty() {
        return Ok(posts);
    }

    let mut builder: QueryBuilder<MySql> = QueryBuilder::new(
        "SELECT pc.post_id, c.id, c.name FROM post_categories pc \
         JOIN categories c ON c.id = pc.category_id WHERE pc.post_id IN (",
    );
    let mut ids = builder.separated(", ");
    for post in &posts {
        ids.push_bind(post.id);
    }
    ids.push_unseparated(") ORDER BY c.name, c.id");

    let rows = builder
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to load post categories")?;

    let mut links = Vec::with_capacity(rows.len());
    for row in &rows {
        links.push((row.try_get("post_id")?, row_to_category_mysql(row)?));
    }
    group_categories(links, &mut posts);

    Ok(posts)
}

fn row_to_post_mysql(row: &MySqlRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        created_on: row.try_get("created_on")?,
        last_modified: row.try_get("last_modified")?,
        categories: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{CategoryRepository, SqlxCategoryRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (DynDatabasePool, SqlxPostRepository, SqlxCategoryRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxPostRepository::new(pool.clone());
        let categories = SqlxCategoryRepository::new(pool.clone());
        (pool, repo, categories)
    }

    fn post_input(title: &str, category_ids: Vec<i64>) -> CreatePostInput {
        CreatePostInput {
            title: title.to_string(),
            body: format!("Body of {}", title),
            category_ids,
        }
    }

    async fn set_created_on(pool: &DynDatabasePool, id: i64, created_on: &str) {
        let created_on = chrono::DateTime::parse_from_rfc3339(created_on)
            .unwrap()
            .with_timezone(&Utc);
        sqlx::query("UPDATE posts SET created_on = ? WHERE id = ?")
            .bind(created_on)
            .bind(id)
            .execute(pool.as_sqlite().unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_post_with_categories() {
        let (_pool, repo, categories) = setup_test_repo().await;
        let rust = categories.create("Rust").await.unwrap();
        let web = categories.create("Web").await.unwrap();

        let post = repo
            .create(&post_input("Hello", vec![web.id, rust.id, rust.id]))
            .await
            .expect("Failed to create post");

        assert!(post.id > 0);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.created_on, post.last_modified);
        assert_eq!(post.categories, vec![rust, web]);
    }

    #[tokio::test]
    async fn test_create_post_with_unknown_category_rolls_back() {
        let (_pool, repo, _categories) = setup_test_repo().await;

        let result = repo.create(&post_input("Orphan", vec![404])).await;

        assert!(result.is_err());
        assert!(repo.list_recent().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_post_by_id_missing() {
        let (_pool, repo, _categories) = setup_test_repo().await;
        assert!(repo.get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let (pool, repo, _categories) = setup_test_repo().await;
        let old = repo.create(&post_input("Old", vec![])).await.unwrap();
        let new = repo.create(&post_input("New", vec![])).await.unwrap();
        let mid = repo.create(&post_input("Mid", vec![])).await.unwrap();

        set_created_on(&pool, old.id, "2020-01-01T00:00:00Z").await;
        set_created_on(&pool, new.id, "2022-01-01T00:00:00Z").await;
        set_created_on(&pool, mid.id, "2021-01-01T00:00:00Z").await;

        let titles: Vec<String> = repo
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();

        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[tokio::test]
    async fn test_list_by_category_name_substring() {
        let (pool, repo, categories) = setup_test_repo().await;
        let python = categories.create("Python").await.unwrap();
        let pythonic = categories.create("Pythonic").await.unwrap();
        let rust = categories.create("Rust").await.unwrap();

        let both = repo
            .create(&post_input("Both", vec![python.id, pythonic.id]))
            .await
            .unwrap();
        let only_rust = repo.create(&post_input("Rusty", vec![rust.id])).await.unwrap();
        let pythonic_only = repo
            .create(&post_input("Idioms", vec![pythonic.id]))
            .await
            .unwrap();
        set_created_on(&pool, both.id, "2020-01-01T00:00:00Z").await;
        set_created_on(&pool, pythonic_only.id, "2021-01-01T00:00:00Z").await;

        let posts = repo.list_by_category_name("Python").await.unwrap();
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        // Each post once, newest first, non-matching post excluded
        assert_eq!(ids, vec![pythonic_only.id, both.id]);
        assert!(!ids.contains(&only_rust.id));
        assert_eq!(posts[1].categories.len(), 2);
    }

    #[tokio::test]
    async fn test_list_by_category_name_is_case_sensitive() {
        let (_pool, repo, categories) = setup_test_repo().await;
        let python = categories.create("Python").await.unwrap();
        repo.create(&post_input("Snakes", vec![python.id])).await.unwrap();

        assert_eq!(repo.list_by_category_name("yth").await.unwrap().len(), 1);
        assert!(repo.list_by_category_name("python").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_post_keeps_created_on() {
        let (_pool, repo, categories) = setup_test_repo().await;
        let rust = categories.create("Rust").await.unwrap();
        let web = categories.create("Web").await.unwrap();
        let post = repo.create(&post_input("Draft", vec![rust.id])).await.unwrap();

        let updated = repo
            .update(
                post.id,
                &UpdatePostInput {
                    title: Some("Final".to_string()),
                    body: None,
                    category_ids: Some(vec![web.id]),
                },
            )
            .await
            .unwrap()
            .expect("Post should exist");

        assert_eq!(updated.title, "Final");
        assert_eq!(updated.body, post.body);
        assert_eq!(updated.created_on, post.created_on);
        assert!(updated.last_modified >= post.last_modified);
        assert_eq!(updated.categories, vec![web]);
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let (_pool, repo, _categories) = setup_test_repo().await;
        let result = repo.update(7, &UpdatePostInput::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_category_keeps_posts() {
        let (_pool, repo, categories) = setup_test_repo().await;
        let rust = categories.create("Rust").await.unwrap();
        let post = repo.create(&post_input("Kept", vec![rust.id])).await.unwrap();

        categories.delete(rust.id).await.unwrap();

        let found = repo.get_by_id(post.id).await.unwrap().expect("Post should remain");
        assert!(found.categories.is_empty());
    }

    #[tokio::test]
    async fn test_delete_post() {
        let (_pool, repo, _categories) = setup_test_repo().await;
        let post = repo.create(&post_input("Bye", vec![])).await.unwrap();

        assert!(repo.delete(post.id).await.unwrap());
        assert!(repo.get_by_id(post.id).await.unwrap().is_none());
        assert!(!repo.delete(post.id).await.unwrap());
    }
}
