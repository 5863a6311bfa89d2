//! Blog service
//!
//! Read side of the blog plus comment creation:
//! - Newest-first post index
//! - Posts filtered by category name fragment
//! - Post detail with its comments
//! - Comment submission from a validated form

use crate::db::repositories::{CommentRepository, PostRepository};
use crate::forms::CleanedComment;
use crate::models::{Comment, CreateCommentInput, Post};
use anyhow::Context;
use std::sync::Arc;

/// Error types for blog service operations
#[derive(Debug, thiserror::Error)]
pub enum BlogServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    PostNotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Blog service for public post and comment access
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// All posts, newest first
    pub async fn index(&self) -> Result<Vec<Post>, BlogServiceError> {
        Ok(self
            .posts
            .list_recent()
            .await
            .context("Failed to list posts")?)
    }

    /// Posts with at least one category whose name contains `category`
    pub async fn by_category(&self, category: &str) -> Result<Vec<Post>, BlogServiceError> {
        Ok(self
            .posts
            .list_by_category_name(category)
            .await
            .context("Failed to list posts by category")?)
    }

    /// Get a post or fail with `PostNotFound`
    pub async fn get_post(&self, id: i64) -> Result<Post, BlogServiceError> {
        self.posts
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(BlogServiceError::PostNotFound(id))
    }

    /// Comments of a post, oldest first
    pub async fn comments_for(&self, post_id: i64) -> Result<Vec<Comment>, BlogServiceError> {
        Ok(self
            .comments
            .list_by_post(post_id)
            .await
            .context("Failed to list comments")?)
    }

    /// Store a comment on an existing post
    pub async fn add_comment(
        &self,
        post_id: i64,
        comment: &CleanedComment,
    ) -> Result<Comment, BlogServiceError> {
        self.get_post(post_id).await?;

        let input = CreateCommentInput {
            post_id,
            author: comment.author.clone(),
            body: comment.body.clone(),
        };
        let created = self
            .comments
            .create(&input)
            .await
            .context("Failed to create comment")?;

        tracing::info!(post_id, comment_id = created.id, "Comment created");
        Ok(created)
    }
}
