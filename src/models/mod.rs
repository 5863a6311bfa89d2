//! Data models
//!
//! Database entities (Category, Post, Comment, Project) and the inputs used
//! to create and update them.

mod category;
mod comment;
mod post;
mod project;

pub use category::{Category, CategoryInput, CATEGORY_NAME_MAX_LEN};
pub use comment::{Comment, CreateCommentInput, COMMENT_AUTHOR_MAX_LEN};
pub use post::{CreatePostInput, Post, UpdatePostInput, POST_TITLE_MAX_LEN};
pub use project::{
    CreateProjectInput, Project, UpdateProjectInput, PROJECT_TECHNOLOGY_MAX_LEN,
    PROJECT_TITLE_MAX_LEN,
};
