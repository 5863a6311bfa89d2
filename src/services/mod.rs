//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories. They
//! apply validation and turn missing records into typed errors.

pub mod admin;
pub mod blog;
pub mod project;

pub use admin::{AdminService, AdminServiceError};
pub use blog::{BlogService, BlogServiceError};
pub use project::{ProjectService, ProjectServiceError};
