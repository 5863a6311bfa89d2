//! Admin API endpoints
//!
//! JSON record management, mounted under `/admin` behind `require_admin`:
//! - /categories, /categories/{id}
//! - /posts, /posts/{id}
//! - /projects, /projects/{id}

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::api::middleware::{AdminJson, AdminPath, ApiError, AppState};
use crate::models::{
    Category, CategoryInput, CreatePostInput, CreateProjectInput, Post, Project, UpdatePostInput,
    UpdateProjectInput,
};

/// Build the admin router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}

// ============================================================================
// Categories
// ============================================================================

/// GET /admin/categories
async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.admin_service.list_categories().await?))
}

/// POST /admin/categories
async fn create_category(
    State(state): State<AppState>,
    AdminJson(body): AdminJson<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.admin_service.create_category(body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /admin/categories/{id}
async fn get_category(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.admin_service.get_category(id).await?))
}

/// PUT /admin/categories/{id}
async fn update_category(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
    AdminJson(body): AdminJson<CategoryInput>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.admin_service.update_category(id, body).await?))
}

/// DELETE /admin/categories/{id}
async fn delete_category(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.admin_service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Posts
// ============================================================================

/// GET /admin/posts
async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.admin_service.list_posts().await?))
}

/// POST /admin/posts
async fn create_post(
    State(state): State<AppState>,
    AdminJson(body): AdminJson<CreatePostInput>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.admin_service.create_post(body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /admin/posts/{id}
async fn get_post(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.admin_service.get_post(id).await?))
}

/// PUT /admin/posts/{id}
async fn update_post(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
    AdminJson(body): AdminJson<UpdatePostInput>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.admin_service.update_post(id, body).await?))
}

/// DELETE /admin/posts/{id} - comments go with the post
async fn delete_post(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.admin_service.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Projects
// ============================================================================

/// GET /admin/projects
async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.admin_service.list_projects().await?))
}

/// POST /admin/projects
async fn create_project(
    State(state): State<AppState>,
    AdminJson(body): AdminJson<CreateProjectInput>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.admin_service.create_project(body).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /admin/projects/{id}
async fn get_project(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.admin_service.get_project(id).await?))
}

/// PUT /admin/projects/{id}
async fn update_project(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
    AdminJson(body): AdminJson<UpdateProjectInput>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.admin_service.update_project(id, body).await?))
}

/// DELETE /admin/projects/{id}
async fn delete_project(
    State(state): State<AppState>,
    AdminPath(id): AdminPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.admin_service.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
