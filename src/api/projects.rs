//! Project pages
//!
//! - GET /projects/      - All projects
//! - GET /projects/{id}/ - Project detail

use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};
use tera::Context as TeraContext;

use crate::api::error::{render_page, WebError};
use crate::api::middleware::AppState;

/// GET /projects/
pub async fn index(State(state): State<AppState>, uri: Uri) -> Response {
    let result = index_page(&state).await;
    render_page(&state.theme_engine, uri.path(), result)
}

async fn index_page(state: &AppState) -> Result<String, WebError> {
    let projects = state.project_service.list().await?;

    let mut context = TeraContext::new();
    context.insert("projects", &projects);
    Ok(state.theme_engine.render("project_index.html", &context)?)
}

/// GET /projects/{id}/
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    let result = detail_page(&state, &id).await;
    render_page(&state.theme_engine, uri.path(), result)
}

async fn detail_page(state: &AppState, id: &str) -> Result<String, WebError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WebError::NotFound);
    }
    let id: i64 = id.parse().map_err(|_| WebError::NotFound)?;
    let project = state.project_service.get(id).await?;

    let mut context = TeraContext::new();
    context.insert("project", &project);
    Ok(state.theme_engine.render("project_detail.html", &context)?)
}
