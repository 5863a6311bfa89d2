//! HTML page errors
//!
//! Page handlers produce `Result<String, WebError>`; `render_page` turns
//! that into a response, rendering the 404 template for missing records.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::services::{BlogServiceError, ProjectServiceError};
use crate::theme::{simple_page, ThemeEngine, ThemeError};

/// Error types for HTML page handlers
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// No record or route for the requested path
    #[error("Not found")]
    NotFound,

    /// Route exists but not for this method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Template failed to render
    #[error("Template error: {0}")]
    Template(#[from] ThemeError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<BlogServiceError> for WebError {
    fn from(err: BlogServiceError) -> Self {
        match err {
            BlogServiceError::PostNotFound(_) => WebError::NotFound,
            BlogServiceError::InternalError(e) => WebError::Internal(e),
        }
    }
}

impl From<ProjectServiceError> for WebError {
    fn from(err: ProjectServiceError) -> Self {
        match err {
            ProjectServiceError::NotFound(_) => WebError::NotFound,
            ProjectServiceError::InternalError(e) => WebError::Internal(e),
        }
    }
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebError::Template(_) | WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the error page for a request to `path`
    pub fn into_page(self, theme: &ThemeEngine, path: &str) -> Response {
        let status = self.status();
        match self {
            WebError::NotFound => (status, Html(theme.render_not_found(path))).into_response(),
            WebError::MethodNotAllowed => (
                status,
                [(header::ALLOW, "GET")],
                Html(simple_page("Method not allowed", "This page only accepts GET requests.")),
            )
                .into_response(),
            WebError::Template(e) => {
                tracing::error!("Failed to render {}: {}", path, e);
                server_error(status)
            }
            WebError::Internal(e) => {
                tracing::error!("Request to {} failed: {:#}", path, e);
                server_error(status)
            }
        }
    }
}

fn server_error(status: StatusCode) -> Response {
    (
        status,
        Html(simple_page("Server error", "Something went wrong on our side.")),
    )
        .into_response()
}

/// Turn a rendered page or an error into a response
pub fn render_page(theme: &ThemeEngine, path: &str, result: Result<String, WebError>) -> Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(err) => err.into_page(theme, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WebError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(WebError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            WebError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_errors_map_to_not_found() {
        assert!(matches!(
            WebError::from(BlogServiceError::PostNotFound(1)),
            WebError::NotFound
        ));
        assert!(matches!(
            WebError::from(ProjectServiceError::NotFound(1)),
            WebError::NotFound
        ));
    }

    #[test]
    fn test_not_found_page() {
        let theme = ThemeEngine::embedded().unwrap();
        let response = WebError::NotFound.into_page(&theme, "/nope/");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let theme = ThemeEngine::embedded().unwrap();
        let response = WebError::MethodNotAllowed.into_page(&theme, "/python/");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET");
    }
}
