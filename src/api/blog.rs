//! Blog pages
//!
//! - GET  /            - Post index, newest first
//! - GET  /{id}/       - Post detail with comments and comment form
//! - POST /{id}/       - Submit a comment
//! - GET  /{category}/ - Posts whose category name contains the segment
//! - GET  /{segment}   - Redirect to the slash-terminated URL

use axum::{
    extract::{rejection::FormRejection, Form, Path, State},
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use tera::Context as TeraContext;

use crate::api::error::{render_page, WebError};
use crate::api::middleware::AppState;
use crate::forms::{CommentForm, CommentFormData};

/// What a single path segment addresses
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    /// ASCII digits. `None` when the number does not fit an id.
    Post(Option<i64>),
    Category(&'a str),
}

fn classify(segment: &str) -> Segment<'_> {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        Segment::Post(segment.parse().ok())
    } else {
        Segment::Category(segment)
    }
}

/// GET /
pub async fn index(State(state): State<AppState>, uri: Uri) -> Response {
    let result = index_page(&state).await;
    render_page(&state.theme_engine, uri.path(), result)
}

async fn index_page(state: &AppState) -> Result<String, WebError> {
    let posts = state.blog_service.index().await?;

    let mut context = TeraContext::new();
    context.insert("posts", &posts);
    Ok(state.theme_engine.render("blog_index.html", &context)?)
}

/// GET /{segment}/
pub async fn show_segment(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    uri: Uri,
) -> Response {
    let result = match classify(&segment) {
        Segment::Post(Some(id)) => detail_page(&state, id, CommentForm::new()).await,
        Segment::Post(None) => Err(WebError::NotFound),
        Segment::Category(category) => category_page(&state, category).await,
    };
    render_page(&state.theme_engine, uri.path(), result)
}

/// POST /{id}/
pub async fn submit_comment(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    uri: Uri,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    // An unreadable body counts as an empty submission
    let data = match form {
        Ok(Form(pairs)) => CommentFormData::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!("Unreadable comment body: {}", rejection.body_text());
            CommentFormData::default()
        }
    };

    let result = match classify(&segment) {
        Segment::Post(Some(id)) => submit_comment_page(&state, id, data).await,
        Segment::Post(None) => Err(WebError::NotFound),
        Segment::Category(_) => Err(WebError::MethodNotAllowed),
    };
    render_page(&state.theme_engine, uri.path(), result)
}

async fn submit_comment_page(
    state: &AppState,
    post_id: i64,
    data: CommentFormData,
) -> Result<String, WebError> {
    // Unknown post is a 404 before the form is looked at
    state.blog_service.get_post(post_id).await?;

    // The bound form is rendered back either way
    let form = CommentForm::bind(data);
    match form.cleaned() {
        Some(cleaned) => {
            state.blog_service.add_comment(post_id, cleaned).await?;
        }
        None => {
            tracing::debug!(post_id, errors = ?form.errors, "Rejected comment submission");
        }
    }
    detail_page(state, post_id, form).await
}

async fn detail_page(state: &AppState, post_id: i64, form: CommentForm) -> Result<String, WebError> {
    let post = state.blog_service.get_post(post_id).await?;
    let comments = state.blog_service.comments_for(post_id).await?;

    let mut context = TeraContext::new();
    context.insert("post", &post);
    context.insert("comments", &comments);
    context.insert("form", &form);
    Ok(state.theme_engine.render("blog_detail.html", &context)?)
}

async fn category_page(state: &AppState, category: &str) -> Result<String, WebError> {
    let posts = state.blog_service.by_category(category).await?;

    let mut context = TeraContext::new();
    context.insert("category", category);
    context.insert("posts", &posts);
    Ok(state.theme_engine.render("blog_category.html", &context)?)
}

/// GET /{segment} - permanent redirect to the slash-terminated path
pub async fn append_slash(uri: Uri) -> Response {
    let target = match uri.query() {
        Some(query) => format!("{}/?{}", uri.path(), query),
        None => format!("{}/", uri.path()),
    };
    Redirect::permanent(&target).into_response()
}

/// Fallback for unmatched routes
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    WebError::NotFound.into_page(&state.theme_engine, uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_digits_as_post() {
        assert_eq!(classify("5"), Segment::Post(Some(5)));
        assert_eq!(classify("007"), Segment::Post(Some(7)));
    }

    #[test]
    fn test_classify_overflow_is_post_without_id() {
        assert_eq!(classify("99999999999999999999"), Segment::Post(None));
    }

    #[test]
    fn test_classify_category() {
        assert_eq!(classify("Python"), Segment::Category("Python"));
        assert_eq!(classify("-1"), Segment::Category("-1"));
        assert_eq!(classify("1a"), Segment::Category("1a"));
        assert_eq!(classify("٣"), Segment::Category("٣"));
    }
}
