//! HTTP layer - handlers and routing
//!
//! - Blog pages (index, category listing, post detail with comments)
//! - Project pages
//! - Admin JSON API
//! - Health check

pub mod admin;
pub mod blog;
pub mod error;
pub mod health;
pub mod middleware;
pub mod projects;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

pub use error::WebError;
pub use middleware::{ApiError, AppState};

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    let admin_routes = admin::router().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::require_admin,
    ));

    Router::new()
        .route("/", get(blog::index))
        .route("/healthz", get(health::healthz))
        .route("/projects/", get(projects::index))
        .route("/projects/{id}/", get(projects::detail))
        .nest("/admin", admin_routes)
        .route(
            "/{segment}/",
            get(blog::show_segment).post(blog::submit_comment),
        )
        .route("/{segment}", get(blog::append_slash))
        .route("/projects/{id}", get(blog::append_slash))
        .fallback(blog::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
