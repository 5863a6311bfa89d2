//! Tests for the template engine

use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_embedded_templates_load() {
    let engine = ThemeEngine::embedded().unwrap();
    for name in [
        "base.html",
        "blog_index.html",
        "blog_category.html",
        "blog_detail.html",
        "project_index.html",
        "project_detail.html",
        "404.html",
    ] {
        assert!(engine.has_template(name), "missing {}", name);
    }
}

#[test]
fn test_missing_override_dir_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let engine = ThemeEngine::new(&temp_dir.path().join("nope")).unwrap();
    assert!(engine.has_template("blog_index.html"));
}

#[test]
fn test_override_replaces_default() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("404.html"),
        "{% extends \"base.html\" %}{% block page_content %}custom {{ path }}{% endblock %}",
    )
    .unwrap();

    let engine = ThemeEngine::new(temp_dir.path()).unwrap();
    let html = engine.render_not_found("/missing/");
    // Templates are autoescaped, `/` included
    assert!(html.contains("custom &#x2F;missing&#x2F;"));
    assert!(html.contains("<nav>"));
}

#[test]
fn test_override_can_add_nested_templates() {
    let temp_dir = TempDir::new().unwrap();
    let partials = temp_dir.path().join("partials");
    fs::create_dir_all(&partials).unwrap();
    fs::write(partials.join("extra.html"), "extra").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

    let engine = ThemeEngine::new(temp_dir.path()).unwrap();
    assert!(engine.has_template("partials/extra.html"));
    assert!(!engine.has_template("notes.txt"));
}

#[test]
fn test_broken_override_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("blog_index.html"), "{% block %}").unwrap();
    assert!(matches!(
        ThemeEngine::new(temp_dir.path()),
        Err(ThemeError::TemplateError(_))
    ));
}

#[test]
fn test_render_unknown_template_errors() {
    let engine = ThemeEngine::embedded().unwrap();
    let result = engine.render("nope.html", &TeraContext::new());
    assert!(matches!(result, Err(ThemeError::TemplateError(_))));
}

#[test]
fn test_render_not_found_falls_back_to_simple_page() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("404.html"), "{{ missing_variable }}").unwrap();

    let engine = ThemeEngine::new(temp_dir.path()).unwrap();
    let html = engine.render_not_found("/x/");
    assert!(html.contains("Page not found"));
}

#[test]
fn test_detail_escapes_comment_body() {
    let engine = ThemeEngine::embedded().unwrap();
    let mut context = TeraContext::new();
    context.insert(
        "post",
        &serde_json::json!({
            "id": 1,
            "title": "Post",
            "body": "Body",
            "created_on": "2024-01-02T03:04:05Z",
            "last_modified": "2024-01-02T03:04:05Z",
            "categories": [],
        }),
    );
    context.insert(
        "comments",
        &serde_json::json!([{
            "id": 1,
            "author": "Mallory",
            "body": "<script>alert(1)</script>",
            "created_on": "2024-01-02T03:04:05Z",
            "post_id": 1,
        }]),
    );
    context.insert("form", &crate::forms::CommentForm::new());

    let html = engine.render("blog_detail.html", &context).unwrap();
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_simple_page() {
    let html = simple_page("Oops", "Something broke");
    assert!(html.contains("<h1>Oops</h1>"));
    assert!(html.contains("Something broke"));
}
