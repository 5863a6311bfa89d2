//! Template engine
//!
//! Renders pages with Tera. The default templates are compiled into the
//! binary; any `.html` file in the configured template directory replaces
//! the default of the same name or adds a new one.

use rust_embed::RustEmbed;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

mod error;

pub use error::ThemeError;

/// Template rendered for unknown pages
pub const NOT_FOUND_TEMPLATE: &str = "404.html";

#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct DefaultTemplates;

/// Theme engine for rendering templates
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load the embedded templates, then overrides from `override_dir` if it exists
    pub fn new(override_dir: &Path) -> Result<Self, ThemeError> {
        let mut templates = embedded_templates()?;

        let mut overrides = Vec::new();
        collect_templates_from_dir(override_dir, override_dir, &mut overrides)?;
        for (name, content) in overrides {
            tracing::debug!("Template override: {}", name);
            templates.insert(name, content);
        }

        Self::from_templates(templates)
    }

    /// Engine with only the built-in templates
    pub fn embedded() -> Result<Self, ThemeError> {
        Self::from_templates(embedded_templates()?)
    }

    fn from_templates(templates: BTreeMap<String, String>) -> Result<Self, ThemeError> {
        let mut templates: Vec<(String, String)> = templates.into_iter().collect();

        // Base templates first so children can resolve their parent
        templates.sort_by(|a, b| {
            let a_is_base = a.0 == "base.html" || a.0.ends_with("/base.html");
            let b_is_base = b.0 == "base.html" || b.0.ends_with("/base.html");
            b_is_base.cmp(&a_is_base)
        });

        let mut tera = Tera::default();
        for (name, content) in &templates {
            tera.add_raw_template(name, content).map_err(|e| {
                ThemeError::TemplateError(format!("Failed to add template {}: {}", name, e))
            })?;
        }
        tera.build_inheritance_chains().map_err(|e| {
            ThemeError::TemplateError(format!("Failed to build template inheritance: {}", e))
        })?;

        tracing::info!("Loaded {} templates", templates.len());
        Ok(Self { tera })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String, ThemeError> {
        self.tera.render(template, context).map_err(|e| {
            let mut error_msg = format!("Failed to render '{}': {}", template, e);
            let mut source = e.source();
            while let Some(s) = source {
                error_msg.push_str(&format!("\n  Caused by: {}", s));
                source = s.source();
            }
            ThemeError::TemplateError(error_msg)
        })
    }

    /// Render the not-found page for `path`. Never fails.
    pub fn render_not_found(&self, path: &str) -> String {
        let mut context = TeraContext::new();
        context.insert("path", path);
        match self.render(NOT_FOUND_TEMPLATE, &context) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to render 404 template: {}", e);
                simple_page("Page not found", "The requested page does not exist.")
            }
        }
    }

    /// Whether a template with this name is loaded
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

fn embedded_templates() -> Result<BTreeMap<String, String>, ThemeError> {
    let mut templates = BTreeMap::new();
    for name in DefaultTemplates::iter() {
        let Some(file) = DefaultTemplates::get(&name) else {
            continue;
        };
        let content = String::from_utf8(file.data.into_owned())
            .map_err(|_| ThemeError::InvalidEncoding(name.to_string()))?;
        templates.insert(name.to_string(), content);
    }
    Ok(templates)
}

/// Collect `.html` files below `current_path`, named relative to `base_path`
fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<(), ThemeError> {
    if !current_path.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(current_path)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().map_or(false, |ext| ext == "html") {
            let relative_path = path.strip_prefix(base_path).map_err(|_| {
                ThemeError::TemplateError("Failed to get relative path".to_string())
            })?;
            let template_name = relative_path.to_string_lossy().replace('\\', "/");
            let content = fs::read_to_string(&path)?;
            templates.push((template_name, content));
        }
    }

    Ok(())
}

/// Last-resort HTML when even the error template cannot render
pub fn simple_page(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
    <h1>{title}</h1>
    <p>{message}</p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests;
