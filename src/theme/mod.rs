//! Theme engine
//!
//! Template rendering using Tera. The default templates are compiled into
//! the binary; a theme directory on disk may override any of them by file
//! name or add new ones.

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

mod error;

pub use error::ThemeError;

/// Templates every theme must be able to render
pub const REQUIRED_TEMPLATES: &[&str] = &[
    "index.html",
    "about.html",
    "contact.html",
    "post.html",
    "login.html",
    "dashboard.html",
    "edit.html",
    "error.html",
];

/// Embedded default templates
#[derive(RustEmbed)]
#[folder = "themes/default/"]
#[include = "*.html"]
struct DefaultTemplates;

/// Theme engine for rendering templates
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load the embedded templates, then any overrides from `override_path`.
    pub fn new(override_path: Option<&Path>) -> Result<Self> {
        let mut templates = embedded_templates()?;

        if let Some(path) = override_path {
            if !path.is_dir() {
                return Err(ThemeError::NotFound(path.display().to_string()).into());
            }
            let mut overrides = Vec::new();
            collect_templates_from_dir(path, path, &mut overrides)?;
            for (name, content) in overrides {
                tracing::debug!("Template {} loaded from {:?}", name, path);
                templates.insert(name, content);
            }
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ThemeError::TemplateError(format!("Failed to load templates: {}", e)))?;

        for name in REQUIRED_TEMPLATES {
            if !tera.get_template_names().any(|t| t == *name) {
                return Err(ThemeError::TemplateError(format!("Missing template: {}", name)).into());
            }
        }

        Ok(Self { tera })
    }

    /// Engine with the embedded templates only
    pub fn embedded() -> Result<Self> {
        Self::new(None)
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            let mut error_msg = format!("Failed to render '{}': {}", template, e);
            let mut source = e.source();
            while let Some(s) = source {
                error_msg.push_str(&format!("\n  Caused by: {}", s));
                source = s.source();
            }
            ThemeError::TemplateError(error_msg).into()
        })
    }
}

fn embedded_templates() -> Result<BTreeMap<String, String>> {
    let mut templates = BTreeMap::new();
    for name in DefaultTemplates::iter() {
        let file = DefaultTemplates::get(&name)
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
        let content = String::from_utf8(file.data.into_owned())
            .map_err(|e| ThemeError::TemplateError(format!("{} is not UTF-8: {}", name, e)))?;
        templates.insert(name.to_string(), content);
    }
    Ok(templates)
}

/// Collect `.html` templates below `current_path`, named relative to `base_path`
fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<()> {
    for entry in fs::read_dir(current_path).map_err(ThemeError::IoError)? {
        let path = entry.map_err(ThemeError::IoError)?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            let relative_path = path
                .strip_prefix(base_path)
                .map_err(|_| ThemeError::TemplateError("Failed to get relative path".to_string()))?;

            // Forward slashes on every platform
            let template_name = relative_path.to_string_lossy().replace('\\', "/");

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;

            templates.push((template_name, content));
        }
    }

    Ok(())
}
