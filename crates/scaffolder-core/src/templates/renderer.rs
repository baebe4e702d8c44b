//! Template rendering and writing
//!
//! Rendering happens fully in memory first. Nothing is written unless every
//! file rendered, so a placeholder without a config key leaves the target untouched.

use super::source::TemplateFiles;
use crate::config::ResolvedConfig;
use anyhow::{Context, Result};
use minijinja::{Environment, UndefinedBehavior};
use std::path::Path;
use tokio::fs;

/// One output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: String,
    pub content: Vec<u8>,
}

/// Render every included file of a template against the configuration
pub fn render_template(template: &TemplateFiles, config: &ResolvedConfig) -> Result<Vec<RenderedFile>> {
    let manifest = template.manifest();

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    let mut rendered = Vec::new();
    for (path, content) in template.files() {
        if !manifest.should_include(path, config) {
            continue;
        }

        let content = if manifest.is_verbatim(path) {
            content.to_vec()
        } else {
            let source = std::str::from_utf8(content)
                .with_context(|| format!("Template file '{}' is not valid UTF-8; list it under `verbatim`", path))?;
            env.render_str(source, config)
                .with_context(|| format!("Failed to render template file '{}'", path))?
                .into_bytes()
        };

        rendered.push(RenderedFile {
            path: path.to_string(),
            content,
        });
    }

    Ok(rendered)
}

/// Write rendered files below the target directory
pub async fn write_rendered(target_dir: &Path, files: &[RenderedFile]) -> Result<()> {
    // Ensure target directory exists
    fs::create_dir_all(target_dir)
        .await
        .context("Failed to create target directory")?;

    for file in files {
        let target_path = target_dir.join(&file.path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, &file.content)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;
    }

    Ok(())
}

/// Render then write. Returns the written paths.
pub async fn copy_template(
    template: &TemplateFiles,
    config: &ResolvedConfig,
    target_dir: &Path,
) -> Result<Vec<String>> {
    let rendered = render_template(template, config)?;
    write_rendered(target_dir, &rendered).await?;
    Ok(rendered.into_iter().map(|f| f.path).collect())
}
