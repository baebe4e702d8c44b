//! Template loading, rendering and writing
//!
//! This module provides:
//! - Template manifest types (TemplateManifest)
//! - Template loading from the binary or a local directory
//! - Rendering against a resolved configuration, with verbatim and feature-gated files
//! - Version compatibility checking

pub mod manifest;
pub mod renderer;
pub mod source;
pub mod version;

use crate::product::{ProductConfig, PromptOptions};
use crate::prompt::ScriptedPrompter;
use crate::resolver::ConfigResolver;
use anyhow::Result;
use colored::Colorize;

pub use manifest::{TemplateManifest, MANIFEST_FILE};
pub use renderer::{copy_template, render_template, write_rendered, RenderedFile};
pub use source::{TemplateFiles, TemplateSource};
pub use version::{check_compatibility, CompatibilityWarning};

/// Load a product's template and render it against its static defaults, without
/// writing anything. Catches placeholders with no matching config key.
pub fn check_template<C: ProductConfig>(config: &C, source: &TemplateSource) -> Result<()> {
    println!(
        "{}",
        format!("Checking {} ({})...", config.display_name(), source.describe())
            .cyan()
            .bold()
    );

    let template = source.load()?;
    let manifest = template.manifest();
    println!(
        "  {} {} v{} - {} files",
        "->".blue(),
        manifest.name,
        manifest.version,
        template.len()
    );

    let catalog = config.catalog()?;
    println!(
        "  {} catalog: {} packages in {} categories",
        "->".blue(),
        catalog.packages().len(),
        catalog.list_by_category().len()
    );

    let project_name = "sample-project".to_string();
    config.prompt_spec(&PromptOptions {
        full: false,
        project_name: project_name.clone(),
    })?;
    let spec = config.prompt_spec(&PromptOptions {
        full: true,
        project_name: project_name.clone(),
    })?;

    // Every prompt left at its default: the config a `--yes --full` run produces
    let sample = ConfigResolver::new(&spec, &catalog)
        .with_defaults(config.static_defaults(&project_name))
        .resolve(&mut ScriptedPrompter::new())?;

    let missing = sample.missing(&manifest.feature_keys());
    if !missing.is_empty() {
        anyhow::bail!(
            "Feature keys with no value in the configuration: {}",
            missing.join(", ")
        );
    }

    let rendered = render_template(&template, &sample)?;
    println!(
        "{} {} file(s) render cleanly",
        "OK".green().bold(),
        rendered.len()
    );

    Ok(())
}
