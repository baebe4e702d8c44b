//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface that each product must implement to
//! configure the scaffolding behavior for its specific needs.

use crate::catalog::{CatalogError, DependencyCatalog};
use crate::config::ResolvedConfig;
use crate::prompt::PromptSpec;
use crate::resolver::ConfigurationError;
use include_dir::Dir;
use std::path::Path;

/// Run options that shape the prompt list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptOptions {
    /// Start from the full prompt set rather than the short one
    pub full: bool,

    /// Name of the target directory, the same one passed to `static_defaults`
    pub project_name: String,
}

/// Configuration trait for different CLI products
///
/// Each product implements this trait to define:
/// - Product identity (display name, intro banner)
/// - The questions asked, their static defaults and derived fields
/// - The optional package catalog
/// - The embedded template and its override variable
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Banner shown before the first question
    fn intro(&self) -> &'static str;

    /// Template compiled into the binary
    fn embedded_template(&self) -> &'static Dir<'static>;

    /// Environment variable name for overriding the template directory
    fn template_dir_env(&self) -> &'static str;

    /// Ordered questions and derived fields
    fn prompt_spec(&self, options: &PromptOptions) -> Result<PromptSpec, ConfigurationError>;

    /// Optional packages offered by catalog prompts
    fn catalog(&self) -> Result<DependencyCatalog, CatalogError>;

    /// Values every resolved configuration starts from.
    /// `project_name` is the name of the target directory.
    fn static_defaults(&self, project_name: &str) -> ResolvedConfig;

    /// Config key holding the packages to install
    fn packages_key(&self) -> &'static str {
        "dependencies"
    }

    /// Whether selected packages are installed as development dependencies
    fn install_as_dev(&self) -> bool {
        true
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, config: &ResolvedConfig) -> Vec<String>;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;
}
