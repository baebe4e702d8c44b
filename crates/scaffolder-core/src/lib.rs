//! Scaffolder Core - Shared library for project scaffolding CLIs
//!
//! This library provides the core functionality for scaffolding projects from templates.
//! It is designed to be used by product binaries (e.g., `drizzle-create`) that share the
//! same prompt resolution and rendering logic but declare their own questions,
//! optional packages and templates.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - String transforms, the dependency catalog, prompt
//!   definitions, the configuration resolver, template rendering, package installation
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait binding a product's
//!   prompts, catalog and template together
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{ConfigResolver, ScriptedPrompter};
//!
//! let spec = config.prompt_spec(&options)?;
//! let catalog = config.catalog()?;
//! let mut prompter = ScriptedPrompter::new().answer("title", "My site");
//! let resolved = ConfigResolver::new(&spec, &catalog)
//!     .with_defaults(config.static_defaults("my-site"))
//!     .resolve(&mut prompter)?;
//! ```

pub mod catalog;
pub mod config;
pub mod product;
pub mod prompt;
pub mod resolver;
pub mod runtime;
pub mod templates;
pub mod text;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use catalog::{CatalogError, DependencyCatalog, Package};
pub use config::ResolvedConfig;
pub use product::{ProductConfig, PromptOptions};
pub use prompt::{
    AnswerValue, Answers, Choice, DerivedField, PromptDescriptor, PromptEntry, PromptError,
    PromptKind, PromptSpec, Prompter, ScriptedPrompter,
};
pub use resolver::{ConfigResolver, ConfigurationError, ResolveError, ValidationError};
pub use runtime::PackageInstaller;
pub use templates::{render_template, TemplateFiles, TemplateManifest, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
