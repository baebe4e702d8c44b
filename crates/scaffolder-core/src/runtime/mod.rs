//! Runtime detection and package installation
//!
//! This module provides:
//! - Node.js / npm detection
//! - The package installer used after a project is written

pub mod check;
pub mod installer;

pub use check::{check_node, check_npm, check_runtime, missing_runtimes, RuntimeInfo};
pub use installer::PackageInstaller;
