//! Template manifest types and parsing

use crate::config::ResolvedConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Manifest file name at the root of every template
pub const MANIFEST_FILE: &str = "template.yaml";

/// Per-template manifest (`<template>/template.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,

    /// Files copied byte-for-byte instead of rendered
    #[serde(default)]
    pub verbatim: Vec<String>,

    /// Files only emitted when the boolean config key they are listed under is true
    #[serde(default)]
    pub features: BTreeMap<String, Vec<String>>,
}

impl TemplateManifest {
    /// Check if a path matches any pattern in a list
    ///
    /// `*.png` matches by suffix, `.github/*` by prefix, anything else exactly.
    fn matches_any(path: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                path.ends_with(suffix)
            } else if let Some(prefix) = pattern.strip_suffix('*') {
                path.starts_with(prefix)
            } else {
                path == pattern
            }
        })
    }

    /// Should this file be copied as-is?
    pub fn is_verbatim(&self, path: &str) -> bool {
        Self::matches_any(path, &self.verbatim)
    }

    /// The feature key gating this file, if any
    pub fn feature_for(&self, path: &str) -> Option<&str> {
        self.features
            .iter()
            .find(|(_, patterns)| Self::matches_any(path, patterns))
            .map(|(key, _)| key.as_str())
    }

    /// Should this file be emitted for the given configuration?
    /// Missing or non-boolean feature keys count as disabled.
    pub fn should_include(&self, path: &str, config: &ResolvedConfig) -> bool {
        if path == MANIFEST_FILE {
            return false;
        }
        match self.feature_for(path) {
            Some(key) => config.flag(key).unwrap_or(false),
            None => true,
        }
    }

    /// Feature keys the manifest expects in every configuration
    pub fn feature_keys(&self) -> Vec<&str> {
        self.features.keys().map(String::as_str).collect()
    }
}
