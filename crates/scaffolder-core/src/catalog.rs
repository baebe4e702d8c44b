//! Registry of optional packages, grouped by category, with mutually exclusive choices
//!
//! A catalog is loaded once (usually from an embedded YAML document) and then
//! passed by reference to whatever needs it. It never changes after construction.

use crate::prompt::Choice;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Package '{0}' is listed more than once in the catalog")]
    DuplicatePackage(String),

    #[error("Category '{0}' is declared more than once")]
    DuplicateCategory(String),

    #[error("Conflict entry '{package}' -> '{conflict}' references an unknown package")]
    UnknownConflict { package: String, conflict: String },

    #[error("Package '{0}' cannot conflict with itself")]
    SelfConflict(String),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A single optional package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryFile>,
    #[serde(default)]
    conflicts: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    label: String,
    #[serde(default)]
    packages: Vec<String>,
}

/// Immutable package registry
#[derive(Debug, Clone, Default)]
pub struct DependencyCatalog {
    packages: Vec<Package>,
    categories: Vec<String>,
    conflicts: BTreeMap<String, String>,
}

impl DependencyCatalog {
    /// Build a catalog from packages (in declaration order) and `package -> conflict` pairs
    pub fn new<I, C, S>(packages: I, conflicts: C) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Package>,
        C: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        let mut seen = BTreeSet::new();

        for package in packages {
            if !seen.insert(package.name.clone()) {
                return Err(CatalogError::DuplicatePackage(package.name));
            }
            if !catalog.categories.contains(&package.category) {
                catalog.categories.push(package.category.clone());
            }
            catalog.packages.push(package);
        }

        for (package, conflict) in conflicts {
            let (package, conflict) = (package.into(), conflict.into());
            if package == conflict {
                return Err(CatalogError::SelfConflict(package));
            }
            if !seen.contains(&package) || !seen.contains(&conflict) {
                return Err(CatalogError::UnknownConflict { package, conflict });
            }
            catalog.conflicts.insert(package, conflict);
        }

        Ok(catalog)
    }

    /// Parse a catalog document:
    ///
    /// ```yaml
    /// categories:
    ///   - label: JavaScript
    ///     packages: [lodash, ramda]
    /// conflicts:
    ///   ramda: lodash
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(content)?;

        let mut labels = BTreeSet::new();
        let mut packages = Vec::new();
        for category in file.categories {
            if !labels.insert(category.label.clone()) {
                return Err(CatalogError::DuplicateCategory(category.label));
            }
            packages.extend(category.packages.into_iter().map(|name| Package {
                name,
                category: category.label.clone(),
            }));
        }

        Self::new(packages, file.conflicts)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().any(|p| p.name == name)
    }

    /// Categories in declaration order, each with its packages in declaration order
    pub fn list_by_category(&self) -> Vec<(&str, Vec<&str>)> {
        self.categories
            .iter()
            .map(|category| {
                let names = self
                    .packages
                    .iter()
                    .filter(|p| &p.category == category)
                    .map(|p| p.name.as_str())
                    .collect();
                (category.as_str(), names)
            })
            .collect()
    }

    /// The package registered as conflicting with `name`, if any
    pub fn conflict_of(&self, name: &str) -> Option<&str> {
        self.conflicts.get(name).map(String::as_str)
    }

    /// Every package reachable from `name` through conflict entries in either
    /// direction, `name` included. A cycle such as a -> b -> c -> a forms one group.
    pub fn conflict_group(&self, name: &str) -> BTreeSet<&str> {
        let mut group = BTreeSet::new();
        let Some(start) = self.packages.iter().find(|p| p.name == name) else {
            return group;
        };

        let mut pending = vec![start.name.as_str()];
        while let Some(current) = pending.pop() {
            if !group.insert(current) {
                continue;
            }
            for (package, conflict) in &self.conflicts {
                if package == current {
                    pending.push(conflict);
                } else if conflict == current {
                    pending.push(package);
                }
            }
        }

        group
    }

    /// The part of `selection` that shares a conflict group with another selected
    /// package, in selection order
    pub fn conflicting<'s>(&self, selection: &'s [String]) -> Vec<&'s str> {
        selection
            .iter()
            .filter(|name| {
                let group = self.conflict_group(name);
                selection
                    .iter()
                    .any(|other| other != *name && group.contains(other.as_str()))
            })
            .map(String::as_str)
            .collect()
    }

    /// Choice list for a multi-choice prompt: a separator before each category's packages
    pub fn choices(&self) -> Vec<Choice> {
        self.list_by_category()
            .into_iter()
            .flat_map(|(category, names)| {
                std::iter::once(Choice::separator(category))
                    .chain(names.into_iter().map(Choice::item))
            })
            .collect()
    }
}
