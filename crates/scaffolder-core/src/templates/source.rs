//! Template loading from the binary or from a local directory
//!
//! Both sources are read into the same in-memory form ([`TemplateFiles`]), so
//! rendering behaves identically during development and in release builds.

use super::manifest::{TemplateManifest, MANIFEST_FILE};
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use include_dir::{Dir, DirEntry};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Template source - either compiled into the binary or a local directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Embedded(&'static Dir<'static>),
    Local(PathBuf),
}

impl TemplateSource {
    /// Pick the template for a product: an explicit directory, then the product's
    /// environment variable, then the embedded template
    pub fn from_config<C: ProductConfig>(config: &C, template_dir: Option<&Path>) -> Self {
        if let Some(dir) = template_dir {
            return Self::Local(dir.to_path_buf());
        }
        match std::env::var(config.template_dir_env()) {
            Ok(dir) if !dir.trim().is_empty() => Self::Local(PathBuf::from(dir)),
            _ => Self::Embedded(config.embedded_template()),
        }
    }

    /// Human-readable origin, for log messages
    pub fn describe(&self) -> String {
        match self {
            TemplateSource::Embedded(_) => "built-in template".to_string(),
            TemplateSource::Local(path) => format!("local template at {}", path.display()),
        }
    }

    /// Read every file and parse the manifest
    pub fn load(&self) -> Result<TemplateFiles> {
        let files = match self {
            TemplateSource::Embedded(dir) => {
                let mut files = BTreeMap::new();
                collect_embedded(dir, &mut files);
                files
            }
            TemplateSource::Local(path) => read_local(path)?,
        };
        TemplateFiles::new(files)
    }
}

fn collect_embedded(dir: &'static Dir<'static>, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::File(file) => {
                files.insert(to_template_path(file.path()), file.contents().to_vec());
            }
            DirEntry::Dir(subdir) => collect_embedded(subdir, files),
        }
    }
}

fn read_local(root: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
    if !root.is_dir() {
        anyhow::bail!("Template directory not found: {}", root.display());
    }

    let mut files = BTreeMap::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry =
            entry.with_context(|| format!("Failed to read template directory {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is outside the template", entry.path().display()))?;
        let content = std::fs::read(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        files.insert(to_template_path(relative), content);
    }

    Ok(files)
}

/// Forward-slash relative path, independent of the host platform
fn to_template_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A loaded template: its manifest and every file keyed by relative path
#[derive(Debug, Clone)]
pub struct TemplateFiles {
    manifest: TemplateManifest,
    files: BTreeMap<String, Vec<u8>>,
}

impl TemplateFiles {
    pub fn new(files: BTreeMap<String, Vec<u8>>) -> Result<Self> {
        let raw = files
            .get(MANIFEST_FILE)
            .ok_or_else(|| anyhow::anyhow!("Template is missing {}", MANIFEST_FILE))?;
        let manifest: TemplateManifest = serde_yaml::from_str(&String::from_utf8_lossy(raw))
            .with_context(|| format!("Failed to parse {}", MANIFEST_FILE))?;

        Ok(Self { manifest, files })
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    /// Files in path order, manifest included
    pub fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(path, content)| (path.as_str(), content.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = "name: Test\ndescription: Test template\nversion: 0.1.0\n";

    #[test]
    fn test_load_local_template() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        std::fs::create_dir_all(dir.path().join(".github")).unwrap();
        std::fs::write(dir.path().join(".github/CODEOWNERS"), "* @me").unwrap();
        std::fs::write(dir.path().join("README.md"), "# {{ title }}").unwrap();

        let template = TemplateSource::Local(dir.path().to_path_buf()).load().unwrap();

        assert_eq!(template.manifest().name, "Test");
        let paths: Vec<_> = template.files().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![".github/CODEOWNERS", "README.md", MANIFEST_FILE]);
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "hi").unwrap();

        let err = TemplateSource::Local(dir.path().to_path_buf())
            .load()
            .unwrap_err();
        assert!(err.to_string().contains(MANIFEST_FILE));
    }

    #[test]
    fn test_missing_directory() {
        let err = TemplateSource::Local(PathBuf::from("/definitely/not/here"))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
