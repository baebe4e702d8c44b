//! Version comparison for CLI and template compatibility

use semver::Version;
use std::fmt;

/// The template expects a newer CLI than the one running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityWarning {
    pub required: Version,
    pub running: Version,
    pub upgrade_command: String,
}

impl fmt::Display for CompatibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "This template was designed for CLI version {} or newer, you are running {}. Consider updating: {}",
            self.required, self.running, self.upgrade_command
        )
    }
}

/// Compare CLI version against template version.
/// Unparseable versions are not compared.
pub fn check_compatibility(
    cli_version: &str,
    template_version: &str,
    upgrade_command: &str,
) -> Option<CompatibilityWarning> {
    let running = parse_version(cli_version)?;
    let required = parse_version(template_version)?;

    (running < required).then(|| CompatibilityWarning {
        required,
        running,
        upgrade_command: upgrade_command.to_string(),
    })
}

/// Parse a version string, accepting a leading `v`
fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    Version::parse(cleaned.strip_prefix('v').unwrap_or(cleaned)).ok()
}
