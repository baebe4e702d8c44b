//! Runtime detection for Node.js and npm

use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<program> --version` and report what came back
pub fn check_runtime(name: &'static str, program: &str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    check_runtime("Node.js", "node")
}

/// Check if npm is available
pub fn check_npm() -> RuntimeInfo {
    check_runtime("npm", "npm")
}

/// Names of the runtimes that were not found, in the order given
pub fn missing_runtimes(runtimes: &[RuntimeInfo]) -> Vec<&'static str> {
    runtimes
        .iter()
        .filter(|runtime| !runtime.available)
        .map(|runtime| runtime.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_runtime() {
        let info = check_runtime("Nothing", "definitely-not-a-runtime");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert_eq!(info.name, "Nothing");
    }

    #[test]
    fn test_missing_runtimes_lists_unavailable_only() {
        let found = RuntimeInfo {
            name: "Node.js",
            version: Some("v20.0.0".to_string()),
            available: true,
        };
        let runtimes = [found, check_runtime("npm", "definitely-not-npm")];
        assert_eq!(missing_runtimes(&runtimes), vec!["npm"]);
        assert!(missing_runtimes(&runtimes[..1]).is_empty());
    }
}
