//! Package installation via the project's package manager
//!
//! Installs the packages picked during prompting into a freshly written
//! project. Output is streamed as it arrives and the whole run is bounded by a
//! timeout, since a registry that stops answering would otherwise hang the CLI.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Default timeout for an install run (5 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Grace period for the process to exit once its output closed
const EXIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `<program> install` for a list of packages
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    program: String,
    timeout: Duration,
}

impl Default for PackageInstaller {
    fn default() -> Self {
        Self::npm()
    }
}

impl PackageInstaller {
    /// Installer for an arbitrary npm-compatible program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: INSTALL_TIMEOUT,
        }
    }

    pub fn npm() -> Self {
        Self::new("npm")
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program, packages kept in selection order
    pub fn install_args(packages: &[String], dev: bool) -> Vec<String> {
        let flag = if dev { "--save-dev" } else { "--save" };
        ["install", flag]
            .into_iter()
            .map(String::from)
            .chain(packages.iter().cloned())
            .collect()
    }

    /// The full command line, for display and for manual fallback
    pub fn command_line(&self, packages: &[String], dev: bool) -> String {
        std::iter::once(self.program.clone())
            .chain(Self::install_args(packages, dev))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Install packages into `cwd`. Does nothing for an empty list.
    pub async fn install(&self, packages: &[String], dev: bool, cwd: &Path) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let cmd = self.command_line(packages, dev);
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new(&self.program)
            .args(Self::install_args(packages, dev))
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture installer stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("Failed to capture installer stderr")?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        // Drain both pipes until each is closed, or a chatty child blocks on a full one
        let output_task = async {
            let mut stdout_open = true;
            let mut stderr_open = true;
            while stdout_open || stderr_open {
                tokio::select! {
                    line = stdout_reader.next_line(), if stdout_open => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => stdout_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                stdout_open = false;
                            }
                        }
                    }
                    line = stderr_reader.next_line(), if stderr_open => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                                stderr_open = false;
                            }
                        }
                    }
                    else => break,
                }
            }
        };

        if timeout(self.timeout, output_task).await.is_err() {
            let _ = child.kill().await;
            println!();
            anyhow::bail!(
                "Package installation timed out after {} seconds.\n\
                 Run it yourself once the registry is reachable:\n\
                 {}",
                self.timeout.as_secs(),
                cmd
            );
        }

        match timeout(EXIT_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => {
                println!();
                if status.success() {
                    Ok(())
                } else {
                    anyhow::bail!(
                        "Package installation failed with exit code: {}\n\
                         Please try installing manually: {}",
                        status.code().unwrap_or(-1),
                        cmd
                    );
                }
            }
            Ok(Err(e)) => anyhow::bail!("Failed to wait for {}: {}", self.program, e),
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!(
                    "Package installation hung. Please try installing manually:\n{}",
                    cmd
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn packages(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_install_args_dev() {
        let args = PackageInstaller::install_args(&packages(&["gsap", "ramda"]), true);
        assert_eq!(args, vec!["install", "--save-dev", "gsap", "ramda"]);
    }

    #[test]
    fn test_install_args_runtime() {
        let args = PackageInstaller::install_args(&packages(&["jquery"]), false);
        assert_eq!(args, vec!["install", "--save", "jquery"]);
    }

    #[test]
    fn test_command_line_keeps_selection_order() {
        let installer = PackageInstaller::npm();
        assert_eq!(
            installer.command_line(&packages(&["ramda", "gsap", "moment"]), true),
            "npm install --save-dev ramda gsap moment"
        );
    }

    #[tokio::test]
    async fn test_empty_list_is_noop() {
        let dir = TempDir::new().unwrap();
        // Would fail to spawn if it ran at all
        let installer = PackageInstaller::new("definitely-not-a-package-manager");
        installer.install(&[], true, dir.path()).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stderr_is_drained_after_stdout_closes() {
        let dir = TempDir::new().unwrap();
        // `sh install --save-dev gsap` runs this file. It closes stdout first, then
        // writes more to stderr than a pipe buffer holds.
        std::fs::write(
            dir.path().join("install"),
            "exec 1>&-\nyes 'npm WARN deprecated some-package@1.0.0' | head -n 5000 >&2\n",
        )
        .unwrap();

        let installer = PackageInstaller::new("sh").with_timeout(Duration::from_secs(30));
        installer
            .install(&packages(&["gsap"]), true, dir.path())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_program_fails() {
        let dir = TempDir::new().unwrap();
        let installer = PackageInstaller::new("definitely-not-a-package-manager")
            .with_timeout(Duration::from_secs(5));
        let err = installer
            .install(&packages(&["gsap"]), true, dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-package-manager"));
    }
}
