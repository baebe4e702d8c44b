//! The interactive `create` flow

use super::prompter::CliclackPrompter;
use crate::config::ResolvedConfig;
use crate::product::{ProductConfig, PromptOptions};
use crate::prompt::{Prompter, ScriptedPrompter};
use crate::resolver::{ConfigResolver, ResolveError};
use crate::runtime::{check, PackageInstaller};
use crate::templates::{copy_template, version, TemplateFiles, TemplateSource};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use as the template instead of the built-in one
    pub template_dir: Option<PathBuf>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Start in full setup mode
    pub full: bool,

    /// YAML file of answers, for non-interactive runs
    pub answers: Option<PathBuf>,

    /// Accept every default without asking
    pub yes: bool,

    /// Do not install the selected packages
    pub skip_install: bool,
}

impl CreateArgs {
    fn interactive(&self) -> bool {
        self.answers.is_none() && !self.yes
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;
    cliclack::log::info(config.intro())?;

    // Step 1: Load template
    let template = load_template(config, &args, cli_version)?;

    // Step 2: Select directory
    let project_dir = select_directory(&args)?;
    let project_name = project_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    // Step 3: Ask the questions
    let resolved = resolve_config(config, &args, &project_name)?;
    print_summary(&resolved)?;

    // Step 4: Create project
    create_project(&template, &resolved, &project_dir).await?;

    // Step 5: Install selected packages
    install_packages(config, &args, &resolved, &project_dir).await?;

    // Step 6: Show next steps
    print_next_steps(config, &project_dir, &resolved)?;

    Ok(())
}

fn load_template<C: ProductConfig>(
    config: &C,
    args: &CreateArgs,
    cli_version: &str,
) -> Result<TemplateFiles> {
    let source = TemplateSource::from_config(config, args.template_dir.as_deref());

    let spinner = cliclack::spinner();
    spinner.start(format!("Loading {}...", source.describe()));
    let template = match source.load() {
        Ok(template) => template,
        Err(e) => {
            spinner.stop("Failed to load template");
            return Err(e);
        }
    };
    let manifest = template.manifest();
    spinner.stop(format!(
        "Template: {} - {}",
        manifest.name, manifest.description
    ));

    if let Some(warning) =
        version::check_compatibility(cli_version, &manifest.version, config.upgrade_command())
    {
        cliclack::log::warning(format!("Version warning: {}", warning))?;
    }

    Ok(template)
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Use --directory flag if provided
    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if !args.interactive() {
        current_dir
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(".")
            .default_input(".")
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            let p = PathBuf::from(&input);
            if p.is_absolute() {
                p
            } else {
                current_dir.join(p)
            }
        }
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Warn if directory exists and has files
    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                let confirm = if args.interactive() {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                } else {
                    true
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

fn resolve_config<C: ProductConfig>(
    config: &C,
    args: &CreateArgs,
    project_name: &str,
) -> Result<ResolvedConfig> {
    let spec = config.prompt_spec(&PromptOptions {
        full: args.full,
        project_name: project_name.to_string(),
    })?;
    let catalog = config.catalog()?;
    let resolver =
        ConfigResolver::new(&spec, &catalog).with_defaults(config.static_defaults(project_name));

    let mut prompter: Box<dyn Prompter> = match &args.answers {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read answers file {}", path.display()))?;
            cliclack::log::info(format!("Using answers from {}", path.display()))?;
            Box::new(
                ScriptedPrompter::from_yaml(&content)
                    .with_context(|| format!("Failed to parse answers file {}", path.display()))?,
            )
        }
        None if args.yes => {
            cliclack::log::info("Accepting defaults (--yes mode)")?;
            Box::new(ScriptedPrompter::new())
        }
        None => Box::new(CliclackPrompter::new()),
    };

    match resolver.resolve(prompter.as_mut()) {
        Ok(resolved) => Ok(resolved),
        Err(ResolveError::Cancelled) => {
            cliclack::outro_cancel("Setup cancelled.")?;
            anyhow::bail!("Setup cancelled.");
        }
        Err(e) => {
            cliclack::log::error(format!("{}", e))?;
            Err(e.into())
        }
    }
}

fn print_summary(resolved: &ResolvedConfig) -> Result<()> {
    let lines: Vec<String> = resolved
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect();
    cliclack::note("Configuration", lines.join("\n"))?;
    Ok(())
}

async fn create_project(
    template: &TemplateFiles,
    resolved: &ResolvedConfig,
    project_dir: &Path,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let written = match copy_template(template, resolved, project_dir).await {
        Ok(written) => written,
        Err(e) => {
            spinner.stop("Failed to create project");
            return Err(e);
        }
    };

    spinner.stop(format!(
        "Created {} files in {}",
        written.len(),
        project_dir.display()
    ));

    Ok(())
}

async fn install_packages<C: ProductConfig>(
    config: &C,
    args: &CreateArgs,
    resolved: &ResolvedConfig,
    project_dir: &Path,
) -> Result<()> {
    let packages = resolved.list(config.packages_key()).unwrap_or_default();
    if packages.is_empty() {
        return Ok(());
    }

    let installer = PackageInstaller::npm();
    let command = installer.command_line(packages, config.install_as_dev());

    if args.skip_install {
        cliclack::log::info(format!("Skipping package installation. Run later: {}", command))?;
        return Ok(());
    }

    let runtimes = [check::check_node(), check::check_npm()];
    let missing = check::missing_runtimes(&runtimes);
    if !missing.is_empty() {
        cliclack::log::warning(format!(
            "{} not found, packages were not installed. Run this in the project: {}",
            missing.join(" and "),
            command
        ))?;
        return Ok(());
    }
    let [node, npm] = &runtimes;

    cliclack::log::step(format!(
        "Installing {} with {} {} (Node.js {})",
        packages.join(", "),
        installer.program(),
        npm.version.as_deref().unwrap_or("unknown"),
        node.version.as_deref().unwrap_or("unknown")
    ))?;

    match installer
        .install(packages, config.install_as_dev(), project_dir)
        .await
    {
        Ok(()) => cliclack::log::success("Packages installed")?,
        Err(e) => cliclack::log::warning(format!("{}", e))?,
    }

    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    resolved: &ResolvedConfig,
) -> Result<()> {
    let steps = config.next_steps(project_dir, resolved);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
