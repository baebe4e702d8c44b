//! Drizzle CLI - Project scaffolding for Drizzle pattern libraries

mod product;

use anyhow::Result;
use clap::{Parser, Subcommand};
use product::DrizzleConfig;
use scaffolder_core::templates::check_template;
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::TemplateSource;
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "drizzle-create")]
#[command(about = "CLI for scaffolding Drizzle pattern library projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Drizzle project
    Create(CliCreateArgs),
    /// Validate the catalog, prompts and template without writing anything (for development use)
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Local directory to use as the template instead of the built-in one (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Present the full list of prompts
    #[arg(long)]
    pub full: bool,

    /// YAML file mapping prompt keys to answers (non-interactive mode)
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Accept every default (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Do not install the selected optional packages
    #[arg(long = "skip-install")]
    pub skip_install: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            directory: args.directory,
            full: args.full,
            answers: args.answers,
            yes: args.yes,
            skip_install: args.skip_install,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Local template directory to check instead of the built-in one
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = DrizzleConfig;

    match args.command {
        Some(Command::Check(check_args)) => {
            let source = TemplateSource::from_config(&config, check_args.template_dir.as_deref());
            check_template(&config, &source)
        }
        command => {
            // No subcommand provided, default to create behavior (interactive mode)
            let create_args = match command {
                Some(Command::Create(create_args)) => create_args.into(),
                _ => CreateArgs::default(),
            };
            let result = scaffolder_core::run(&config, create_args, CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
