//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use mpm::config::MpmConfig;
use mpm::output::{ColorChoice, OutputConfig};

use crate::commands::{self, Context};

/// mpm - Install, pin and track git repositories as modules
#[derive(Parser, Debug)]
#[command(name = "mpm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Project root that module paths and the database are relative to
    ///
    /// Defaults to the current directory.
    #[arg(long, global = true, value_name = "DIR", env = "MPM_ROOT")]
    root: Option<PathBuf>,

    /// Colorize output
    #[arg(
        long,
        global = true,
        value_name = "WHEN",
        value_enum,
        default_value_t = ColorChoice::Auto
    )]
    color: ColorChoice,

    /// Set log level (off, error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone a repository as a module and track it
    Install(commands::install::InstallArgs),

    /// Remove a module's folder and stop tracking it
    Uninstall(commands::uninstall::UninstallArgs),

    /// Check out a new reference for a module, or move it
    Update(commands::update::UpdateArgs),

    /// Install every module listed in a product of an export file
    Load(commands::load::LoadArgs),

    /// Export the installed modules into a product of an export file
    Freeze(commands::freeze::FreezeArgs),

    /// Uninstall every tracked module
    Purge(commands::purge::PurgeArgs),

    /// Turn the repository's git submodules into tracked modules
    Convert(commands::convert::ConvertArgs),

    /// List tracked modules
    Show(commands::show::ShowArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let command = match self.command {
            // Completions never touch the project
            Commands::Completions(args) => return commands::completions::execute(args),
            command => command,
        };
        let ctx = project_context(self.root, self.color)?;

        match command {
            Commands::Install(args) => commands::install::execute(args, &ctx),
            Commands::Uninstall(args) => commands::uninstall::execute(args, &ctx),
            Commands::Update(args) => commands::update::execute(args, &ctx),
            Commands::Load(args) => commands::load::execute(args, &ctx),
            Commands::Freeze(args) => commands::freeze::execute(args, &ctx),
            Commands::Purge(args) => commands::purge::execute(args, &ctx),
            Commands::Convert(args) => commands::convert::execute(args, &ctx),
            Commands::Show(args) => commands::show::execute(args, &ctx),
            Commands::Completions(_) => Ok(()),
        }
    }
}

/// Resolve the project root and prepare its database and ignore file.
fn project_context(root: Option<PathBuf>, color: ColorChoice) -> Result<Context> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let config = MpmConfig::new(root);
    config
        .init()
        .with_context(|| format!("Failed to prepare mpm in {}", config.root().display()))?;

    Ok(Context {
        config,
        output: OutputConfig::new(color),
    })
}

/// Install `env_logger` at `level`; a `RUST_LOG` setting takes precedence.
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .try_init();
}
