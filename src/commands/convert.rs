//! # Convert Command Implementation
//!
//! This module implements the `convert` subcommand, which migrates the git
//! submodules of the project repository into tracked modules.
//!
//! Each submodule is installed at its existing path, pinned to the commit it
//! currently has checked out, so no content is re-downloaded. The installed
//! set is then frozen into the export file. With `--hard`, each submodule is
//! also removed from the repository's submodule list while its files stay on
//! disk.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use mpm::defaults::{DEFAULT_EXPORT_FILENAME, DEFAULT_PRODUCT};
use mpm::engine::ConvertOutcome;
use mpm::error::Error;
use mpm::filesystem;
use mpm::output::emoji;
use mpm::suggestions;
use mpm::vcs::DefaultGitOperations;

use super::install::print_outcome;
use super::Context;

/// Turn the repository's git submodules into tracked modules
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Export file to freeze the result into, relative to the project root
    #[arg(value_name = "FILE", default_value = DEFAULT_EXPORT_FILENAME)]
    pub file: PathBuf,

    /// Product (table) of the export file to write
    #[arg(short, long, default_value = DEFAULT_PRODUCT)]
    pub product: String,

    /// Also deregister the submodules from the repository, keeping their files
    #[arg(long)]
    pub hard: bool,
}

/// Execute the `convert` command.
pub fn execute(args: ConvertArgs, ctx: &Context) -> Result<()> {
    if !filesystem::has_checkout(ctx.config.root()) {
        return Err(suggestions::not_a_repository(ctx.config.root()));
    }

    let file = ctx.resolve(&args.file);
    let git = DefaultGitOperations;
    let outcome = ctx
        .engine(&git)
        .convert(&file, &args.product, args.hard)
        .map_err(|e| {
            let url = match &e {
                Error::GitClone { url, .. } => Some(url.clone()),
                _ => None,
            };
            match url {
                Some(url) => suggestions::install_failed(&url, e),
                None => anyhow::Error::from(e),
            }
        })?;

    let out = &ctx.output;
    match outcome {
        ConvertOutcome::Converted {
            installs,
            deregistered,
            freeze,
        } => {
            for install in &installs {
                print_outcome(ctx, install);
            }
            if args.hard {
                println!(
                    "{} Deregistered {} submodule(s)",
                    emoji(out, "✂️", "[OK]"),
                    deregistered
                );
            }
            println!(
                "{} Froze {} module(s) into {}:{}",
                emoji(out, "🧊", "[OK]"),
                freeze.added,
                args.file.display(),
                args.product
            );
        }
        ConvertOutcome::NoSubmodules => println!(
            "{} No submodules to convert",
            emoji(out, "ℹ️", "[INFO]")
        ),
    }
    Ok(())
}
