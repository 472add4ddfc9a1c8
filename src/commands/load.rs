//! # Load Command Implementation
//!
//! Installs every module listed under one product of an export file, in file
//! order. Modules that are already present are reported and skipped; modules
//! whose folder went missing are restored.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use mpm::defaults::{DEFAULT_EXPORT_FILENAME, DEFAULT_PRODUCT};
use mpm::exchange::{self, LoadOutcome};
use mpm::output::emoji;
use mpm::vcs::DefaultGitOperations;

use super::install::print_outcome;
use super::Context;

/// Install every module listed in a product of an export file
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Export file to read, relative to the project root
    #[arg(value_name = "FILE", default_value = DEFAULT_EXPORT_FILENAME)]
    pub file: PathBuf,

    /// Product (table) of the export file to load
    #[arg(short, long, default_value = DEFAULT_PRODUCT)]
    pub product: String,
}

/// Execute the `load` command.
pub fn execute(args: LoadArgs, ctx: &Context) -> Result<()> {
    let file = ctx.resolve(&args.file);
    let git = DefaultGitOperations;
    let engine = ctx.engine(&git);

    let out = &ctx.output;
    match exchange::load(&engine, &file, &args.product)? {
        LoadOutcome::Loaded(outcomes) => {
            for outcome in &outcomes {
                print_outcome(ctx, outcome);
            }
            println!(
                "{} Loaded {} module(s) from {}:{}",
                emoji(out, "📦", "[OK]"),
                outcomes.len(),
                args.file.display(),
                args.product
            );
        }
        LoadOutcome::NothingToLoad => println!(
            "{} Nothing to load from {}:{}",
            emoji(out, "ℹ️", "[INFO]"),
            args.file.display(),
            args.product
        ),
        LoadOutcome::FileNotFound => println!(
            "{} File {} not found",
            emoji(out, "ℹ️", "[INFO]"),
            args.file.display()
        ),
    }
    Ok(())
}
