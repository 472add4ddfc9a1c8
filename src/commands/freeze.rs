//! # Freeze Command Implementation
//!
//! Exports the installed modules into one product of an export file so the
//! same set can later be restored with `load`. Freezing only ever adds
//! entries; running it twice writes nothing new.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use mpm::defaults::{DEFAULT_EXPORT_FILENAME, DEFAULT_PRODUCT};
use mpm::exchange;
use mpm::output::emoji;

use super::Context;

/// Export the installed modules into a product of an export file
#[derive(Args, Debug)]
pub struct FreezeArgs {
    /// Export file to write, relative to the project root
    #[arg(value_name = "FILE", default_value = DEFAULT_EXPORT_FILENAME)]
    pub file: PathBuf,

    /// Product (table) of the export file to write
    #[arg(short, long, default_value = DEFAULT_PRODUCT)]
    pub product: String,
}

/// Execute the `freeze` command.
pub fn execute(args: FreezeArgs, ctx: &Context) -> Result<()> {
    let file = ctx.resolve(&args.file);
    let report = exchange::freeze(&ctx.config, &file, &args.product)
        .with_context(|| format!("Failed to freeze into {}", args.file.display()))?;

    println!(
        "{} Froze {} module(s) into {}:{} ({} already present)",
        emoji(&ctx.output, "🧊", "[OK]"),
        report.added,
        args.file.display(),
        args.product,
        report.unchanged
    );
    Ok(())
}
