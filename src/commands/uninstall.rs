//! # Uninstall Command Implementation
//!
//! Removes a module's working folder and then its registry record. The
//! record is only dropped once the folder is gone, so a failed removal can
//! simply be retried.

use anyhow::Result;
use clap::Args;

use mpm::engine::UninstallOutcome;
use mpm::output::{emoji, module_name};
use mpm::suggestions;
use mpm::vcs::DefaultGitOperations;

use super::Context;

/// Remove a module's folder and stop tracking it
#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Name of the module to uninstall
    pub name: String,
}

/// Execute the `uninstall` command.
pub fn execute(args: UninstallArgs, ctx: &Context) -> Result<()> {
    let git = DefaultGitOperations;
    let outcome = ctx
        .engine(&git)
        .uninstall(&args.name)
        .map_err(|e| suggestions::uninstall_failed(&args.name, e))?;

    let out = &ctx.output;
    match outcome {
        UninstallOutcome::Uninstalled(record) => println!(
            "{} Uninstalled {} from {}",
            emoji(out, "🗑️", "[OK]"),
            module_name(out, &record.name),
            record.path
        ),
        UninstallOutcome::NotInstalled => println!(
            "{} {} is not installed, nothing to uninstall",
            emoji(out, "ℹ️", "[INFO]"),
            args.name
        ),
    }
    Ok(())
}
