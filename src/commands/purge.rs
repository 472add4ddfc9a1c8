//! # Purge Command Implementation
//!
//! Uninstalls every tracked module. Stops at the first module whose folder
//! cannot be removed; modules already purged stay purged.

use anyhow::Result;
use clap::Args;

use mpm::engine::PurgeOutcome;
use mpm::output::{emoji, module_name};
use mpm::vcs::DefaultGitOperations;

use super::Context;

/// Uninstall every tracked module
#[derive(Args, Debug)]
pub struct PurgeArgs {}

/// Execute the `purge` command.
pub fn execute(_args: PurgeArgs, ctx: &Context) -> Result<()> {
    let git = DefaultGitOperations;
    let outcome = ctx.engine(&git).purge()?;

    let out = &ctx.output;
    match outcome {
        PurgeOutcome::Purged(removed) => {
            for record in &removed {
                println!(
                    "{} Uninstalled {} from {}",
                    emoji(out, "🗑️", "[OK]"),
                    module_name(out, &record.name),
                    record.path
                );
            }
            println!("Purged {} module(s)", removed.len());
        }
        PurgeOutcome::Empty => println!(
            "{} No modules installed, nothing to purge",
            emoji(out, "ℹ️", "[INFO]")
        ),
    }
    Ok(())
}
