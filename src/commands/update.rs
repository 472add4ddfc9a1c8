//! # Update Command Implementation
//!
//! This module implements the `update` subcommand, which re-checks-out a
//! tracked module and optionally relocates it.
//!
//! ## Functionality
//!
//! - **Reference**: fetches every remote and checks out `--reference`, or the
//!   stored reference when none is given (picking up upstream movement of a
//!   branch).
//! - **Directory**: with `--directory`, moves the working folder to
//!   `<directory>/<name>` and records the new path.
//!
//! Both may be applied in one call. A module that is not tracked is reported
//! and left alone.

use anyhow::Result;
use clap::Args;

use mpm::engine::UpdateOutcome;
use mpm::output::{emoji, module_name};
use mpm::suggestions;
use mpm::vcs::DefaultGitOperations;

use super::Context;

/// Check out a new reference for a module, or move it
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Name of the module to update
    pub name: String,

    /// Branch, tag or commit to check out; defaults to the stored reference
    #[arg(short, long, value_name = "REF")]
    pub reference: Option<String>,

    /// New directory to move the module into
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<String>,
}

/// Execute the `update` command.
pub fn execute(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let git = DefaultGitOperations;
    let outcome = ctx
        .engine(&git)
        .update(
            &args.name,
            args.reference.as_deref(),
            args.directory.as_deref(),
        )
        .map_err(|e| suggestions::update_failed(&args.name, e))?;

    let out = &ctx.output;
    match outcome {
        UpdateOutcome::Updated { previous, current } => {
            println!(
                "{} Updated {} to {}",
                emoji(out, "✅", "[OK]"),
                module_name(out, &current.name),
                current.reference
            );
            if previous.path != current.path {
                println!("   moved {} -> {}", previous.path, current.path);
            }
        }
        UpdateOutcome::NotFound => println!(
            "{} Module {} not found",
            emoji(out, "ℹ️", "[INFO]"),
            args.name
        ),
    }
    Ok(())
}
