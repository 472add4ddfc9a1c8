//! # Install Command Implementation
//!
//! This module implements the `install` subcommand, which clones a git
//! repository into `<directory>/<name>`, checks out the requested reference
//! and records the module in the working registry.
//!
//! ## Outcomes
//!
//! - **Installed**: the module was not tracked; it is cloned and recorded.
//! - **Already installed**: the module is tracked and its folder is present;
//!   nothing changes.
//! - **Reinstalled**: the module is tracked but its folder was deleted; it is
//!   cloned again at the stored path and its URL and reference are refreshed.

use anyhow::Result;
use clap::Args;

use mpm::defaults::{DEFAULT_DIRECTORY, DEFAULT_REFERENCE};
use mpm::engine::{InstallOutcome, InstallRequest};
use mpm::output::{emoji, module_name};
use mpm::suggestions;
use mpm::vcs::DefaultGitOperations;

use super::Context;

/// Clone a repository as a module and track it
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// URL of the repository to install
    pub url: String,

    /// Branch, tag or commit to check out
    #[arg(short, long, value_name = "REF", default_value = DEFAULT_REFERENCE)]
    pub reference: String,

    /// Directory, relative to the project root, the module is cloned into
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_DIRECTORY)]
    pub directory: String,

    /// Module name; defaults to the repository name from the URL
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Execute the `install` command.
pub fn execute(args: InstallArgs, ctx: &Context) -> Result<()> {
    let mut request = InstallRequest::new(&args.url, args.reference, args.directory);
    if let Some(name) = args.name {
        request = request.with_name(name);
    }

    let git = DefaultGitOperations;
    let outcome = ctx
        .engine(&git)
        .install(&request)
        .map_err(|e| suggestions::install_failed(&args.url, e))?;

    print_outcome(ctx, &outcome);
    Ok(())
}

/// Print one install outcome; shared with `load` and `convert`.
pub fn print_outcome(ctx: &Context, outcome: &InstallOutcome) {
    let out = &ctx.output;
    let record = outcome.record();
    let name = module_name(out, &record.name);
    match outcome {
        InstallOutcome::Installed(_) => println!(
            "{} Installed {} at {} ({})",
            emoji(out, "✅", "[OK]"),
            name,
            record.path,
            record.reference
        ),
        InstallOutcome::Reinstalled(_) => println!(
            "{} Reinstalled {} at {} ({})",
            emoji(out, "♻️", "[OK]"),
            name,
            record.path,
            record.reference
        ),
        InstallOutcome::AlreadyInstalled(_) => println!(
            "{} {} is already installed at {}",
            emoji(out, "ℹ️", "[INFO]"),
            name,
            record.path
        ),
    }
}
