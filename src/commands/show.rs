//! # Show Command Implementation
//!
//! Lists the tracked modules with their URL, reference and path, and flags
//! modules whose folder was deleted outside mpm. With `--json` the records
//! are printed as a JSON array instead, for scripts.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mpm::engine::ModuleStatus;
use mpm::output::{emoji, format_record};
use mpm::registry::ModuleRecord;
use mpm::vcs::DefaultGitOperations;

use super::Context;

/// List tracked modules
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct JsonStatus<'a> {
    #[serde(flatten)]
    record: &'a ModuleRecord,
    folder_present: bool,
}

/// Execute the `show` command.
pub fn execute(args: ShowArgs, ctx: &Context) -> Result<()> {
    let git = DefaultGitOperations;
    let statuses = ctx.engine(&git).status()?;

    if args.json {
        println!("{}", to_json(&statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("{} No modules installed", emoji(&ctx.output, "ℹ️", "[INFO]"));
        return Ok(());
    }

    for status in &statuses {
        println!(
            "{}",
            format_record(&ctx.output, &status.record, status.checkout_present)
        );
    }
    Ok(())
}

fn to_json(statuses: &[ModuleStatus]) -> Result<String> {
    let entries: Vec<JsonStatus<'_>> = statuses
        .iter()
        .map(|status| JsonStatus {
            record: &status.record,
            folder_present: status.checkout_present,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
