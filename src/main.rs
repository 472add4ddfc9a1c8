//! # mpm CLI
//!
//! This is the binary entry point for the `mpm` command-line tool.
//!
//! It parses the command line with `clap`, installs the logger, and hands
//! control to the selected subcommand. Every piece of module management
//! lives in the `mpm` library crate; the binary only wires it to the
//! terminal. Errors bubble up as `anyhow::Error` and end the process with a
//! non-zero status.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.log_level);
    cli.execute()
}
