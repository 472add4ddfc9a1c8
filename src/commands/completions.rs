//! # Completions Command Implementation
//!
//! Prints a shell completion script for `mpm` built by `clap_complete` from
//! the same clap definition the binary parses with, so every subcommand and
//! flag completes.
//!
//! ```bash
//! mpm completions bash > ~/.local/share/bash-completion/completions/mpm
//! mpm completions zsh > ~/.zfunc/_mpm
//! mpm completions fish > ~/.config/fish/completions/mpm.fish
//! ```

use std::io;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for (bash, elvish, fish, powershell, zsh)
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
///
/// Unlike every other command this one does not prepare the project
/// database, so it can run anywhere.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}
