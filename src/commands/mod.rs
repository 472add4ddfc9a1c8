//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `mpm`
//! command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the shared
//!   [`Context`] and performs the command's logic by calling into the `mpm`
//!   library.
//!
//! Benign no-ops ("nothing to uninstall", "module not found", "file not
//! found") are printed and return `Ok(())`, so the process exits with status
//! zero. Only collaborator failures become errors.

use std::path::{Path, PathBuf};

use mpm::config::MpmConfig;
use mpm::engine::Engine;
use mpm::output::OutputConfig;
use mpm::vcs::DefaultGitOperations;

pub mod completions;
pub mod convert;
pub mod freeze;
pub mod install;
pub mod load;
pub mod purge;
pub mod show;
pub mod uninstall;
pub mod update;

/// State shared by every project command.
pub struct Context {
    pub config: MpmConfig,
    pub output: OutputConfig,
}

impl Context {
    /// An engine backed by the system `git`.
    pub fn engine<'a>(&'a self, git: &'a DefaultGitOperations) -> Engine<'a> {
        Engine::new(&self.config, git)
    }

    /// Resolve a user-supplied file path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.root().join(path)
        }
    }
}
