//! # mpm Library
//!
//! This library provides the core of `mpm`, a package manager for git
//! repositories. It clones external repositories into local directories as
//! "modules", pins each one to a reference, and tracks the installed set in
//! a YAML manifest so it can be reinstalled, updated, exported or removed as
//! a whole. It is designed to be used by the `mpm` command-line tool but can
//! be driven directly from other programs.
//!
//! ## Quick Example
//!
//! ```
//! use mpm::config::MpmConfig;
//! use mpm::registry::{ModuleRecord, Registry};
//!
//! let project = tempfile::tempdir().unwrap();
//! let config = MpmConfig::new(project.path());
//! config.init().unwrap();
//!
//! let registry = Registry::working(&config);
//! registry
//!     .upsert(ModuleRecord::new(
//!         "broker",
//!         "https://example.org/x/broker.git",
//!         "main",
//!         "modules/broker",
//!     ))
//!     .unwrap();
//!
//! assert_eq!(registry.all().unwrap().len(), 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: [`config::MpmConfig`] names the project
//!   root, the working database and the ignore file. It is passed by
//!   reference into every operation; there is no global state.
//! - **Manifest Store (`manifest`)**: named tables of module records in a
//!   YAML file, written atomically.
//! - **Module Registry (`registry`)**: the authoritative record of what is
//!   installed, one table of the working manifest.
//! - **VCS Adapter (`vcs`, `git`)**: the [`vcs::GitOperations`] trait and its
//!   system-`git` implementation.
//! - **Reconciliation Engine (`engine`)**: install, uninstall, update, purge
//!   and convert, driven by the install state machine.
//! - **Manifest Exchange (`exchange`)**: `freeze` the installed set into a
//!   named product of an export file, `load` it back.
//!
//! ## Execution Flow
//!
//! A command builds an [`engine::Engine`] from a config and a
//! `GitOperations` implementation. The engine consults the registry and the
//! working directory, performs the git work, and writes the registry last,
//! so a failed clone or checkout never leaves a record behind.

pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod filesystem;
pub mod git;
pub mod ignore;
pub mod manifest;
pub mod output;
pub mod path;
pub mod registry;
pub mod suggestions;
pub mod vcs;

#[cfg(test)]
mod path_proptest;
