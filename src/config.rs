//! # Configuration
//!
//! [`MpmConfig`] is the single configuration value threaded through every
//! registry, reconciliation and exchange operation. It names the project
//! root, where the working database lives, which table holds the installed
//! set, and which ignore file tracks module directories. Nothing in the
//! library reads global state; callers build a config and pass it down.

use std::path::{Path, PathBuf};

use log::debug;

use crate::defaults::{
    DEFAULT_DB_DIR, DEFAULT_DB_FILENAME, DEFAULT_DB_TABLE, DEFAULT_IGNORE_FILE,
};
use crate::error::Result;
use crate::filesystem;
use crate::ignore;
use crate::manifest::ManifestTable;
use crate::path::to_host;

/// Locations and names used by one mpm project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpmConfig {
    /// Directory every relative path is resolved against
    pub root: PathBuf,
    /// Working database directory, relative to `root`
    pub db_dir: String,
    /// Working database filename inside `db_dir`
    pub db_filename: String,
    /// Table holding the installed set
    pub db_table: String,
    /// Ignore file, relative to `root`
    pub ignore_file: String,
}

impl MpmConfig {
    /// Configuration with default names rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            db_dir: DEFAULT_DB_DIR.to_string(),
            db_filename: DEFAULT_DB_FILENAME.to_string(),
            db_table: DEFAULT_DB_TABLE.to_string(),
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
        }
    }

    /// Override the working table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.db_table = table.into();
        self
    }

    /// Full path of the working database file.
    pub fn db_path(&self) -> PathBuf {
        self.resolve(&self.db_dir).join(&self.db_filename)
    }

    /// Full path of the ignore file.
    pub fn ignore_path(&self) -> PathBuf {
        self.resolve(&self.ignore_file)
    }

    /// Resolve a portable path (or a host path) against the project root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let host = to_host(path);
        if host.is_absolute() {
            host
        } else {
            self.root.join(host)
        }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Prepare the project: create the database directory and file with an
    /// empty working table, make sure the ignore file exists, and list the
    /// database directory in it.
    pub fn init(&self) -> Result<()> {
        filesystem::ensure_dir(&self.resolve(&self.db_dir))?;
        ManifestTable::open(self.db_path(), &self.db_table)?;

        let ignore_path = self.ignore_path();
        filesystem::ensure_file(&ignore_path)?;
        if ignore::add_entry(&ignore_path, &self.db_dir)? {
            debug!("added {} to {}", self.db_dir, ignore_path.display());
        }
        Ok(())
    }
}
