//! # Module Registry
//!
//! The registry is the authoritative ledger of installed modules. A record
//! exists exactly when its module was installed and has not been removed
//! since; whether the working directory still exists is a separate question
//! answered by [`crate::filesystem::has_checkout`].
//!
//! A [`Registry`] names one (manifest file, table) pair. Each operation opens
//! the table, does its work and releases it again, so no handle outlives a
//! single logical step.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::MpmConfig;
use crate::error::Result;
use crate::manifest::ManifestTable;
use crate::path::to_host;

/// One tracked module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Unique key within a table
    pub name: String,
    /// Upstream location
    pub remote_url: String,
    /// Branch, tag or commit checked out
    pub reference: String,
    /// Working directory, forward-slash form, relative to the project root
    pub path: String,
}

impl ModuleRecord {
    pub fn new(
        name: impl Into<String>,
        remote_url: impl Into<String>,
        reference: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            remote_url: remote_url.into(),
            reference: reference.into(),
            path: path.into(),
        }
    }

    /// The working directory in host form, resolved against `root`.
    pub fn host_path(&self, root: &Path) -> PathBuf {
        root.join(to_host(&self.path))
    }
}

/// Name-keyed access to one table of one manifest file.
#[derive(Debug, Clone)]
pub struct Registry {
    filepath: PathBuf,
    table: String,
}

impl Registry {
    pub fn new(filepath: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            table: table.into(),
        }
    }

    /// The working registry described by `config`.
    pub fn working(config: &MpmConfig) -> Self {
        Self::new(config.db_path(), config.db_table.clone())
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Open a scoped handle for multi-step work on the table.
    pub fn open(&self) -> Result<ManifestTable> {
        ManifestTable::open(&self.filepath, &self.table)
    }

    pub fn get(&self, name: &str) -> Result<Option<ModuleRecord>> {
        Ok(self.open()?.get(name).cloned())
    }

    pub fn upsert(&self, record: ModuleRecord) -> Result<()> {
        self.open()?.upsert(record)
    }

    /// Remove the record named `name`. Returns `false` if there was none.
    pub fn remove(&self, name: &str) -> Result<bool> {
        self.open()?.remove(name)
    }

    pub fn all(&self) -> Result<Vec<ModuleRecord>> {
        Ok(self.open()?.all().to_vec())
    }
}
