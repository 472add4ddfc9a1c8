//! # Version-Control Adapter
//!
//! The reconciliation engine never runs git directly. It talks to a
//! [`GitOperations`] implementation, which exposes exactly the primitives the
//! engine needs: clone, open, fetch, local-reference detection, checkout,
//! and the submodule queries used by `convert`.
//!
//! This design allows for the underlying implementation to be swapped out,
//! which is particularly useful for testing. The binary uses
//! [`DefaultGitOperations`], which wraps the system `git` command via
//! [`crate::git`]. Tests replace it with mocks that record calls and fake a
//! checkout on disk without touching the network.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filesystem;

pub use crate::git::Submodule;

/// An opened working checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    path: PathBuf,
}

impl Checkout {
    /// Wrap a path known to hold a checkout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Root directory of the checkout.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clone `url` into `path` and return the new checkout.
    fn clone_repository(&self, url: &str, path: &Path) -> Result<Checkout>;

    /// Open the existing checkout at `path`.
    fn open(&self, path: &Path) -> Result<Checkout> {
        if filesystem::has_checkout(path) {
            Ok(Checkout::new(path))
        } else {
            Err(Error::Filesystem {
                path: path.to_path_buf(),
                message: "not a git checkout".to_string(),
            })
        }
    }

    /// Fetch every configured remote.
    fn fetch_all(&self, checkout: &Checkout) -> Result<()>;

    /// True when `reference` would not resolve in a fresh clone.
    fn is_local_only_ref(&self, checkout: &Checkout, reference: &str) -> Result<bool>;

    /// Check out `reference` directly, without creating a local branch.
    fn checkout(&self, checkout: &Checkout, reference: &str) -> Result<()>;

    /// The commit currently checked out.
    fn head_commit(&self, checkout: &Checkout) -> Result<String>;

    /// Submodules registered in the repository at `checkout`.
    fn list_submodules(&self, checkout: &Checkout) -> Result<Vec<Submodule>>;

    /// Deregister `submodule` from `checkout`, keeping its files on disk.
    fn deregister_submodule(&self, checkout: &Checkout, submodule: &Submodule) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repository(&self, url: &str, path: &Path) -> Result<Checkout> {
        crate::git::clone(url, path)?;
        Ok(Checkout::new(path))
    }

    fn fetch_all(&self, checkout: &Checkout) -> Result<()> {
        crate::git::fetch_all(checkout.path())
    }

    fn is_local_only_ref(&self, checkout: &Checkout, reference: &str) -> Result<bool> {
        crate::git::is_local_only_ref(checkout.path(), reference)
    }

    fn checkout(&self, checkout: &Checkout, reference: &str) -> Result<()> {
        crate::git::checkout(checkout.path(), reference)
    }

    fn head_commit(&self, checkout: &Checkout) -> Result<String> {
        crate::git::head_commit(checkout.path())
    }

    fn list_submodules(&self, checkout: &Checkout) -> Result<Vec<Submodule>> {
        crate::git::list_submodules(checkout.path())
    }

    fn deregister_submodule(&self, checkout: &Checkout, submodule: &Submodule) -> Result<()> {
        crate::git::deregister_submodule(checkout.path(), submodule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_existing_checkout() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(".git")).unwrap();

        let checkout = DefaultGitOperations.open(temp_dir.path()).unwrap();
        assert_eq!(checkout.path(), temp_dir.path());
    }

    #[test]
    fn test_open_missing_checkout_is_error() {
        let temp_dir = TempDir::new().unwrap();

        let result = DefaultGitOperations.open(temp_dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a git checkout"));
    }

    #[test]
    fn test_list_submodules_of_plain_directory() {
        let temp_dir = TempDir::new().unwrap();
        let checkout = Checkout::new(temp_dir.path());

        let submodules = DefaultGitOperations.list_submodules(&checkout).unwrap();
        assert!(submodules.is_empty());
    }
}
