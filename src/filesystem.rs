//! Working-directory tree operations for installed modules
//!
//! Module checkouts are plain directories on disk. This module owns the
//! operations the reconciliation engine performs on them: detecting a
//! checkout, removing a whole tree (git object files are often read-only),
//! and moving a tree to a new install directory.

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Name of the marker that identifies a version-control checkout.
pub const CHECKOUT_MARKER: &str = ".git";

/// True when a checkout marker exists at `path`.
pub fn has_checkout(path: &Path) -> bool {
    path.join(CHECKOUT_MARKER).exists()
}

/// Create `path` and all of its parents if missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| fs_error(path, e))?;
    }
    Ok(())
}

/// Create an empty file at `path` (and its parent directory) if missing.
/// Existing content is left untouched.
pub fn ensure_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| fs_error(path, e))?;
    Ok(())
}

/// Recursively remove the tree rooted at `path`.
///
/// Entries are removed deepest first. An entry that fails with a permission
/// error has its read-only attribute (and its parent's) cleared and is
/// retried exactly once. Any other failure aborts the removal.
pub fn remove_tree(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(path).contents_first(true) {
        let entry = entry.map_err(|e| Error::Filesystem {
            path: e.path().unwrap_or(path).to_path_buf(),
            message: e.to_string(),
        })?;
        let is_dir = entry.file_type().is_dir();
        let entry_path = entry.path();

        match remove_entry(entry_path, is_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                warn!(
                    "Clearing read-only attribute and retrying removal of {}",
                    entry_path.display()
                );
                make_writable(entry_path).map_err(|e| fs_error(entry_path, e))?;
                if let Some(parent) = entry_path.parent() {
                    // The parent may not be ours to change (e.g. the tree root's parent)
                    let _ = make_writable(parent);
                }
                remove_entry(entry_path, is_dir).map_err(|e| fs_error(entry_path, e))?;
            }
            Err(e) => return Err(fs_error(entry_path, e)),
        }
    }

    Ok(())
}

/// Move the tree at `from` to `to`, creating the parent of `to` first.
///
/// Falls back to copy-then-remove when a plain rename is not possible, such
/// as across filesystems. Refuses to overwrite an existing destination.
pub fn move_tree(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        return Err(Error::Filesystem {
            path: to.to_path_buf(),
            message: "destination already exists".to_string(),
        });
    }
    if let Some(parent) = to.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(
                "rename {} -> {} failed ({}), copying instead",
                from.display(),
                to.display(),
                e
            );
            copy_tree(from, to)?;
            remove_tree(from)
        }
    }
}

/// Copy every file and directory under `from` into `to`.
fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| Error::Filesystem {
            path: e.path().unwrap_or(from).to_path_buf(),
            message: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| Error::Filesystem {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| fs_error(&target, e))?;
        }
    }
    Ok(())
}

fn remove_entry(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
fn make_writable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::symlink_metadata(path)?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o200);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    let mut permissions = metadata.permissions();
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
}

fn fs_error(path: &Path, error: io::Error) -> Error {
    Error::Filesystem {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
