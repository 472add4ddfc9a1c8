//! Ignore-file bookkeeping
//!
//! Installed modules are checkouts of other repositories and should not be
//! committed to the host repository, so their paths are kept in an ignore
//! file (normally `.gitignore`). Entries are stored as forward-slash
//! directory patterns with a single trailing slash.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::path::ignore_entry;

/// Add `path` to `ignore_file` unless an identical entry is present.
///
/// Returns `true` when a line was added. The file is created if missing.
pub fn add_entry(ignore_file: &Path, path: &str) -> Result<bool> {
    let entry = ignore_entry(path);
    let content = read_or_empty(ignore_file)?;

    if content.lines().any(|line| line.trim_end() == entry) {
        return Ok(false);
    }

    let mut updated = content;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&entry);
    updated.push('\n');
    write(ignore_file, &updated)?;

    Ok(true)
}

/// Remove every line equal to the entry for `path` from `ignore_file`.
///
/// Returns `true` when at least one line was removed. A missing file is
/// treated as empty.
pub fn remove_entry(ignore_file: &Path, path: &str) -> Result<bool> {
    let entry = ignore_entry(path);
    let content = read_or_empty(ignore_file)?;

    let kept: Vec<&str> = content
        .lines()
        .filter(|line| line.trim_end() != entry)
        .collect();
    if kept.len() == content.lines().count() {
        return Ok(false);
    }

    let mut updated = kept.join("\n");
    if !updated.is_empty() {
        updated.push('\n');
    }
    write(ignore_file, &updated)?;

    Ok(true)
}

fn read_or_empty(ignore_file: &Path) -> Result<String> {
    if !ignore_file.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(ignore_file).map_err(|e| Error::Filesystem {
        path: ignore_file.to_path_buf(),
        message: e.to_string(),
    })
}

fn write(ignore_file: &Path, content: &str) -> Result<()> {
    fs::write(ignore_file, content).map_err(|e| Error::Filesystem {
        path: ignore_file.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_entry_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let ignore_file = temp_dir.path().join(".gitignore");

        assert!(add_entry(&ignore_file, "modules/broker").unwrap());
        assert!(!add_entry(&ignore_file, "modules/broker").unwrap());
        assert!(!add_entry(&ignore_file, "modules/broker/").unwrap());

        let content = fs::read_to_string(&ignore_file).unwrap();
        assert_eq!(content, "modules/broker/\n");
    }

    #[test]
    fn test_add_entry_preserves_existing_lines() {
        let temp_dir = TempDir::new().unwrap();
        let ignore_file = temp_dir.path().join(".gitignore");
        fs::write(&ignore_file, "target/\n*.log").unwrap();

        assert!(add_entry(&ignore_file, "modules/broker").unwrap());

        let content = fs::read_to_string(&ignore_file).unwrap();
        assert_eq!(content, "target/\n*.log\nmodules/broker/\n");
    }

    #[test]
    fn test_add_entry_does_not_match_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let ignore_file = temp_dir.path().join(".gitignore");
        fs::write(&ignore_file, "modules/broker-extra/\n").unwrap();

        assert!(add_entry(&ignore_file, "modules/broker").unwrap());
    }

    #[test]
    fn test_remove_entry_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let ignore_file = temp_dir.path().join(".gitignore");
        fs::write(&ignore_file, "target/\nmodules/broker/\n.mpm/\n").unwrap();

        assert!(remove_entry(&ignore_file, "modules/broker").unwrap());
        assert!(!remove_entry(&ignore_file, "modules/broker").unwrap());

        let content = fs::read_to_string(&ignore_file).unwrap();
        assert_eq!(content, "target/\n.mpm/\n");
    }

    #[test]
    fn test_remove_entry_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let ignore_file = temp_dir.path().join(".gitignore");

        assert!(!remove_entry(&ignore_file, "modules/broker").unwrap());
        assert!(!ignore_file.exists());
    }
}
