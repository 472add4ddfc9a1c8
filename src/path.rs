//! Path manipulation utilities for mpm
//!
//! Manifests store paths in a portable, forward-slash form so that a
//! `package.yaml` written on one operating system loads on another. The
//! helpers here convert between that stored form and the host form used for
//! filesystem calls, and derive module names from remote URLs.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use url::Url;

use crate::error::{Error, Result};

/// Convert a host path string to the portable forward-slash form.
pub fn to_portable(path: &str) -> String {
    path.replace(MAIN_SEPARATOR, "/")
}

/// Convert a host path to the portable forward-slash form.
pub fn path_to_portable(path: &Path) -> String {
    to_portable(&path.to_string_lossy())
}

/// Convert a portable path string to the host form.
pub fn to_host(portable: &str) -> PathBuf {
    PathBuf::from(portable.replace('/', &MAIN_SEPARATOR.to_string()))
}

/// Normalize a portable path: drop `.` segments, empty segments and any
/// trailing slash. An empty result is returned as `.`.
pub fn normalize(portable: &str) -> String {
    let segments: Vec<&str> = portable
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Join an install directory and a module name into the stored module path.
///
/// `join_module_path("modules", "broker") == "modules/broker"`
pub fn join_module_path(directory: &str, name: &str) -> String {
    normalize(&format!("{}/{}", to_portable(directory), name))
}

/// The install directory a stored module path was created from.
///
/// Inverse of [`join_module_path`] for the directory part. A path without a
/// parent segment yields `.`.
pub fn parent_directory(portable: &str) -> String {
    match normalize(portable).rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => ".".to_string(),
    }
}

/// Derive a module name from a remote URL.
///
/// Takes the last path segment of the URL and strips a trailing `.git`.
/// Handles URLs (`https://host/x/broker.git`), scp-like remotes
/// (`git@host:x/broker.git`) and local paths.
pub fn module_name_from_url(remote_url: &str) -> Result<String> {
    let trimmed = remote_url.trim();

    // Drop query strings and fragments when the remote parses as a real URL
    let path_part = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => trimmed.to_string(),
    };

    let basename = path_part
        .split(['/', '\\', ':'])
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or_default();

    let name = basename.strip_suffix(".git").unwrap_or(basename);

    if name.is_empty() {
        return Err(Error::Path {
            message: format!("Cannot derive a module name from '{}'", remote_url),
        });
    }

    Ok(name.to_string())
}

/// Check that `name` is usable as a module name: a single path segment
/// that stays inside the install directory.
///
/// Rejects the empty name, `.`, `..` and anything containing `/` or `\`.
pub fn validate_module_name(name: &str) -> Result<()> {
    let problem = if name.trim().is_empty() {
        "it is empty"
    } else if name == "." || name == ".." {
        "it names the install directory or its parent"
    } else if name.contains(['/', '\\']) {
        "it contains a path separator"
    } else {
        return Ok(());
    };

    Err(Error::Path {
        message: format!("Invalid module name '{}': {}", name, problem),
    })
}

/// The ignore-file line for a module path: portable, no leading slash,
/// exactly one trailing slash.
pub fn ignore_entry(path: &str) -> String {
    format!("{}/", to_portable(path).trim_matches('/'))
}
