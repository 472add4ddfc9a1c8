//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mpm::suggestions;
//!
//! engine.install(&request).map_err(|e| suggestions::install_failed(&url, e))?;
//! ```

use crate::error::Error;

/// Wrap a failed install with hints about the usual causes.
pub fn install_failed(remote_url: &str, error: Error) -> anyhow::Error {
    let hint = match &error {
        // The clone error already carries its own hint
        Error::GitClone { hint: Some(_), .. } => {
            format!("hint: Run 'git clone {remote_url}' by hand to reproduce")
        }
        Error::GitClone { .. } => {
            "hint: Check that the URL is correct and reachable with 'git ls-remote'".to_string()
        }
        Error::GitCommand { command, .. } if command.starts_with("checkout") => {
            "hint: Check that the reference exists upstream with 'git ls-remote'\n\
             hint: Use --reference to pick a branch, tag or commit"
                .to_string()
        }
        Error::Path { .. } => {
            "hint: Use --name with a plain folder name, without '/' and not '.' or '..'"
                .to_string()
        }
        _ => "hint: Re-run with --log-level debug to see the git commands".to_string(),
    };

    anyhow::anyhow!("Failed to install {remote_url}\nerror: {error}\n\n{hint}")
}

/// Wrap a failed update with hints.
pub fn update_failed(name: &str, error: Error) -> anyhow::Error {
    let hint = match &error {
        Error::Filesystem { message, .. } if message.contains("already exists") => {
            "hint: Remove or rename the destination, or pick another --directory"
        }
        Error::GitCommand { .. } => {
            "hint: Check that the reference exists upstream with 'git ls-remote'"
        }
        _ => "hint: Run 'mpm show' to inspect the stored record",
    };

    anyhow::anyhow!("Failed to update {name}\nerror: {error}\n\n{hint}")
}

/// Wrap a failed uninstall; the record is kept when the folder could not be
/// removed.
pub fn uninstall_failed(name: &str, error: Error) -> anyhow::Error {
    anyhow::anyhow!(
        "Failed to uninstall {name}\n\
         error: {error}\n\n\
         hint: The module is still registered; close programs using its folder and retry"
    )
}

/// Error for `convert` outside a git checkout.
pub fn not_a_repository(root: &std::path::Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Not a git repository: {root}\n\n\
         hint: Run convert from the root of the repository that owns the submodules\n\
         hint: Use --root or MPM_ROOT to point at it",
        root = root.display()
    )
}
