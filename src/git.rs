//! Thin wrappers over the system `git` binary.
//!
//! Every function here shells out to `git`, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use ini::Ini;
use log::debug;

use crate::error::{Error, Result};
use crate::filesystem;
use crate::path::{to_host, to_portable};

/// A submodule registered in a host repository's `.gitmodules`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submodule {
    /// Submodule name (the `[submodule "<name>"]` section key)
    pub name: String,
    /// Path relative to the host repository root, forward-slash form
    pub path: String,
    /// Upstream URL
    pub url: String,
    /// Commit the host repository records for it (the gitlink in its index)
    pub head_commit: String,
}

/// Suffix of the directory a submodule's content is parked in while it is
/// being deregistered.
const PARKED_SUFFIX: &str = ".mpm-convert";

/// Clone `url` into `target_dir`, creating the parent directory first.
pub fn clone(url: &str, target_dir: &Path) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    debug!("git clone {} {}", url, target_dir.display());
    let output = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            path: target_dir.to_path_buf(),
            message: e.to_string(),
            hint: Some("Make sure git is installed and on your PATH".to_string()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        // Provide helpful error message for common auth failures
        let hint = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            Some(
                "Make sure you have access to the repository: add your SSH key to \
                 ssh-agent or configure git credentials"
                    .to_string(),
            )
        } else if stderr.contains("already exists and is not an empty directory") {
            Some("Remove or rename the existing directory, then retry".to_string())
        } else {
            None
        };

        return Err(Error::GitClone {
            url: url.to_string(),
            path: target_dir.to_path_buf(),
            message: stderr,
            hint,
        });
    }

    Ok(())
}

/// Fetch every remote of the checkout at `dir`.
pub fn fetch_all(dir: &Path) -> Result<()> {
    run(dir, &["fetch", "--all", "--tags"])?;
    Ok(())
}

/// True when `reference` only exists in the local checkout: it names a local
/// branch, or no remote branch contains it.
pub fn is_local_only_ref(dir: &Path, reference: &str) -> Result<bool> {
    let containing = run(dir, &["branch", "-r", "--contains", reference])?;
    if containing.trim().is_empty() {
        return Ok(true);
    }

    let heads = run(
        dir,
        &["for-each-ref", "--format=%(refname:short)", "refs/heads"],
    )?;
    Ok(heads.lines().any(|head| head.trim() == reference))
}

/// Check out `reference` (branch, tag or commit) in the checkout at `dir`.
pub fn checkout(dir: &Path, reference: &str) -> Result<()> {
    run(dir, &["checkout", "--quiet", reference])?;
    Ok(())
}

/// The commit currently checked out at `dir`.
pub fn head_commit(dir: &Path) -> Result<String> {
    Ok(run(dir, &["rev-parse", "HEAD"])?.trim().to_string())
}

/// List the submodules declared in `.gitmodules` at `repo_root`.
///
/// Each submodule's commit is the gitlink staged in the host's index, which
/// is also what a fresh `git submodule update` would check out.
pub fn list_submodules(repo_root: &Path) -> Result<Vec<Submodule>> {
    let gitmodules = repo_root.join(".gitmodules");
    if !gitmodules.exists() {
        return Ok(Vec::new());
    }

    let conf = Ini::load_from_file(&gitmodules)?;
    let mut submodules = Vec::new();

    for (section, properties) in conf.iter() {
        let Some(name) = section.and_then(parse_submodule_section) else {
            continue;
        };

        let path = properties.get("path").ok_or_else(|| Error::Submodule {
            name: name.clone(),
            message: "missing 'path' in .gitmodules".to_string(),
        })?;
        let url = properties.get("url").ok_or_else(|| Error::Submodule {
            name: name.clone(),
            message: "missing 'url' in .gitmodules".to_string(),
        })?;

        let path = to_portable(path);
        let head_commit = run(repo_root, &["rev-parse", &format!(":{}", path)])?
            .trim()
            .to_string();

        submodules.push(Submodule {
            name,
            path,
            url: url.to_string(),
            head_commit,
        });
    }

    Ok(submodules)
}

/// Remove `submodule` from the host repository's submodule bookkeeping while
/// keeping its files on disk as a standalone checkout.
///
/// The submodule's git directory is moved into its working directory first,
/// then the working directory is parked under a temporary name so that
/// `git submodule deinit` cannot clear it, and finally restored.
pub fn deregister_submodule(repo_root: &Path, submodule: &Submodule) -> Result<()> {
    let working_dir = repo_root.join(to_host(&submodule.path));
    embed_git_dir(&working_dir)?;

    let parked = parked_path(&working_dir);
    fs::rename(&working_dir, &parked).map_err(|e| Error::Filesystem {
        path: working_dir.clone(),
        message: e.to_string(),
    })?;

    let result = deregister_parked(repo_root, submodule);

    // Always put the content back, even if deregistration failed part way
    if working_dir.exists() {
        filesystem::remove_tree(&working_dir)?;
    }
    fs::rename(&parked, &working_dir).map_err(|e| Error::Filesystem {
        path: parked.clone(),
        message: e.to_string(),
    })?;

    result
}

fn deregister_parked(repo_root: &Path, submodule: &Submodule) -> Result<()> {
    let path = submodule.path.as_str();
    run(repo_root, &["submodule", "deinit", "--force", "--", path])?;
    run(repo_root, &["rm", "--cached", "--quiet", "--", path])?;
    run(
        repo_root,
        &[
            "config",
            "--file",
            ".gitmodules",
            "--remove-section",
            &format!("submodule.{}", submodule.name),
        ],
    )?;
    run(repo_root, &["add", ".gitmodules"])?;

    let module_git_dir = repo_root.join(".git").join("modules").join(&submodule.name);
    filesystem::remove_tree(&module_git_dir)
}

/// Replace a `.git` file (`gitdir: <path>`) with the directory it points to.
fn embed_git_dir(working_dir: &Path) -> Result<()> {
    let marker = working_dir.join(filesystem::CHECKOUT_MARKER);
    if !marker.is_file() {
        return Ok(());
    }

    let content = fs::read_to_string(&marker)?;
    let Some(target) = content.trim().strip_prefix("gitdir:") else {
        return Ok(());
    };
    let git_dir = working_dir.join(target.trim());

    fs::remove_file(&marker)?;
    filesystem::move_tree(&git_dir, &marker)?;

    // A moved submodule git dir still points its worktree at the old location
    if let Err(e) = run(working_dir, &["config", "--unset", "core.worktree"]) {
        debug!("core.worktree not unset in {}: {}", working_dir.display(), e);
    }
    Ok(())
}

fn parked_path(working_dir: &Path) -> PathBuf {
    let mut parked = working_dir.as_os_str().to_owned();
    parked.push(PARKED_SUFFIX);
    PathBuf::from(parked)
}

/// Extract `<name>` from a `submodule "<name>"` section header.
fn parse_submodule_section(section: &str) -> Option<String> {
    section
        .strip_prefix("submodule")?
        .trim()
        .strip_prefix('"')?
        .strip_suffix('"')
        .map(|name| name.to_string())
}

/// Run `git -C <dir> <args>` and return stdout.
fn run(dir: &Path, args: &[&str]) -> Result<String> {
    debug!("git -C {} {}", dir.display(), args.join(" "));
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            path: dir.to_path_buf(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            path: dir.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
