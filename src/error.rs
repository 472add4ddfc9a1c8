//! Library error type.
//!
//! Everything here aborts the operation that produced it. Benign outcomes
//! ("nothing to uninstall", "already installed", "file not found" on load)
//! are not errors; they travel through the outcome enums in
//! [`crate::engine`] and [`crate::exchange`].

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by mpm's collaborators: git, the manifest store and
/// the filesystem.
#[derive(Error, Debug)]
pub enum Error {
    /// `git clone` failed. `hint` is shown on its own line when present.
    #[error(
        "failed to clone {url} into {}: {message}{}",
        path.display(),
        hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default()
    )]
    GitClone {
        url: String,
        path: PathBuf,
        message: String,
        hint: Option<String>,
    },

    /// Any other git invocation failed inside a checkout.
    #[error("`git {command}` failed in {}: {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    #[error("invalid manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// Removing, moving or creating a tree failed.
    #[error("cannot update {}: {message}", path.display())]
    Filesystem { path: PathBuf, message: String },

    /// For example a remote URL with no last segment to name the module by.
    #[error("invalid path: {message}")]
    Path { message: String },

    #[error("submodule {name}: {message}")]
    Submodule { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// `.gitmodules` could not be parsed.
    #[error("cannot read .gitmodules: {0}")]
    Ini(#[from] ini::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn clone_error(hint: Option<&str>) -> Error {
        Error::GitClone {
            url: "https://example.org/x/broker.git".to_string(),
            path: PathBuf::from("modules/broker"),
            message: "Repository not found".to_string(),
            hint: hint.map(str::to_string),
        }
    }

    #[test]
    fn test_clone_error_names_url_and_target() {
        let text = clone_error(None).to_string();
        assert_eq!(
            text,
            "failed to clone https://example.org/x/broker.git into modules/broker: Repository not found"
        );
    }

    #[test]
    fn test_clone_hint_on_its_own_line() {
        let text = clone_error(Some("Check SSH keys")).to_string();
        assert!(text.ends_with("Repository not found\n  hint: Check SSH keys"));
    }

    #[test]
    fn test_context_variants_display() {
        let cases = [
            (
                Error::GitCommand {
                    command: "checkout v9.9.9".to_string(),
                    path: PathBuf::from("modules/broker"),
                    stderr: "pathspec 'v9.9.9' did not match".to_string(),
                },
                "`git checkout v9.9.9` failed in modules/broker: pathspec 'v9.9.9' did not match",
            ),
            (
                Error::Manifest {
                    path: PathBuf::from(".mpm/mpm-db.yml"),
                    message: "expected a mapping".to_string(),
                },
                "invalid manifest .mpm/mpm-db.yml: expected a mapping",
            ),
            (
                Error::Filesystem {
                    path: PathBuf::from("modules/broker"),
                    message: "Directory not empty".to_string(),
                },
                "cannot update modules/broker: Directory not empty",
            ),
            (
                Error::Submodule {
                    name: "libs/broker".to_string(),
                    message: "missing url".to_string(),
                },
                "submodule libs/broker: missing url",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_wrapped_errors_convert_with_question_mark() {
        fn read() -> Result<serde_yaml::Value> {
            Ok(serde_yaml::from_str("invalid: [unclosed")?)
        }
        fn open() -> Result<std::fs::File> {
            Ok(std::fs::File::open("/definitely/not/here")?)
        }

        assert!(matches!(read(), Err(Error::Yaml(_))));
        assert!(matches!(open(), Err(Error::Io(_))));
    }
}
