//! Fixtures for the `mpm` end-to-end tests: a throwaway project directory
//! with a pre-seeded database, and local upstream git repositories to
//! install from.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_show_lists_broker() {
//!     let fixture = TestFixture::new().with_installed(&[records::BROKER]);
//!     fixture.command().arg("show").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    #[allow(unused_imports)]
    pub use super::records;
    #[allow(unused_imports)]
    pub use super::UpstreamRepo;
    pub use super::TestFixture;
}

/// Module records used to seed databases and export files.
#[allow(dead_code)]
pub mod records {
    /// (name, remote_url, reference, path)
    pub type Record = (&'static str, &'static str, &'static str, &'static str);

    pub const BROKER: Record = (
        "broker",
        "https://example.org/x/broker.git",
        "main",
        "modules/broker",
    );

    pub const RELAY: Record = (
        "relay",
        "https://example.org/x/relay.git",
        "v1.2.0",
        "libs/relay",
    );

    /// Render records as one YAML table.
    pub fn table(name: &str, records: &[Record]) -> String {
        if records.is_empty() {
            return format!("{}: []\n", name);
        }
        let mut out = format!("{}:\n", name);
        for (record_name, url, reference, path) in records {
            out.push_str(&format!(
                "- name: {}\n  remote_url: {}\n  reference: {}\n  path: {}\n",
                record_name, url, reference, path
            ));
        }
        out
    }
}

/// Whether a usable `git` binary is on the PATH.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

/// A test fixture that provides a temporary project directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_installed(&[records::BROKER]);
///
/// fixture.command()
///     .arg("uninstall")
///     .arg("broker")
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Seed the working database with `records`, creating a checkout marker
    /// for each so they count as installed.
    pub fn with_installed(self, records: &[records::Record]) -> Self {
        let fixture = self.with_registered(records);
        for (_, _, _, path) in records {
            fixture
                .temp_dir
                .child(path)
                .child(".git")
                .create_dir_all()
                .expect("Failed to create checkout marker");
        }
        fixture
    }

    /// Seed the working database with `records` without creating folders.
    pub fn with_registered(self, records: &[records::Record]) -> Self {
        self.temp_dir
            .child(".mpm/mpm-db.yml")
            .write_str(&records::table("mpm", records))
            .expect("Failed to write database");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the working database.
    pub fn db_path(&self) -> PathBuf {
        self.path().join(".mpm").join("mpm-db.yml")
    }

    /// Current working database content.
    pub fn db(&self) -> String {
        std::fs::read_to_string(self.db_path()).expect("Failed to read database")
    }

    /// Current content of a project file.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mpm");
        cmd.current_dir(self.path())
            .env_remove("MPM_ROOT")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A local git repository that modules can be installed from.
#[allow(dead_code)]
pub struct UpstreamRepo {
    temp_dir: assert_fs::TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl UpstreamRepo {
    /// Create `<tmp>/<name>` with one commit on `main` and a `v1` tag.
    pub fn new(name: &str) -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(name);
        std::fs::create_dir_all(&path).expect("Failed to create upstream");

        let repo = Self { temp_dir, path };
        repo.git(&["init", "--quiet", "--initial-branch=main"]);
        repo.commit("README.md", "v1\n", "first");
        repo.git(&["tag", "v1"]);
        repo
    }

    /// Write `file`, commit it, and return the new commit id.
    pub fn commit(&self, file: &str, content: &str, message: &str) -> String {
        std::fs::write(self.path.join(file), content).expect("Failed to write file");
        self.git(&["add", file]);
        self.git(&["commit", "--quiet", "-m", message]);
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    /// Location to pass to `mpm install`.
    pub fn url(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.path)
            .args([
                "-c",
                "user.name=mpm tests",
                "-c",
                "user.email=tests@example.org",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_installed() {
        let fixture = TestFixture::new().with_installed(&[records::BROKER]);
        assert!(fixture.path().join("modules/broker/.git").is_dir());
        assert!(fixture.db().contains("name: broker"));
    }

    #[test]
    fn test_records_table_is_valid_yaml() {
        let yaml = records::table("mpm", &[records::BROKER, records::RELAY]);
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["mpm"].as_sequence().unwrap().len(), 2);
        assert_eq!(value["mpm"][1]["reference"], "v1.2.0");
    }
}
