//! Default values for mpm.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Reference checked out when none is given: the tip of the remote's
/// default branch as recorded by `clone`.
pub const DEFAULT_REFERENCE: &str = "remotes/origin/HEAD";

/// Directory modules are installed into when none is given.
pub const DEFAULT_DIRECTORY: &str = "modules";

/// Export manifest used by `freeze`, `load` and `convert`.
pub const DEFAULT_EXPORT_FILENAME: &str = "package.yaml";

/// Product (table) used inside export manifests.
pub const DEFAULT_PRODUCT: &str = "default";

/// Directory holding the working database.
pub const DEFAULT_DB_DIR: &str = ".mpm";

/// Working database filename inside [`DEFAULT_DB_DIR`].
pub const DEFAULT_DB_FILENAME: &str = "mpm-db.yml";

/// Table holding the live installed set.
pub const DEFAULT_DB_TABLE: &str = "mpm";

/// Ignore file updated as modules come and go.
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";
