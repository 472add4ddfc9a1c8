//! # Manifest Store
//!
//! A manifest file is a YAML mapping of table name to a list of module
//! records:
//!
//! ```yaml
//! mpm:
//! - name: broker
//!   remote_url: https://example.org/x/broker.git
//!   reference: main
//!   path: modules/broker
//! ```
//!
//! The working database and the `freeze`/`load` export files share this
//! format and differ only in role. A [`ManifestTable`] is a scoped handle on
//! one table of one file: opening it loads the file (creating file and table
//! when absent), every mutation is written back before the call returns, and
//! dropping the handle releases it. Writes go through a temporary sibling
//! file that is renamed over the target, so an interrupted write never
//! leaves a half-written manifest behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::registry::ModuleRecord;

/// All tables of one manifest file, in table-name order.
pub type Tables = BTreeMap<String, Vec<ModuleRecord>>;

/// Read every table of the manifest at `path`.
///
/// A missing or blank file is an empty manifest.
pub fn read_tables(path: &Path) -> Result<Tables> {
    if !path.exists() {
        return Ok(Tables::new());
    }

    let content = fs::read_to_string(path).map_err(|e| manifest_error(path, e))?;
    if content.trim().is_empty() {
        return Ok(Tables::new());
    }

    let tables: Option<Tables> =
        serde_yaml::from_str(&content).map_err(|e| manifest_error(path, e))?;
    Ok(tables.unwrap_or_default())
}

/// Write every table to the manifest at `path`, replacing it atomically.
pub fn write_tables(path: &Path, tables: &Tables) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| manifest_error(path, e))?;
        }
    }

    let content = serde_yaml::to_string(tables)?;
    let staging = staging_path(path);
    fs::write(&staging, content).map_err(|e| manifest_error(&staging, e))?;
    fs::rename(&staging, path).map_err(|e| manifest_error(path, e))?;

    debug!("wrote manifest {}", path.display());
    Ok(())
}

/// A scoped handle on one table of a manifest file.
#[derive(Debug)]
pub struct ManifestTable {
    path: PathBuf,
    table: String,
    tables: Tables,
}

impl ManifestTable {
    /// Open `table` in the manifest at `path`, creating the file and the
    /// table if either is absent.
    pub fn open(path: impl Into<PathBuf>, table: &str) -> Result<Self> {
        let path = path.into();
        let mut tables = read_tables(&path)?;

        let created = !path.exists() || !tables.contains_key(table);
        tables.entry(table.to_string()).or_default();

        let handle = Self {
            path,
            table: table.to_string(),
            tables,
        };
        if created {
            handle.persist()?;
        }
        Ok(handle)
    }

    /// Path of the underlying manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the open table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.records().iter().find(|record| record.name == name)
    }

    /// True when an identical record is already stored.
    pub fn contains(&self, record: &ModuleRecord) -> bool {
        self.records().contains(record)
    }

    /// Every record of the table, in insertion order.
    pub fn all(&self) -> &[ModuleRecord] {
        self.records()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Append `record` and persist.
    pub fn insert(&mut self, record: ModuleRecord) -> Result<()> {
        self.records_mut().push(record);
        self.persist()
    }

    /// Replace the record named `name` and persist. Returns `false` (and
    /// writes nothing) when no such record exists.
    pub fn update(&mut self, name: &str, record: ModuleRecord) -> Result<bool> {
        let Some(slot) = self.records_mut().iter_mut().find(|r| r.name == name) else {
            return Ok(false);
        };
        *slot = record;
        self.persist()?;
        Ok(true)
    }

    /// Insert `record`, or replace the stored record with the same name.
    pub fn upsert(&mut self, record: ModuleRecord) -> Result<()> {
        let name = record.name.clone();
        if self.get(&name).is_some() {
            self.update(&name, record)?;
            Ok(())
        } else {
            self.insert(record)
        }
    }

    /// Remove every record named `name` and persist. Returns `false` (and
    /// writes nothing) when no such record exists.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let records = self.records_mut();
        let before = records.len();
        records.retain(|record| record.name != name);
        if records.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Delete the table from the manifest file, consuming the handle.
    pub fn drop_table(mut self) -> Result<()> {
        self.tables.remove(&self.table);
        self.persist()
    }

    fn records(&self) -> &[ModuleRecord] {
        self.tables
            .get(&self.table)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn records_mut(&mut self) -> &mut Vec<ModuleRecord> {
        self.tables.entry(self.table.clone()).or_default()
    }

    fn persist(&self) -> Result<()> {
        write_tables(&self.path, &self.tables)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    PathBuf::from(staging)
}

fn manifest_error(path: &Path, error: impl std::fmt::Display) -> Error {
    Error::Manifest {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, reference: &str) -> ModuleRecord {
        ModuleRecord::new(
            name,
            format!("https://example.org/x/{}.git", name),
            reference,
            format!("modules/{}", name),
        )
    }

    #[test]
    fn test_open_creates_file_and_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".mpm/mpm-db.yml");

        let table = ManifestTable::open(&path, "mpm").unwrap();
        assert!(table.is_empty());
        assert!(path.exists());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("mpm"));
    }

    #[test]
    fn test_open_blank_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.yaml");
        fs::write(&path, "\n").unwrap();

        let table = ManifestTable::open(&path, "default").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_open_broken_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.yaml");
        fs::write(&path, "default: [unclosed").unwrap();

        let result = ManifestTable::open(&path, "default");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid manifest"));
    }

    #[test]
    fn test_mutations_persist_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.yml");

        let mut table = ManifestTable::open(&path, "mpm").unwrap();
        table.insert(record("broker", "main")).unwrap();

        // A second handle sees the write without the first being dropped
        let reopened = ManifestTable::open(&path, "mpm").unwrap();
        assert_eq!(reopened.get("broker"), Some(&record("broker", "main")));

        assert!(table.update("broker", record("broker", "v2")).unwrap());
        let reopened = ManifestTable::open(&path, "mpm").unwrap();
        assert_eq!(reopened.get("broker").unwrap().reference, "v2");

        assert!(table.remove("broker").unwrap());
        let reopened = ManifestTable::open(&path, "mpm").unwrap();
        assert!(reopened.get("broker").is_none());
    }

    #[test]
    fn test_update_and_remove_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut table = ManifestTable::open(temp_dir.path().join("db.yml"), "mpm").unwrap();

        assert!(!table.update("ghost", record("ghost", "main")).unwrap());
        assert!(!table.remove("ghost").unwrap());
    }

    #[test]
    fn test_upsert_replaces_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let mut table = ManifestTable::open(temp_dir.path().join("db.yml"), "mpm").unwrap();

        table.upsert(record("broker", "main")).unwrap();
        table.upsert(record("broker", "v2")).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("broker").unwrap().reference, "v2");
    }

    #[test]
    fn test_tables_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.yaml");

        let mut default = ManifestTable::open(&path, "default").unwrap();
        default.insert(record("broker", "main")).unwrap();

        let mut release = ManifestTable::open(&path, "release").unwrap();
        release.insert(record("broker", "v1.0.0")).unwrap();

        let tables = read_tables(&path).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables["default"][0].reference, "main");
        assert_eq!(tables["release"][0].reference, "v1.0.0");
    }

    #[test]
    fn test_drop_table_keeps_other_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.yaml");

        let mut keep = ManifestTable::open(&path, "keep").unwrap();
        keep.insert(record("broker", "main")).unwrap();

        let empty = ManifestTable::open(&path, "empty").unwrap();
        empty.drop_table().unwrap();

        let tables = read_tables(&path).unwrap();
        assert!(tables.contains_key("keep"));
        assert!(!tables.contains_key("empty"));
    }

    #[test]
    fn test_contains_compares_by_value() {
        let temp_dir = TempDir::new().unwrap();
        let mut table = ManifestTable::open(temp_dir.path().join("db.yml"), "mpm").unwrap();
        table.insert(record("broker", "main")).unwrap();

        assert!(table.contains(&record("broker", "main")));
        assert!(!table.contains(&record("broker", "v2")));
    }

    #[test]
    fn test_no_staging_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.yml");
        let mut table = ManifestTable::open(&path, "mpm").unwrap();
        table.insert(record("broker", "main")).unwrap();

        assert!(!staging_path(&path).exists());
    }
}
