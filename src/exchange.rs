//! # Manifest Exchange
//!
//! `freeze` exports the working registry into a named table (a "product")
//! of an export manifest such as `package.yaml`; `load` replays such a table
//! as a sequence of installs. One export file can hold several products,
//! for example `default` and `release`, side by side.

use std::path::Path;

use log::info;

use crate::config::MpmConfig;
use crate::engine::{Engine, InstallOutcome, InstallRequest};
use crate::error::Result;
use crate::filesystem;
use crate::manifest::ManifestTable;
use crate::registry::Registry;

/// How a freeze changed the export table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreezeReport {
    /// Records newly written to the export table
    pub added: usize,
    /// Records already present with identical values
    pub unchanged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// One install outcome per entry, in file order
    Loaded(Vec<InstallOutcome>),
    /// The product's table was empty (and has been removed from the file)
    NothingToLoad,
    /// The export file does not exist
    FileNotFound,
}

/// Export every working-registry record into table `product` of `filename`.
///
/// Freezing is additive: a record is written unless an identical one is
/// already stored, and nothing already in the product is modified or
/// removed. A module frozen again after its reference changed therefore
/// appears twice; `load` installs the first entry and reports the second as
/// already installed.
pub fn freeze(config: &MpmConfig, filename: &Path, product: &str) -> Result<FreezeReport> {
    filesystem::ensure_file(filename)?;

    let installed = Registry::working(config).all()?;
    let mut export = ManifestTable::open(filename, product)?;
    let mut report = FreezeReport::default();

    for record in installed {
        if export.contains(&record) {
            report.unchanged += 1;
        } else {
            export.insert(record)?;
            report.added += 1;
        }
    }

    info!(
        "froze {} new and {} unchanged module(s) into {}:{}",
        report.added,
        report.unchanged,
        filename.display(),
        product
    );
    Ok(report)
}

/// Install every module listed in table `product` of `filename`, in file
/// order, through the full install state machine.
pub fn load(engine: &Engine<'_>, filename: &Path, product: &str) -> Result<LoadOutcome> {
    if !filename.exists() {
        return Ok(LoadOutcome::FileNotFound);
    }

    let table = ManifestTable::open(filename, product)?;
    if table.is_empty() {
        table.drop_table()?;
        return Ok(LoadOutcome::NothingToLoad);
    }
    let entries = table.all().to_vec();
    drop(table);

    let mut outcomes = Vec::with_capacity(entries.len());
    for entry in &entries {
        outcomes.push(engine.install(&InstallRequest::from_record(entry))?);
    }
    Ok(LoadOutcome::Loaded(outcomes))
}
