//! # Reconciliation Engine
//!
//! The engine decides what an install, uninstall, update, purge or convert
//! request means given the current state, then carries it out through the
//! [`GitOperations`] adapter and the working [`Registry`].
//!
//! ## Install state machine
//!
//! Two observations drive every install: whether the registry has a record
//! for the module name, and whether a checkout marker exists at that record's
//! path.
//!
//! | registry | checkout | outcome                                         |
//! |----------|----------|-------------------------------------------------|
//! | no       | -        | [`InstallOutcome::Installed`]: clone, checkout, insert |
//! | yes      | yes      | [`InstallOutcome::AlreadyInstalled`]: nothing changes |
//! | yes      | no       | [`InstallOutcome::Reinstalled`]: clone at the stored path, refresh the record |
//!
//! ## Ordering
//!
//! The registry is always written last. A failed clone or checkout leaves
//! the registry untouched, and an uninstall only drops the record once the
//! working directory is gone. Ignore-file bookkeeping follows the registry
//! write and only logs on failure.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::MpmConfig;
use crate::error::{Error, Result};
use crate::exchange::{self, FreezeReport};
use crate::filesystem;
use crate::ignore;
use crate::git::Submodule;
use crate::path::{
    join_module_path, module_name_from_url, normalize, parent_directory, to_host,
    validate_module_name,
};
use crate::registry::{ModuleRecord, Registry};
use crate::vcs::GitOperations;

/// What to install and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub remote_url: String,
    pub reference: String,
    pub directory: String,
    /// Explicit module name; derived from `remote_url` when `None`
    pub name: Option<String>,
}

impl InstallRequest {
    pub fn new(
        remote_url: impl Into<String>,
        reference: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            remote_url: remote_url.into(),
            reference: reference.into(),
            directory: directory.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Install request that recreates a stored record at its stored path.
    pub fn from_record(record: &ModuleRecord) -> Self {
        Self::new(
            record.remote_url.clone(),
            record.reference.clone(),
            parent_directory(&record.path),
        )
        .with_name(record.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Fresh install; the record was inserted
    Installed(ModuleRecord),
    /// The record existed but its checkout was missing; both were restored
    Reinstalled(ModuleRecord),
    /// Record and checkout both present; nothing was changed
    AlreadyInstalled(ModuleRecord),
}

impl InstallOutcome {
    pub fn record(&self) -> &ModuleRecord {
        match self {
            Self::Installed(record) | Self::Reinstalled(record) | Self::AlreadyInstalled(record) => {
                record
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    Uninstalled(ModuleRecord),
    /// No record with that name; nothing to uninstall
    NotInstalled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated {
        previous: ModuleRecord,
        current: ModuleRecord,
    },
    /// No record with that name; nothing was done
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOutcome {
    Purged(Vec<ModuleRecord>),
    /// The registry was already empty
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    Converted {
        installs: Vec<InstallOutcome>,
        /// Number of submodules removed from the host's submodule list
        deregistered: usize,
        freeze: FreezeReport,
    },
    /// The host repository has no submodules
    NoSubmodules,
}

/// A registry record together with the state of its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStatus {
    pub record: ModuleRecord,
    /// False when the working directory was deleted outside mpm
    pub checkout_present: bool,
}

/// Executes reconciliation actions for one project.
pub struct Engine<'a> {
    config: &'a MpmConfig,
    git: &'a dyn GitOperations,
    registry: Registry,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a MpmConfig, git: &'a dyn GitOperations) -> Self {
        Self {
            config,
            git,
            registry: Registry::working(config),
        }
    }

    pub fn config(&self) -> &MpmConfig {
        self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Install a module according to the install state machine.
    pub fn install(&self, request: &InstallRequest) -> Result<InstallOutcome> {
        let name = match &request.name {
            Some(name) => name.clone(),
            None => module_name_from_url(&request.remote_url)?,
        };
        validate_module_name(&name)?;
        let full_path = join_module_path(&request.directory, &name);

        match self.registry.get(&name)? {
            None => {
                info!("installing {} into {}", name, full_path);
                self.checkout_module(
                    &request.remote_url,
                    &request.reference,
                    &self.config.resolve(&full_path),
                )?;

                let record = ModuleRecord::new(
                    name,
                    request.remote_url.clone(),
                    request.reference.clone(),
                    full_path,
                );
                self.registry.upsert(record.clone())?;
                self.track(&record.path);
                Ok(InstallOutcome::Installed(record))
            }
            Some(existing) => {
                let working_dir = existing.host_path(self.config.root());
                if filesystem::has_checkout(&working_dir) {
                    info!("{} is already installed at {}", name, existing.path);
                    return Ok(InstallOutcome::AlreadyInstalled(existing));
                }

                info!("{} is registered but its folder is missing, reinstalling", name);
                self.checkout_module(&request.remote_url, &request.reference, &working_dir)?;

                let record = ModuleRecord::new(
                    name,
                    request.remote_url.clone(),
                    request.reference.clone(),
                    existing.path,
                );
                self.registry.upsert(record.clone())?;
                self.track(&record.path);
                Ok(InstallOutcome::Reinstalled(record))
            }
        }
    }

    /// Remove a module's working directory, then its record.
    pub fn uninstall(&self, name: &str) -> Result<UninstallOutcome> {
        let Some(record) = self.registry.get(name)? else {
            info!("{} is not installed", name);
            return Ok(UninstallOutcome::NotInstalled);
        };

        filesystem::remove_tree(&record.host_path(self.config.root()))?;
        self.registry.remove(name)?;
        self.untrack(&record.path);

        info!("uninstalled {} from {}", name, record.path);
        Ok(UninstallOutcome::Uninstalled(record))
    }

    /// Re-checkout a module at a new (or its current) reference and
    /// optionally move it to a new install directory.
    pub fn update(
        &self,
        name: &str,
        reference: Option<&str>,
        directory: Option<&str>,
    ) -> Result<UpdateOutcome> {
        let Some(previous) = self.registry.get(name)? else {
            info!("{} not found in the registry", name);
            return Ok(UpdateOutcome::NotFound);
        };

        let mut current = previous.clone();
        let working_dir = previous.host_path(self.config.root());

        if let Some(reference) = reference {
            current.reference = reference.to_string();
        }
        self.checkout_module(&current.remote_url, &current.reference, &working_dir)?;

        if let Some(directory) = directory {
            let new_path = join_module_path(directory, &current.name);
            if new_path != current.path {
                info!("moving {} from {} to {}", name, current.path, new_path);
                filesystem::move_tree(&working_dir, &self.config.resolve(&new_path))?;
                current.path = new_path;
            }
        }

        self.registry.upsert(current.clone())?;
        if current.path != previous.path {
            self.untrack(&previous.path);
            self.track(&current.path);
        }

        Ok(UpdateOutcome::Updated { previous, current })
    }

    /// Uninstall every registered module.
    pub fn purge(&self) -> Result<PurgeOutcome> {
        // Snapshot names first; uninstall mutates the registry
        let names: Vec<String> = self
            .registry
            .all()?
            .into_iter()
            .map(|record| record.name)
            .collect();

        if names.is_empty() {
            return Ok(PurgeOutcome::Empty);
        }

        let mut removed = Vec::with_capacity(names.len());
        for name in names {
            if let UninstallOutcome::Uninstalled(record) = self.uninstall(&name)? {
                removed.push(record);
            }
        }
        Ok(PurgeOutcome::Purged(removed))
    }

    /// Turn the project's git submodules into tracked modules, then freeze
    /// the installed set into `export_file` under `product`.
    ///
    /// With `hard`, each submodule is also removed from the host repository's
    /// submodule list while its files stay in place.
    pub fn convert(&self, export_file: &Path, product: &str, hard: bool) -> Result<ConvertOutcome> {
        let host = self.git.open(self.config.root())?;
        let submodules = self.git.list_submodules(&host)?;
        if submodules.is_empty() {
            return Ok(ConvertOutcome::NoSubmodules);
        }

        // Resolve every request before touching anything so that a name clash
        // cannot leave some submodules deregistered but untracked
        let requests = submodules
            .iter()
            .map(|submodule| self.convert_request(submodule))
            .collect::<Result<Vec<_>>>()?;
        check_unique_names(&submodules, &requests)?;

        let mut installs = Vec::with_capacity(submodules.len());
        let mut deregistered = 0;
        for (submodule, request) in submodules.iter().zip(&requests) {
            installs.push(self.install(request)?);

            if hard {
                info!("deregistering submodule {}", submodule.name);
                self.git.deregister_submodule(&host, submodule)?;
                deregistered += 1;
            }
        }

        let freeze = exchange::freeze(self.config, export_file, product)?;
        Ok(ConvertOutcome::Converted {
            installs,
            deregistered,
            freeze,
        })
    }

    /// The install request that adopts `submodule` in place.
    ///
    /// An initialized submodule is pinned at the commit its working tree has
    /// checked out; otherwise at the commit the host repository records.
    fn convert_request(&self, submodule: &Submodule) -> Result<InstallRequest> {
        let name = submodule_basename(&submodule.path);
        validate_module_name(&name)?;
        let path = normalize(&submodule.path);

        if let Some(existing) = self.registry.get(&name)? {
            if existing.path != path {
                return Err(Error::Submodule {
                    name: submodule.name.clone(),
                    message: format!(
                        "module '{}' is already installed at {}",
                        name, existing.path
                    ),
                });
            }
        }

        let working_dir = self.config.resolve(&path);
        let reference = if filesystem::has_checkout(&working_dir) {
            self.git.head_commit(&self.git.open(&working_dir)?)?
        } else {
            submodule.head_commit.clone()
        };

        Ok(InstallRequest::new(
            submodule.url.clone(),
            reference,
            parent_directory(&path),
        )
        .with_name(name))
    }

    /// Every registered module and whether its checkout is on disk.
    pub fn status(&self) -> Result<Vec<ModuleStatus>> {
        Ok(self
            .registry
            .all()?
            .into_iter()
            .map(|record| {
                let checkout_present =
                    filesystem::has_checkout(&record.host_path(self.config.root()));
                ModuleStatus {
                    record,
                    checkout_present,
                }
            })
            .collect())
    }

    /// Clone (or open) the checkout at `working_dir`, fetch, and check out
    /// `reference`.
    fn checkout_module(&self, remote_url: &str, reference: &str, working_dir: &Path) -> Result<()> {
        let checkout = if filesystem::has_checkout(working_dir) {
            self.git.open(working_dir)?
        } else {
            self.git.clone_repository(remote_url, working_dir)?
        };

        self.git.fetch_all(&checkout)?;

        match self.git.is_local_only_ref(&checkout, reference) {
            Ok(true) => warn!(
                "Reference '{}' is a local branch or commit. If you check in a manifest \
                 containing a local reference, it will not resolve when someone loads it \
                 into a fresh clone. Only commit local references for draft work.",
                reference
            ),
            Ok(false) => {}
            // Checkout below reports unknown references with a better message
            Err(e) => debug!("could not classify reference '{}': {}", reference, e),
        }

        self.git.checkout(&checkout, reference)
    }

    fn track(&self, path: &str) {
        if let Err(e) = ignore::add_entry(&self.config.ignore_path(), path) {
            warn!("Could not add {} to the ignore file: {}", path, e);
        }
    }

    fn untrack(&self, path: &str) {
        if let Err(e) = ignore::remove_entry(&self.config.ignore_path(), path) {
            warn!("Could not remove {} from the ignore file: {}", path, e);
        }
    }
}

/// Fail when two submodules would become modules of the same name.
fn check_unique_names(submodules: &[Submodule], requests: &[InstallRequest]) -> Result<()> {
    let mut claimed: HashMap<&str, &str> = HashMap::new();
    for (submodule, request) in submodules.iter().zip(requests) {
        let name = request.name.as_deref().unwrap_or_default();
        if let Some(first) = claimed.insert(name, &submodule.path) {
            return Err(Error::Submodule {
                name: submodule.name.clone(),
                message: format!(
                    "module name '{}' is also taken by submodule {}; \
                     move one of them before converting",
                    name, first
                ),
            });
        }
    }
    Ok(())
}

fn submodule_basename(path: &str) -> String {
    to_host(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
