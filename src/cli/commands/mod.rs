//! CLI command handlers for `NuProgress`.
//!
//! Each command is implemented in its own submodule. Commands that touch
//! student data share the [`Workspace`] loader.

pub mod certificates;
pub mod check;
pub mod config;
pub mod import;
pub mod register;
pub mod snapshot;

use nu_progress::config::Config;
use nu_progress::core::catalog::{load_catalog_csv, Catalog};
use nu_progress::core::store::MemoryStore;
use nu_progress::core::EligibilityEngine;
use nu_progress::{debug, warn};
use std::path::PathBuf;

/// Catalog and record store loaded from the configured data files
pub struct Workspace {
    catalog: Catalog,
    store: MemoryStore,
    store_path: PathBuf,
}

impl Workspace {
    /// Load the catalog CSV and the store file named in `config`
    ///
    /// # Errors
    /// Returns a printable message if either file is missing or malformed
    pub fn load(config: &Config) -> Result<Self, String> {
        if config.data.catalog_file.is_empty() {
            return Err("✗ No catalog file configured (set data.catalog_file or pass --catalog)".to_string());
        }
        if config.data.store_file.is_empty() {
            return Err("✗ No store file configured (set data.store_file or pass --store)".to_string());
        }

        let catalog_path = PathBuf::from(&config.data.catalog_file);
        let (catalog, report) = load_catalog_csv(&catalog_path)
            .map_err(|e| format!("✗ Failed to load catalog {}: {e}", catalog_path.display()))?;
        for problem in &report.errors {
            warn!("{}: {problem}", catalog_path.display());
        }
        debug!(
            "Loaded catalog '{}' ({} offerings)",
            catalog.name,
            catalog.offering_count()
        );

        let store_path = PathBuf::from(&config.data.store_file);
        let store = MemoryStore::load(&store_path)
            .map_err(|e| format!("✗ Failed to load store {}: {e}", store_path.display()))?;

        Ok(Self {
            catalog,
            store,
            store_path,
        })
    }

    /// Build an engine over the loaded data using the configured rules
    ///
    /// # Errors
    /// Returns a printable message if title matching is configured but the
    /// catalog titles are not unique
    pub fn engine(&self, config: &Config) -> Result<EligibilityEngine<'_>, String> {
        EligibilityEngine::new(&self.catalog, &self.store, &self.store)
            .with_match_mode(config.rules.prerequisite_match)
            .map_err(|e| format!("✗ {e}"))
    }

    /// Write the store back to its file
    ///
    /// # Errors
    /// Returns a printable message if the write fails
    pub fn save(&self) -> Result<(), String> {
        self.store
            .save(&self.store_path)
            .map_err(|e| format!("✗ Failed to save store {}: {e}", self.store_path.display()))
    }
}
