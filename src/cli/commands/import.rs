//! Import command handler

use nu_progress::config::Config;
use nu_progress::core::catalog::load_catalog_csv;
use nu_progress::core::prerequisites::MatchMode;
use nu_progress::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Validate a catalog CSV, report its contents, and optionally install it
///
/// # Errors
/// Returns a printable message if the file cannot be parsed, or if `install`
/// is requested for a file with row errors or failed integrity checks
pub fn run(input_file: &Path, install: bool, config: &Config, verbose: bool) -> Result<(), String> {
    let (catalog, report) = load_catalog_csv(input_file).map_err(|e| {
        error!("Failed to import catalog {}: {e}", input_file.display());
        format!("✗ Failed to import {}: {e}", input_file.display())
    })?;

    println!(
        "✓ {} ({}): {} offering(s), {} inserted, {} updated",
        catalog.name,
        catalog.institution,
        catalog.offering_count(),
        report.inserted,
        report.updated
    );
    for problem in &report.errors {
        println!("  ✗ {problem}");
    }
    if verbose {
        for course in catalog.courses() {
            println!("  {} {} ({} cr, {})", course.code(), course.title, course.credits, course.term);
        }
    }

    let by_title = config.rules.prerequisite_match == MatchMode::Title;
    let mut clean = report.is_clean();
    if let Err(unresolved) = catalog.validate_prerequisites(by_title) {
        clean = false;
        for problem in unresolved {
            println!("  ✗ {problem}");
        }
    }
    if by_title {
        if let Err(e) = catalog.ensure_unique_titles() {
            clean = false;
            println!("  ✗ {e}");
        }
    }

    if !install {
        return Ok(());
    }
    if !clean {
        return Err("✗ Catalog has problems; not installing".to_string());
    }

    let target = PathBuf::from(&config.data.catalog_file);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("✗ Failed to create {}: {e}", parent.display()))?;
    }
    fs::copy(input_file, &target)
        .map_err(|e| format!("✗ Failed to install catalog to {}: {e}", target.display()))?;
    info!("Installed catalog {} to {}", input_file.display(), target.display());
    println!("✓ Installed catalog to {}", target.display());
    Ok(())
}
