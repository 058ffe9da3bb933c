//! Snapshot command handler

use super::Workspace;
use nu_progress::config::Config;

/// Print a student's program-of-study snapshot
///
/// # Errors
/// Returns a printable message if the data cannot be loaded or the student is unknown
pub fn run(student: &str, config: &Config) -> Result<(), String> {
    let workspace = Workspace::load(config)?;
    let engine = workspace.engine(config)?;
    let snapshot = engine
        .recompute_program_snapshot(student)
        .map_err(|e| format!("✗ {e}"))?;

    println!(
        "\n=== {} for {student} ===\n",
        engine.requirements().name
    );
    print!("{snapshot}");
    Ok(())
}
