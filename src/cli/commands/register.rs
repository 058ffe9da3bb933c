//! Register, grade and drop command handlers
//!
//! Each handler saves the store after a successful mutation.

use super::check::print_verdict;
use super::Workspace;
use nu_progress::config::Config;
use nu_progress::core::models::{Grade, Term};
use nu_progress::core::RegistrationOutcome;

/// Register a student for a course
///
/// # Errors
/// Returns a printable message on load failures, unknown ids, duplicate or
/// pending registrations, and failed saves
pub fn register(
    student: &str,
    course: &str,
    term: Term,
    confirmed: &[String],
    config: &Config,
) -> Result<(), String> {
    let workspace = Workspace::load(config)?;
    let engine = workspace.engine(config)?;
    let outcome = engine
        .register(student, course, term, confirmed)
        .map_err(|e| {
            if e.is_retryable() {
                format!("✗ {e} (resolve the pending entry and retry)")
            } else {
                format!("✗ {e}")
            }
        })?;

    print_verdict(outcome.verdict());
    if let RegistrationOutcome::Registered { entry, .. } = &outcome {
        workspace.save()?;
        println!(
            "✓ Registered {} for {} in {} ({} credits)",
            entry.student_id, entry.course_id, entry.term, entry.credits
        );
    }
    Ok(())
}

/// Post a grade and print the updated snapshot
///
/// # Errors
/// Returns a printable message on load failures, a missing planned entry, or a failed save
pub fn grade(student: &str, course: &str, grade: Grade, config: &Config) -> Result<(), String> {
    let workspace = Workspace::load(config)?;
    let engine = workspace.engine(config)?;
    let snapshot = engine
        .post_grade(student, course, grade)
        .map_err(|e| format!("✗ {e}"))?;
    workspace.save()?;

    println!("✓ Posted {grade} for {student} in {course}\n");
    print!("{snapshot}");
    Ok(())
}

/// Drop a course and print the updated snapshot
///
/// # Errors
/// Returns a printable message on load failures, a missing entry, or a failed save
pub fn drop_course(student: &str, course: &str, config: &Config) -> Result<(), String> {
    let workspace = Workspace::load(config)?;
    let engine = workspace.engine(config)?;
    let snapshot = engine
        .drop_course(student, course)
        .map_err(|e| format!("✗ {e}"))?;
    workspace.save()?;

    println!("✓ Dropped {course} for {student}\n");
    print!("{snapshot}");
    Ok(())
}
