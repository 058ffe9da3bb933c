//! Check and confirm command handlers

use super::Workspace;
use nu_progress::config::Config;
use nu_progress::core::models::{CertificateNotice, EligibilityVerdict, RejectionReason};
use nu_progress::{info, verbose};

/// Check whether a student may register for a course
///
/// # Errors
/// Returns a printable message if the data cannot be loaded or an id does not resolve
pub fn run(student: &str, course: &str, config: &Config) -> Result<(), String> {
    let workspace = Workspace::load(config)?;
    let engine = workspace.engine(config)?;
    let verdict = engine
        .check_prerequisites(student, course)
        .map_err(|e| format!("✗ {e}"))?;
    print_verdict(&verdict);
    Ok(())
}

/// Re-check with prerequisites the student confirmed as completed elsewhere
///
/// # Errors
/// Returns a printable message if the data cannot be loaded, an id does not
/// resolve or a confirmed item is not a prerequisite of the course
pub fn confirm(
    student: &str,
    course: &str,
    confirmed: &[String],
    config: &Config,
) -> Result<(), String> {
    let workspace = Workspace::load(config)?;
    let engine = workspace.engine(config)?;
    let verdict = engine
        .confirm_prerequisites(student, course, confirmed)
        .map_err(|e| format!("✗ {e}"))?;
    info!("{student} confirmed {} prerequisite(s) for {course}", confirmed.len());
    print_verdict(&verdict);
    Ok(())
}

/// Print a verdict in the CLI's usual style
pub fn print_verdict(verdict: &EligibilityVerdict) {
    if verdict.allowed {
        println!(
            "✓ {} may register for {}",
            verdict.student_id, verdict.course_id
        );
    } else {
        println!(
            "✗ {} may not register for {} yet",
            verdict.student_id, verdict.course_id
        );
    }

    if let Some(message) = &verdict.message {
        println!("  {message}");
    }
    if verdict.rejection_reason == Some(RejectionReason::PrerequisitesUnmet) {
        println!("  Missing prerequisites:");
        for title in &verdict.unmet_prerequisites {
            println!("    - {title}");
        }
        println!("  Run `nuprogress confirm` if these were completed elsewhere.");
    }

    print_notices(&verdict.certificate_impact);
    verbose!("  Evaluation: {:?}", verdict.trace);
}

/// Print certificate notices
pub fn print_notices(notices: &[CertificateNotice]) {
    for notice in notices {
        let marker = if notice.will_complete { "★" } else { "·" };
        println!("  {marker} {}", notice.message);
    }
}
