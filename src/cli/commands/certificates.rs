//! Certificates command handler

use super::check::print_notices;
use super::Workspace;
use nu_progress::config::Config;

/// Show the certificate progress `course` would bring `student`
///
/// # Errors
/// Returns a printable message if the data cannot be loaded or an id does not resolve
pub fn run(student: &str, course: &str, config: &Config) -> Result<(), String> {
    let workspace = Workspace::load(config)?;
    let engine = workspace.engine(config)?;
    let notices = engine
        .check_certificate_impact(course, student)
        .map_err(|e| format!("✗ {e}"))?;

    println!("Certificate progress for {student} taking {course}:");
    print_notices(&notices);
    Ok(())
}
