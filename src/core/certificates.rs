//! Certificate progress evaluation
//!
//! Advisory only: the notices never block a registration.

use crate::core::models::{Certificate, CertificateNotice, CourseId};
use std::collections::BTreeSet;

/// Message returned when no certificate lists the course
pub const NO_CERTIFICATE_MESSAGE: &str = "This course does not count toward any certificate.";

/// Certificate progress a single course would bring.
///
/// Only certificates that explicitly require `course_id` are reported. When
/// none do, a single informational notice with no certificate name is
/// returned.
#[must_use]
pub fn evaluate(
    course_id: &str,
    completed: &BTreeSet<CourseId>,
    certificates: &[Certificate],
) -> Vec<CertificateNotice> {
    let notices: Vec<CertificateNotice> = certificates
        .iter()
        .filter(|certificate| certificate.requires(course_id))
        .map(|certificate| notice_for(course_id, completed, certificate))
        .collect();

    if notices.is_empty() {
        vec![CertificateNotice {
            certificate_name: None,
            message: NO_CERTIFICATE_MESSAGE.to_string(),
            will_complete: false,
            eligible_now: false,
        }]
    } else {
        notices
    }
}

fn notice_for(
    course_id: &str,
    completed: &BTreeSet<CourseId>,
    certificate: &Certificate,
) -> CertificateNotice {
    let remaining: Vec<&str> = certificate
        .required
        .iter()
        .map(String::as_str)
        .filter(|required| !completed.contains(*required))
        .collect();
    let name = &certificate.name;

    let (message, will_complete) = if remaining.is_empty() {
        (format!("{name}: certificate requirements already met."), false)
    } else if remaining == [course_id] {
        (
            format!("{name}: 1 course(s) away. Completing this course earns the certificate."),
            true,
        )
    } else {
        let after = remaining.iter().filter(|r| **r != course_id).count();
        (
            format!("{name}: {after} course(s) away after completing this course."),
            false,
        )
    };

    CertificateNotice {
        certificate_name: Some(name.clone()),
        message,
        will_complete,
        eligible_now: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(name: &str, required: &[&str]) -> Certificate {
        Certificate::new(name, required.iter().map(|c| (*c).to_string()).collect()).unwrap()
    }

    fn done(ids: &[&str]) -> BTreeSet<CourseId> {
        ids.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_single_course_certificate_completes() {
        let notices = evaluate("CSX", &done(&[]), &[cert("Solo", &["CSX"])]);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].will_complete);
        assert!(notices[0].eligible_now);
        assert_eq!(notices[0].certificate_name.as_deref(), Some("Solo"));
    }

    #[test]
    fn test_last_course_reports_one_away() {
        let notices = evaluate("CSY", &done(&["CSX"]), &[cert("Pair", &["CSX", "CSY"])]);
        assert!(notices[0].will_complete);
        assert!(notices[0].message.contains("1 course(s) away"));
    }

    #[test]
    fn test_remaining_count_excludes_current_course() {
        let notices = evaluate(
            "CSY",
            &done(&[]),
            &[cert("Trio", &["CSX", "CSY", "CSZ"])],
        );
        assert!(!notices[0].will_complete);
        assert!(notices[0].eligible_now);
        assert!(notices[0].message.contains("2 course(s) away"));
    }

    #[test]
    fn test_course_in_no_certificate() {
        let notices = evaluate("CS5010", &done(&[]), &[cert("AI", &["CS5100"])]);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].certificate_name.is_none());
        assert!(!notices[0].eligible_now);
        assert_eq!(notices[0].message, NO_CERTIFICATE_MESSAGE);
    }

    #[test]
    fn test_only_requiring_certificates_reported() {
        let certificates = [
            cert("AI", &["CS5100", "CS6140"]),
            cert("Systems", &["CS5600"]),
            cert("Data", &["CS6140", "DS5110"]),
        ];
        let notices = evaluate("CS6140", &done(&["CS5100"]), &certificates);
        let names: Vec<_> = notices
            .iter()
            .filter_map(|n| n.certificate_name.as_deref())
            .collect();
        assert_eq!(names, vec!["AI", "Data"]);
        assert!(notices[0].will_complete);
        assert!(!notices[1].will_complete);
    }

    #[test]
    fn test_retaking_completed_course() {
        let notices = evaluate("CSX", &done(&["CSX"]), &[cert("Pair", &["CSX", "CSY"])]);
        assert!(!notices[0].will_complete);
        assert!(notices[0].message.contains("1 course(s) away after"));

        let earned = evaluate("CSX", &done(&["CSX", "CSY"]), &[cert("Pair", &["CSX", "CSY"])]);
        assert!(earned[0].message.contains("already met"));
    }
}
