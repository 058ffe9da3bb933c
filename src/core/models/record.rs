//! Academic record model

use super::course::{CourseId, Term};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Student identifier
pub type StudentId = String;

/// Final grade posted for a completed course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 4.0
    A,
    /// 3.0
    B,
    /// 2.0
    C,
    /// 1.0
    D,
    /// 0.0, earns no credit
    F,
    /// Pass (credit-bearing, not in GPA)
    Pass,
    /// No pass (no credit, not in GPA)
    NoPass,
}

impl Grade {
    /// Grade-point value, or `None` for pass/no-pass grades
    #[must_use]
    pub const fn points(self) -> Option<f64> {
        match self {
            Self::A => Some(4.0),
            Self::B => Some(3.0),
            Self::C => Some(2.0),
            Self::D => Some(1.0),
            Self::F => Some(0.0),
            Self::Pass | Self::NoPass => None,
        }
    }

    /// Whether the grade earns the course's credits
    #[must_use]
    pub const fn earns_credit(self) -> bool {
        !matches!(self, Self::F | Self::NoPass)
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "F" => Ok(Self::F),
            "P" | "PASS" => Ok(Self::Pass),
            "NP" | "NOPASS" | "NO PASS" => Ok(Self::NoPass),
            other => Err(format!("Unknown grade '{other}'")),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
            Self::Pass => "Pass",
            Self::NoPass => "No Pass",
        };
        f.write_str(label)
    }
}

/// Lifecycle status of a record entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Registered, no grade yet
    Planned,
    /// Grade posted
    Completed,
    /// Dropped. Drops normally delete the entry; imported histories may still
    /// carry this status and it is ignored by every evaluator.
    Dropped,
}

/// One course attempt in a student's academic record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecordEntry {
    /// Owning student
    pub student_id: StudentId,
    /// Course taken
    pub course_id: CourseId,
    /// Attempt status
    pub status: RecordStatus,
    /// Posted grade (present iff status is Completed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    /// Term the course was taken
    pub term: Term,
    /// Credits captured when the course was taken
    pub credits: u32,
}

/// Uniqueness key of a record entry: (student, course, term)
pub type RecordKey = (StudentId, CourseId, Term);

impl AcademicRecordEntry {
    /// Create a planned entry
    #[must_use]
    pub fn planned(student_id: &str, course_id: &str, term: Term, credits: u32) -> Self {
        Self {
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            status: RecordStatus::Planned,
            grade: None,
            term,
            credits,
        }
    }

    /// Create a completed entry
    #[must_use]
    pub fn completed(
        student_id: &str,
        course_id: &str,
        grade: Grade,
        term: Term,
        credits: u32,
    ) -> Self {
        Self {
            status: RecordStatus::Completed,
            grade: Some(grade),
            ..Self::planned(student_id, course_id, term, credits)
        }
    }

    /// Uniqueness key for this entry
    #[must_use]
    pub fn key(&self) -> RecordKey {
        (self.student_id.clone(), self.course_id.clone(), self.term)
    }

    /// Whether the entry counts as a completed course with a credit-earning grade
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.status == RecordStatus::Completed && self.grade.is_some_and(Grade::earns_credit)
    }

    /// Check field-level invariants
    ///
    /// # Errors
    /// Returns a message when a required field is missing or a grade is
    /// present on a non-completed entry
    pub fn validate(&self) -> Result<(), String> {
        if self.student_id.trim().is_empty() {
            return Err("Record entry is missing a student id".to_string());
        }
        if self.course_id.trim().is_empty() {
            return Err("Record entry is missing a course id".to_string());
        }
        match (self.status, self.grade) {
            (RecordStatus::Completed, None) => Err(format!(
                "Completed entry for '{}' has no grade",
                self.course_id
            )),
            (RecordStatus::Planned | RecordStatus::Dropped, Some(grade)) => Err(format!(
                "Entry for '{}' carries grade {grade} but is not completed",
                self.course_id
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::course::Semester;

    fn term() -> Term {
        Term::new(Semester::Fall, 2024)
    }

    #[test]
    fn test_grade_points() {
        assert_eq!(Grade::A.points(), Some(4.0));
        assert_eq!(Grade::F.points(), Some(0.0));
        assert_eq!(Grade::Pass.points(), None);
        assert!(!Grade::F.earns_credit());
        assert!(Grade::Pass.earns_credit());
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!("a".parse::<Grade>(), Ok(Grade::A));
        assert_eq!("P".parse::<Grade>(), Ok(Grade::Pass));
        assert_eq!("np".parse::<Grade>(), Ok(Grade::NoPass));
        assert!("E".parse::<Grade>().is_err());
    }

    #[test]
    fn test_validate_requires_grade_when_completed() {
        let mut entry = AcademicRecordEntry::planned("s1", "CS5010", term(), 4);
        assert!(entry.validate().is_ok());

        entry.status = RecordStatus::Completed;
        assert!(entry.validate().is_err());

        entry.grade = Some(Grade::B);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_grade_on_planned() {
        let mut entry = AcademicRecordEntry::planned("s1", "CS5010", term(), 4);
        entry.grade = Some(Grade::A);
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_ids() {
        let entry = AcademicRecordEntry::planned(" ", "CS5010", term(), 4);
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_failed_course_is_not_passed() {
        let failed = AcademicRecordEntry::completed("s1", "CS5010", Grade::F, term(), 4);
        let passed = AcademicRecordEntry::completed("s1", "CS5010", Grade::C, term(), 4);
        assert!(!failed.is_passed());
        assert!(passed.is_passed());
    }
}
