//! Program-of-study aggregation
//!
//! Recomputes every statistic from the full record on each call. Record sizes
//! are bounded by program length, so there is no incremental state.

use crate::core::catalog::CourseCatalog;
use crate::core::error::{EngineError, EngineResult, EntityKind};
use crate::core::models::{
    AcademicRecordEntry, Category, CompletionStatus, ProgramSnapshot, RecordStatus,
};
use crate::warn;
use std::collections::BTreeMap;

/// Credit bounds for one category bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryLimit {
    /// Credits required in this bucket
    pub min: u32,
    /// Credits counted toward the program at most; excess is flagged
    pub max: Option<u32>,
}

impl CategoryLimit {
    /// Minimum-only limit
    #[must_use]
    pub const fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    /// Cap-only limit
    #[must_use]
    pub const fn at_most(max: u32) -> Self {
        Self {
            min: 0,
            max: Some(max),
        }
    }
}

/// Degree thresholds the snapshot is measured against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRequirements {
    /// Program name
    pub name: String,
    /// Minimum credits counted toward the degree
    pub total_min_credits: u32,
    /// Per-category bounds; categories without an entry are unbounded
    pub limits: BTreeMap<Category, CategoryLimit>,
}

impl Default for ProgramRequirements {
    /// The MS program table: 30 credits, with subject and core minimums and
    /// caps on lower-level and bridge coursework.
    fn default() -> Self {
        Self {
            name: "MS Computer Science".to_string(),
            total_min_credits: 30,
            limits: BTreeMap::from([
                (Category::SubjectCs, CategoryLimit::at_least(8)),
                (Category::SubjectDs, CategoryLimit::at_least(4)),
                (Category::Core, CategoryLimit::at_least(8)),
                (Category::LowerLevel, CategoryLimit::at_most(8)),
                (Category::Prerequisite, CategoryLimit::at_most(4)),
            ]),
        }
    }
}

impl ProgramRequirements {
    /// Limit for a category (unbounded when not listed)
    #[must_use]
    pub fn limit(&self, category: Category) -> CategoryLimit {
        self.limits.get(&category).copied().unwrap_or_default()
    }
}

/// Recompute a program snapshot from a student's full record
///
/// Completed entries are bucketed by their course's primary category using
/// the credits captured on the entry. F and no-pass grades earn no credits;
/// F still counts in the GPA denominator. Planned and dropped entries are
/// ignored. Completed courses missing from the catalog contribute neither
/// credits nor grade points and are listed in `unresolved_courses`.
///
/// # Errors
/// Returns `Validation` if an entry is malformed or its course has no category
pub fn recompute(
    record: &[AcademicRecordEntry],
    catalog: &dyn CourseCatalog,
    requirements: &ProgramRequirements,
) -> EngineResult<ProgramSnapshot> {
    let mut credits_by_category: BTreeMap<Category, u32> =
        Category::ALL.into_iter().map(|c| (c, 0)).collect();
    let mut total_credits = 0u32;
    let mut completed_count = 0usize;
    let mut grade_points = 0.0f64;
    let mut graded_credits = 0u32;
    let mut unresolved_courses = Vec::new();

    for entry in record.iter().filter(|e| e.status == RecordStatus::Completed) {
        entry.validate().map_err(EngineError::Validation)?;
        let Some(grade) = entry.grade else {
            continue;
        };
        completed_count += 1;

        let course = match catalog.course(&entry.course_id) {
            Ok(course) => course,
            Err(EngineError::NotFound {
                kind: EntityKind::Course,
                ..
            }) => {
                warn!(
                    "Completed course '{}' of '{}' is not in the catalog; skipped",
                    entry.course_id, entry.student_id
                );
                unresolved_courses.push(entry.course_id.clone());
                continue;
            }
            Err(e) => return Err(e),
        };

        if let Some(points) = grade.points() {
            grade_points += points * f64::from(entry.credits);
            graded_credits += entry.credits;
        }

        if grade.earns_credit() {
            let category = course.primary_category().ok_or_else(|| {
                EngineError::Validation(format!("course '{}' has no category", course.id))
            })?;
            *credits_by_category.entry(category).or_default() += entry.credits;
            total_credits += entry.credits;
        }
    }

    let gpa = (graded_credits > 0).then(|| grade_points / f64::from(graded_credits));

    let mut counted_credits = 0u32;
    let mut unmet_minimums = BTreeMap::new();
    let mut over_cap = BTreeMap::new();
    for (&category, &earned) in &credits_by_category {
        let limit = requirements.limit(category);
        if earned < limit.min {
            unmet_minimums.insert(category, limit.min - earned);
        }
        match limit.max {
            Some(max) if earned > max => {
                over_cap.insert(category, earned - max);
                counted_credits += max;
            }
            _ => counted_credits += earned,
        }
    }

    let remaining_credits = requirements.total_min_credits.saturating_sub(counted_credits);
    let completion_status = if completed_count == 0 {
        CompletionStatus::NotStarted
    } else if remaining_credits == 0 && unmet_minimums.is_empty() {
        CompletionStatus::Completed
    } else {
        CompletionStatus::InProgress
    };

    Ok(ProgramSnapshot {
        total_credits,
        counted_credits,
        credits_by_category,
        gpa,
        completion_status,
        remaining_credits,
        unmet_minimums,
        over_cap,
        unresolved_courses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::core::models::{Course, Grade, Semester, Term};

    fn term() -> Term {
        Term::new(Semester::Fall, 2024)
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new("Test", "Test U");
        catalog.upsert(Course::new("CS5010", "PDP", 4, Category::Core));
        catalog.upsert(Course::new("CS5800", "Algorithms", 4, Category::Core).with_category(Category::SubjectCs));
        catalog.upsert(Course::new("DS5110", "Data Management", 4, Category::SubjectDs));
        catalog.upsert(Course::new("CS2500", "Fundamentals", 4, Category::LowerLevel).with_category(Category::Prerequisite));
        catalog.upsert(Course::new("CS5001", "Seminar", 2, Category::Core));
        catalog
    }

    fn completed(course: &str, grade: Grade, credits: u32) -> AcademicRecordEntry {
        AcademicRecordEntry::completed("s1", course, grade, term(), credits)
    }

    #[test]
    fn test_empty_record_not_started() {
        let snapshot = recompute(&[], &catalog(), &ProgramRequirements::default()).unwrap();
        assert_eq!(snapshot.completion_status, CompletionStatus::NotStarted);
        assert_eq!(snapshot.total_credits, 0);
        assert_eq!(snapshot.gpa, None);
        assert_eq!(snapshot.remaining_credits, 30);
    }

    #[test]
    fn test_planned_entries_ignored() {
        let record = [AcademicRecordEntry::planned("s1", "CS5010", term(), 4)];
        let snapshot = recompute(&record, &catalog(), &ProgramRequirements::default()).unwrap();
        assert_eq!(snapshot.completion_status, CompletionStatus::NotStarted);
    }

    #[test]
    fn test_gpa_excludes_pass() {
        let record = [
            completed("CS5010", Grade::A, 3),
            completed("DS5110", Grade::B, 4),
            completed("CS5001", Grade::Pass, 2),
        ];
        let snapshot = recompute(&record, &catalog(), &ProgramRequirements::default()).unwrap();
        let gpa = snapshot.gpa.unwrap();
        assert!((gpa - 24.0 / 7.0).abs() < 1e-9);
        assert_eq!(snapshot.total_credits, 9);
    }

    #[test]
    fn test_failed_course_in_gpa_without_credit() {
        let record = [completed("CS5010", Grade::A, 4), completed("DS5110", Grade::F, 4)];
        let snapshot = recompute(&record, &catalog(), &ProgramRequirements::default()).unwrap();
        assert_eq!(snapshot.total_credits, 4);
        assert!((snapshot.gpa.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(snapshot.credits_by_category[&Category::SubjectDs], 0);
    }

    #[test]
    fn test_multi_tag_course_counted_once() {
        let record = [completed("CS5800", Grade::A, 4)];
        let snapshot = recompute(&record, &catalog(), &ProgramRequirements::default()).unwrap();
        assert_eq!(snapshot.credits_by_category[&Category::SubjectCs], 4);
        assert_eq!(snapshot.credits_by_category[&Category::Core], 0);
        let sum: u32 = snapshot.credits_by_category.values().sum();
        assert_eq!(sum, snapshot.total_credits);
    }

    #[test]
    fn test_historical_credits_used() {
        let record = [completed("CS5010", Grade::A, 3)];
        let snapshot = recompute(&record, &catalog(), &ProgramRequirements::default()).unwrap();
        assert_eq!(snapshot.total_credits, 3);
    }

    #[test]
    fn test_cap_flagged_not_counted() {
        let requirements = ProgramRequirements::default();
        let record = [completed("CS2500", Grade::A, 10)];
        let snapshot = recompute(&record, &catalog(), &requirements).unwrap();
        assert_eq!(snapshot.total_credits, 10);
        assert_eq!(snapshot.counted_credits, 8);
        assert_eq!(snapshot.over_cap.get(&Category::LowerLevel), Some(&2));
    }

    #[test]
    fn test_unknown_course_is_skipped() {
        let record = [completed("CS5010", Grade::A, 4), completed("XFER900", Grade::C, 4)];
        let snapshot = recompute(&record, &catalog(), &ProgramRequirements::default()).unwrap();
        assert_eq!(snapshot.total_credits, 4);
        assert_eq!(snapshot.gpa, Some(4.0));
        assert_eq!(snapshot.unresolved_courses, vec!["XFER900".to_string()]);
        assert_eq!(snapshot.completion_status, CompletionStatus::InProgress);
    }

    #[test]
    fn test_dropped_entries_ignored() {
        let mut dropped = completed("DS5110", Grade::A, 4);
        dropped.status = RecordStatus::Dropped;
        dropped.grade = None;
        let record = [completed("CS5010", Grade::B, 4), dropped];
        let snapshot = recompute(&record, &catalog(), &ProgramRequirements::default()).unwrap();
        assert_eq!(snapshot.total_credits, 4);
        assert_eq!(snapshot.credits_by_category[&Category::SubjectDs], 0);
        assert_eq!(snapshot.gpa, Some(3.0));
    }

    #[test]
    fn test_completion() {
        let requirements = ProgramRequirements {
            name: "Tiny".to_string(),
            total_min_credits: 8,
            limits: BTreeMap::from([(Category::Core, CategoryLimit::at_least(4))]),
        };
        let record = [completed("CS5010", Grade::B, 4), completed("DS5110", Grade::A, 4)];
        let snapshot = recompute(&record, &catalog(), &requirements).unwrap();
        assert_eq!(snapshot.completion_status, CompletionStatus::Completed);
        assert!(snapshot.is_complete());
        assert!(snapshot.unmet_minimums.is_empty());
    }
}
