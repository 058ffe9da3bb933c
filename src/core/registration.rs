//! Registration lifecycle
//!
//! Writes to a student's record go through here: a course is registered as a
//! planned entry only when the engine allows it, a posted grade completes the
//! entry, and a drop removes it. Every mutation returns data recomputed from
//! the record afterwards.

use crate::core::eligibility::EligibilityEngine;
use crate::core::error::{require_id, EngineError, EngineResult, EntityKind};
use crate::core::models::{
    AcademicRecordEntry, EligibilityVerdict, Grade, ProgramSnapshot, RecordStatus, Term,
};
use crate::{info, warn};

/// Result of a registration attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    /// The planned entry was written
    Registered {
        /// Entry added to the record
        entry: AcademicRecordEntry,
        /// Verdict that allowed it
        verdict: EligibilityVerdict,
    },
    /// The engine did not allow the registration; nothing was written
    Rejected(EligibilityVerdict),
}

impl RegistrationOutcome {
    /// Verdict behind the outcome
    #[must_use]
    pub const fn verdict(&self) -> &EligibilityVerdict {
        match self {
            Self::Registered { verdict, .. } | Self::Rejected(verdict) => verdict,
        }
    }

    /// Whether an entry was written
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

impl EligibilityEngine<'_> {
    /// Register a student for a course in a term
    ///
    /// `confirmed` lists prerequisites the student confirmed as completed
    /// elsewhere; pass an empty slice for a first attempt.
    ///
    /// # Errors
    /// - `NotFound` if the student or course does not resolve
    /// - `Conflict` if the student already has an entry for the course in that term
    /// - `PendingRegistration` if another registration is still planned
    pub fn register(
        &self,
        student_id: &str,
        course_id: &str,
        term: Term,
        confirmed: &[String],
    ) -> EngineResult<RegistrationOutcome> {
        require_id("student id", student_id)?;
        require_id("course id", course_id)?;
        let course = self.catalog.course(course_id)?;
        let record = self.records.student_record(student_id)?;

        if record.iter().any(|e| e.course_id == course.id && e.term == term) {
            warn!("{student_id} already has {course_id} in {term}");
            return Err(EngineError::Conflict(format!(
                "'{student_id}' is already registered for '{}' in {term}",
                course.id
            )));
        }
        if let Some(pending) = record.iter().find(|e| e.status == RecordStatus::Planned) {
            warn!("{student_id} has a pending registration for {}", pending.course_id);
            return Err(EngineError::PendingRegistration {
                student_id: student_id.to_string(),
                course_id: pending.course_id.clone(),
            });
        }

        let verdict = self.confirm_prerequisites(student_id, &course.id, confirmed)?;
        if !verdict.allowed {
            return Ok(RegistrationOutcome::Rejected(verdict));
        }

        let entry = AcademicRecordEntry::planned(student_id, &course.id, term, course.credits);
        self.records.insert_entry(entry.clone())?;
        info!("Registered {student_id} for {} in {term}", course.id);
        Ok(RegistrationOutcome::Registered { entry, verdict })
    }

    /// Post a final grade for a planned course, completing it
    ///
    /// # Errors
    /// Returns `NotFound` if the student has no planned entry for the course
    pub fn post_grade(
        &self,
        student_id: &str,
        course_id: &str,
        grade: Grade,
    ) -> EngineResult<ProgramSnapshot> {
        require_id("student id", student_id)?;
        require_id("course id", course_id)?;
        let record = self.records.student_record(student_id)?;
        let mut entry = record
            .into_iter()
            .find(|e| e.course_id == course_id && e.status == RecordStatus::Planned)
            .ok_or_else(|| {
                EngineError::not_found(EntityKind::RecordEntry, &format!("{student_id}/{course_id}"))
            })?;

        entry.status = RecordStatus::Completed;
        entry.grade = Some(grade);
        self.records.upsert_entry(entry)?;
        info!("Posted {grade} for {student_id} in {course_id}");
        self.recompute_program_snapshot(student_id)
    }

    /// Drop a course from a student's record
    ///
    /// A pending registration is removed first; otherwise the most recent
    /// attempt.
    ///
    /// # Errors
    /// Returns `NotFound` if the student or entry does not exist
    pub fn drop_course(&self, student_id: &str, course_id: &str) -> EngineResult<ProgramSnapshot> {
        require_id("student id", student_id)?;
        require_id("course id", course_id)?;
        let removed = self.records.delete_entry(student_id, course_id)?;
        info!("Dropped {course_id} ({}) for {student_id}", removed.term);
        self.recompute_program_snapshot(student_id)
    }
}
