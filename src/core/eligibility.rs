//! Eligibility orchestration
//!
//! Composes the prerequisite, certificate and program evaluators into a single
//! verdict per registration attempt. Each attempt walks
//! `Start → PrereqCheck → {Allowed | PrereqConfirmRequired}`; an allowed
//! attempt continues through `CertificateNotice → Done`. A confirmation-required
//! verdict is terminal: the caller restarts evaluation with
//! [`EligibilityEngine::confirm_prerequisites`] once the student confirms.

use crate::core::catalog::CourseCatalog;
use crate::core::certificates;
use crate::core::error::{require_id, EngineError, EngineResult};
use crate::core::models::{
    AcademicRecordEntry, CertificateNotice, Course, EligibilityVerdict, EvaluationState,
    ProgramSnapshot, RejectionReason,
};
use crate::core::prerequisites::{self, CompletedCourses, MatchMode};
use crate::core::program::{self, ProgramRequirements};
use crate::core::store::{CertificateCatalog, RecordStore};
use crate::{debug, warn};

/// Builds a verdict by value; every step returns a new builder
#[derive(Debug, Clone)]
struct VerdictBuilder {
    verdict: EligibilityVerdict,
}

impl VerdictBuilder {
    fn start(student_id: &str, course_id: &str) -> Self {
        Self {
            verdict: EligibilityVerdict {
                student_id: student_id.to_string(),
                course_id: course_id.to_string(),
                allowed: false,
                unmet_prerequisites: Vec::new(),
                certificate_impact: Vec::new(),
                rejection_reason: None,
                message: None,
                trace: vec![EvaluationState::Start],
            },
        }
    }

    fn enter(mut self, state: EvaluationState) -> Self {
        self.verdict.trace.push(state);
        self
    }

    fn allow(mut self) -> Self {
        self.verdict.allowed = true;
        self
    }

    fn unmet(mut self, titles: Vec<String>) -> Self {
        self.verdict.unmet_prerequisites = titles;
        self
    }

    fn notices(mut self, notices: Vec<CertificateNotice>) -> Self {
        self.verdict.certificate_impact = notices;
        self
    }

    fn reject(mut self, reason: RejectionReason, message: String) -> Self {
        self.verdict.allowed = false;
        self.verdict.rejection_reason = Some(reason);
        self.verdict.message = Some(message);
        self
    }

    fn build(self) -> EligibilityVerdict {
        self.verdict
    }
}

/// The eligibility-and-aggregation engine.
///
/// Collaborators are injected; the engine holds no mutable state and reads a
/// fresh snapshot of the student's record on every call.
pub struct EligibilityEngine<'a> {
    pub(crate) catalog: &'a dyn CourseCatalog,
    pub(crate) records: &'a dyn RecordStore,
    pub(crate) certificates: &'a dyn CertificateCatalog,
    requirements: ProgramRequirements,
    match_mode: MatchMode,
}

impl<'a> EligibilityEngine<'a> {
    /// Create an engine with the default program thresholds and id matching
    #[must_use]
    pub fn new(
        catalog: &'a dyn CourseCatalog,
        records: &'a dyn RecordStore,
        certificates: &'a dyn CertificateCatalog,
    ) -> Self {
        Self {
            catalog,
            records,
            certificates,
            requirements: ProgramRequirements::default(),
            match_mode: MatchMode::Id,
        }
    }

    /// Replace the program threshold table
    #[must_use]
    pub fn with_requirements(mut self, requirements: ProgramRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Select how prerequisites are matched
    ///
    /// # Errors
    /// Returns `Validation` when title matching is requested but catalog
    /// titles are not unique
    pub fn with_match_mode(mut self, mode: MatchMode) -> EngineResult<Self> {
        if mode == MatchMode::Title {
            let duplicates = self.catalog.duplicate_titles();
            if !duplicates.is_empty() {
                return Err(EngineError::Validation(format!(
                    "title matching requires unique course titles; duplicated: {}",
                    duplicates.join(", ")
                )));
            }
        }
        self.match_mode = mode;
        Ok(self)
    }

    /// Program thresholds in use
    #[must_use]
    pub const fn requirements(&self) -> &ProgramRequirements {
        &self.requirements
    }

    /// Prerequisite match mode in use
    #[must_use]
    pub const fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Decide whether a student may register for a course
    ///
    /// # Errors
    /// Returns `Validation` for blank ids and `NotFound` if the student or
    /// course does not resolve. Non-eligibility is reported on the verdict.
    pub fn check_prerequisites(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> EngineResult<EligibilityVerdict> {
        self.evaluate(student_id, course_id, &[])
    }

    /// Re-run the check with prerequisites the student confirmed as completed
    /// elsewhere. Items may be given as course ids or as the titles listed in
    /// a previous verdict.
    ///
    /// # Errors
    /// As [`check_prerequisites`](Self::check_prerequisites); additionally
    /// `Validation` if a confirmed item is not a prerequisite of the course
    pub fn confirm_prerequisites(
        &self,
        student_id: &str,
        course_id: &str,
        confirmed: &[String],
    ) -> EngineResult<EligibilityVerdict> {
        self.evaluate(student_id, course_id, confirmed)
    }

    /// Certificate progress a course would bring a student
    ///
    /// # Errors
    /// Returns `Validation` for blank ids and `NotFound` if the student or
    /// course does not resolve
    pub fn check_certificate_impact(
        &self,
        course_id: &str,
        student_id: &str,
    ) -> EngineResult<Vec<CertificateNotice>> {
        require_id("course id", course_id)?;
        require_id("student id", student_id)?;
        let course = self.catalog.course(course_id)?;
        let record = self.records.student_record(student_id)?;
        let completed = self.completed_courses(&record);
        let catalog = self.certificates.certificates()?;
        Ok(certificates::evaluate(&course.id, completed.ids(), &catalog))
    }

    /// Recompute a student's program snapshot from their full record
    ///
    /// # Errors
    /// Returns `Validation` for a blank id, `NotFound` for an unknown student
    pub fn recompute_program_snapshot(&self, student_id: &str) -> EngineResult<ProgramSnapshot> {
        require_id("student id", student_id)?;
        let record = self.records.student_record(student_id)?;
        program::recompute(&record, self.catalog, &self.requirements)
    }

    fn evaluate(
        &self,
        student_id: &str,
        course_id: &str,
        confirmed: &[String],
    ) -> EngineResult<EligibilityVerdict> {
        require_id("student id", student_id)?;
        require_id("course id", course_id)?;
        debug!("Evaluating {student_id} for {course_id}");

        let course = self.catalog.course(course_id)?;
        let record = self.records.student_record(student_id)?;
        let external = self.resolve_confirmations(&course, confirmed)?;

        let builder = VerdictBuilder::start(student_id, &course.id);

        let snapshot = program::recompute(&record, self.catalog, &self.requirements)?;
        if snapshot.is_complete() {
            let message = format!(
                "Program requirements for {} are already met ({} of {} credits); no further registration is needed.",
                self.requirements.name, snapshot.counted_credits, self.requirements.total_min_credits
            );
            return Ok(builder
                .reject(RejectionReason::AlreadySatisfied, message)
                .enter(EvaluationState::Done)
                .build());
        }

        let completed = self.completed_courses(&record).with_external(external);
        let builder = builder.enter(EvaluationState::PrereqCheck);
        let check = prerequisites::evaluate(&course, &completed, self.match_mode);
        let notices = certificates::evaluate(
            &course.id,
            completed.ids(),
            &self.certificates.certificates()?,
        );

        if check.is_eligible() {
            return Ok(builder
                .enter(EvaluationState::Allowed)
                .allow()
                .enter(EvaluationState::CertificateNotice)
                .notices(notices)
                .enter(EvaluationState::Done)
                .build());
        }

        let titles: Vec<String> = check
            .unmet
            .iter()
            .map(|reference| self.display_title(reference))
            .collect();
        let message = format!(
            "{} lists prerequisites not yet completed: {}. Confirm them to continue.",
            course.code(),
            titles.join(", ")
        );
        let completing: Vec<CertificateNotice> =
            notices.into_iter().filter(|n| n.will_complete).collect();

        Ok(builder
            .enter(EvaluationState::PrereqConfirmRequired)
            .unmet(titles)
            .notices(completing)
            .reject(RejectionReason::PrerequisitesUnmet, message)
            .build())
    }

    /// Courses the student has passed, with titles resolved from the catalog
    fn completed_courses(&self, record: &[AcademicRecordEntry]) -> CompletedCourses {
        let mut completed = CompletedCourses::new();
        for entry in record.iter().filter(|e| e.is_passed()) {
            match self.catalog.course(&entry.course_id) {
                Ok(course) => completed.insert(&course.id, &course.title),
                Err(_) => {
                    warn!(
                        "Completed course '{}' of '{}' is not in the catalog; matched by id only",
                        entry.course_id, entry.student_id
                    );
                    completed.insert(&entry.course_id, "");
                }
            }
        }
        completed
    }

    /// Map confirmed items (ids or titles) onto the course's prerequisite references
    fn resolve_confirmations(&self, course: &Course, confirmed: &[String]) -> EngineResult<Vec<String>> {
        confirmed
            .iter()
            .map(|item| {
                let item = item.trim();
                course
                    .prerequisites
                    .iter()
                    .find(|reference| {
                        reference.as_str() == item || self.display_title(reference) == item
                    })
                    .cloned()
                    .ok_or_else(|| {
                        EngineError::Validation(format!(
                            "'{item}' is not a prerequisite of {}",
                            course.id
                        ))
                    })
            })
            .collect()
    }

    /// Title shown for a prerequisite reference
    fn display_title(&self, reference: &str) -> String {
        match self.match_mode {
            MatchMode::Title => reference.to_string(),
            MatchMode::Id => match self.catalog.course(reference) {
                Ok(course) => course.title,
                Err(_) => {
                    warn!("Prerequisite '{reference}' does not resolve in the catalog");
                    reference.to_string()
                }
            },
        }
    }
}
