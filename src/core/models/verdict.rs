//! Eligibility verdict model

use super::course::CourseId;
use super::record::StudentId;
use serde::{Deserialize, Serialize};

/// Why a registration attempt was not allowed.
///
/// Declared in tie-break order: when several reasons apply, the first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Program requirements are already fully met
    AlreadySatisfied,
    /// One or more prerequisites are neither completed nor confirmed
    PrerequisitesUnmet,
}

/// States a single registration attempt moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationState {
    /// Attempt received
    Start,
    /// Prerequisites being evaluated
    PrereqCheck,
    /// Prerequisites satisfied
    Allowed,
    /// Prerequisites unmet; waiting on an external confirmation
    PrereqConfirmRequired,
    /// Certificate progress attached
    CertificateNotice,
    /// Evaluation finished
    Done,
}

/// Advisory certificate progress for one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateNotice {
    /// Certificate name; `None` when the course contributes to no certificate
    pub certificate_name: Option<String>,
    /// Human-readable progress message
    pub message: String,
    /// Completing the course earns the certificate
    pub will_complete: bool,
    /// The course counts toward this certificate
    pub eligible_now: bool,
}

/// Transient result of a registration eligibility check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    /// Student evaluated
    pub student_id: StudentId,
    /// Course evaluated
    pub course_id: CourseId,
    /// Registration may proceed
    pub allowed: bool,
    /// Titles of prerequisites still missing, in catalog order
    pub unmet_prerequisites: Vec<String>,
    /// Certificate progress attached to the verdict
    pub certificate_impact: Vec<CertificateNotice>,
    /// Reason the attempt was not allowed
    pub rejection_reason: Option<RejectionReason>,
    /// Explanatory message for non-error outcomes
    pub message: Option<String>,
    /// States visited while evaluating
    pub trace: Vec<EvaluationState>,
}

impl EligibilityVerdict {
    /// Whether the caller must collect a prerequisite confirmation
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        self.rejection_reason == Some(RejectionReason::PrerequisitesUnmet)
    }

    /// Final state reached by the evaluation
    #[must_use]
    pub fn final_state(&self) -> Option<EvaluationState> {
        self.trace.last().copied()
    }
}
