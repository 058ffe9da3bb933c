//! Data models for `NuProgress`

pub mod certificate;
pub mod course;
pub mod record;
pub mod snapshot;
pub mod verdict;

pub use certificate::Certificate;
pub use course::{
    parse_course_id, Category, Course, CourseId, CourseLevel, Semester, SubjectCode, Term,
};
pub use record::{AcademicRecordEntry, Grade, RecordKey, RecordStatus, StudentId};
pub use snapshot::{CompletionStatus, ProgramSnapshot};
pub use verdict::{CertificateNotice, EligibilityVerdict, EvaluationState, RejectionReason};
