//! Error taxonomy for the eligibility engine.
//!
//! Business non-eligibility is never an error; it is carried on the verdict.
//! Errors only describe references that do not resolve, malformed input, and
//! write collisions reported by the record store.

use std::fmt;

/// What kind of entity a `NotFound` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A student id
    Student,
    /// A course id
    Course,
    /// A record entry
    RecordEntry,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Student => "student",
            Self::Course => "course",
            Self::RecordEntry => "record entry",
        };
        f.write_str(label)
    }
}

/// Coarse error classification surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown student, course or record entry
    NotFound,
    /// Malformed or missing input
    ValidationFailure,
    /// Duplicate registration or write collision
    Conflict,
}

/// Errors raised by the engine and its collaborators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A referenced id does not resolve.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Kind of entity looked up
        kind: EntityKind,
        /// The id that failed to resolve
        id: String,
    },

    /// Input is malformed or a required field is missing.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A write collided with an existing entry on the uniqueness key.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The student already holds a pending registration.
    #[error("student '{student_id}' already has a pending registration for '{course_id}'")]
    PendingRegistration {
        /// Student attempting a second registration
        student_id: String,
        /// Course of the registration still pending
        course_id: String,
    },

    /// The backing store could not be accessed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Shorthand for a `NotFound` error
    #[must_use]
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Classify this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::Conflict(_) | Self::PendingRegistration { .. } | Self::Storage(_) => {
                ErrorKind::Conflict
            }
        }
    }

    /// Whether the caller may retry the operation after re-reading the record
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Conflict)
    }
}

/// Engine result alias
pub type EngineResult<T> = Result<T, EngineError>;

/// Reject blank identifiers before they reach a collaborator
///
/// # Errors
/// Returns `Validation` when `value` is empty or whitespace
pub fn require_id(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        Err(EngineError::Validation(format!("missing {field}")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            EngineError::not_found(EntityKind::Course, "CS1").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            EngineError::Validation("x".into()).kind(),
            ErrorKind::ValidationFailure
        );
        let pending = EngineError::PendingRegistration {
            student_id: "s1".into(),
            course_id: "CS5010".into(),
        };
        assert_eq!(pending.kind(), ErrorKind::Conflict);
        assert!(pending.is_retryable());
        assert!(EngineError::Conflict("dup".into()).is_retryable());
        assert!(!EngineError::Validation("x".into()).is_retryable());
        assert!(!EngineError::not_found(EntityKind::Student, "s1").is_retryable());
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::not_found(EntityKind::Student, "s42");
        assert_eq!(err.to_string(), "student 's42' not found");
    }

    #[test]
    fn test_require_id() {
        assert!(require_id("student id", "s1").is_ok());
        assert_eq!(
            require_id("student id", "  "),
            Err(EngineError::Validation("missing student id".into()))
        );
    }
}
