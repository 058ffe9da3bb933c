//! Certificate model

use super::course::CourseId;
use crate::core::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named credential earned by completing a fixed set of courses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Unique certificate name
    pub name: String,

    /// Required courses, in catalog order (no duplicates)
    pub required: Vec<CourseId>,
}

impl Certificate {
    /// Create a certificate
    ///
    /// # Errors
    /// Returns `Validation` if the name is blank, the course list is empty,
    /// or a course appears twice
    pub fn new(name: &str, required: Vec<CourseId>) -> EngineResult<Self> {
        let certificate = Self {
            name: name.trim().to_string(),
            required,
        };
        certificate.validate()?;
        Ok(certificate)
    }

    /// Check certificate invariants (used for certificates loaded from storage)
    ///
    /// # Errors
    /// Returns `Validation` describing the first violated invariant
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::Validation(
                "certificate name is empty".to_string(),
            ));
        }
        if self.required.is_empty() {
            return Err(EngineError::Validation(format!(
                "certificate '{}' requires no courses",
                self.name
            )));
        }
        let mut seen = BTreeSet::new();
        for course in &self.required {
            if !seen.insert(course.as_str()) {
                return Err(EngineError::Validation(format!(
                    "certificate '{}' lists '{course}' more than once",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Whether `course_id` is one of the required courses
    #[must_use]
    pub fn requires(&self, course_id: &str) -> bool {
        self.required.iter().any(|c| c == course_id)
    }
}
