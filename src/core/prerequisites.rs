//! Prerequisite evaluation
//!
//! Pure function over a target course and the set of courses a student has
//! completed (or had confirmed as completed elsewhere).

use crate::core::models::{Course, CourseId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How prerequisite references are compared against a student's history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Compare stable course ids
    #[default]
    Id,
    /// Compare course titles. Only sound when titles are unique across the
    /// catalog; the engine refuses this mode otherwise.
    Title,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "identifier" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            other => Err(format!("Unknown prerequisite match mode '{other}'")),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Title => f.write_str("title"),
        }
    }
}

/// Courses a student counts as done for prerequisite purposes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedCourses {
    ids: BTreeSet<CourseId>,
    titles: BTreeSet<String>,
    external: BTreeSet<String>,
}

impl CompletedCourses {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from course ids alone (titles unknown)
    #[must_use]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CourseId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Record a completed course
    pub fn insert(&mut self, id: &str, title: &str) {
        self.ids.insert(id.to_string());
        self.titles.insert(title.to_string());
    }

    /// Mark a prerequisite reference as completed externally (transfer credit,
    /// confirmed by the student)
    pub fn confirm_external(&mut self, reference: &str) {
        self.external.insert(reference.to_string());
    }

    /// Builder-style variant of [`confirm_external`](Self::confirm_external)
    #[must_use]
    pub fn with_external<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for reference in references {
            self.confirm_external(reference.as_ref());
        }
        self
    }

    /// Completed course ids
    #[must_use]
    pub const fn ids(&self) -> &BTreeSet<CourseId> {
        &self.ids
    }

    /// Whether a prerequisite reference is satisfied
    #[must_use]
    pub fn satisfies(&self, reference: &str, mode: MatchMode) -> bool {
        if self.external.contains(reference) {
            return true;
        }
        match mode {
            MatchMode::Id => self.ids.contains(reference),
            MatchMode::Title => self.titles.contains(reference),
        }
    }
}

/// Outcome of a prerequisite check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteCheck {
    /// Unsatisfied prerequisite references, in the course's listed order
    pub unmet: Vec<String>,
}

impl PrerequisiteCheck {
    /// Eligible iff nothing is unmet
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.unmet.is_empty()
    }
}

/// Compute the unmet prerequisites of `course`
#[must_use]
pub fn evaluate(course: &Course, completed: &CompletedCourses, mode: MatchMode) -> PrerequisiteCheck {
    let unmet = course
        .prerequisites
        .iter()
        .filter(|reference| !completed.satisfies(reference, mode))
        .cloned()
        .collect();
    PrerequisiteCheck { unmet }
}
