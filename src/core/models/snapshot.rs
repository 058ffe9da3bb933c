//! Program snapshot model

use super::course::{Category, CourseId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Overall completion of the program of study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    /// No completed coursework
    NotStarted,
    /// Some coursework completed, requirements not yet met
    InProgress,
    /// Every program requirement is met
    Completed,
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        };
        f.write_str(label)
    }
}

/// Aggregate statistics derived from a student's completed coursework.
///
/// Never stored; recomputed from the full record on every call. Every map is
/// ordered so equal records serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    /// Credits earned across all completed courses
    pub total_credits: u32,

    /// Credits counting toward the program minimum (category caps applied)
    pub counted_credits: u32,

    /// Earned credits per primary category bucket; sums to `total_credits`
    pub credits_by_category: BTreeMap<Category, u32>,

    /// Credit-weighted GPA over letter-graded entries
    pub gpa: Option<f64>,

    /// Completion status against the program thresholds
    pub completion_status: CompletionStatus,

    /// Credits still needed to reach the program minimum
    pub remaining_credits: u32,

    /// Categories below their minimum, with the credits still missing
    pub unmet_minimums: BTreeMap<Category, u32>,

    /// Categories above their cap, with the excess credits (display only)
    pub over_cap: BTreeMap<Category, u32>,

    /// Completed courses that no longer resolve in the catalog; not counted
    #[serde(default)]
    pub unresolved_courses: Vec<CourseId>,
}

impl ProgramSnapshot {
    /// Whether every program requirement is met
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion_status == CompletionStatus::Completed
    }
}

impl fmt::Display for ProgramSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status: {}", self.completion_status)?;
        writeln!(
            f,
            "Credits: {} earned, {} counted, {} remaining",
            self.total_credits, self.counted_credits, self.remaining_credits
        )?;
        match self.gpa {
            Some(gpa) => writeln!(f, "GPA: {gpa:.4}")?,
            None => writeln!(f, "GPA: n/a")?,
        }
        for (category, credits) in &self.credits_by_category {
            write!(f, "  {category:<14} {credits:>3}")?;
            if let Some(missing) = self.unmet_minimums.get(category) {
                write!(f, "  ({missing} short of minimum)")?;
            }
            if let Some(excess) = self.over_cap.get(category) {
                write!(f, "  ({excess} over cap)")?;
            }
            writeln!(f)?;
        }
        if !self.unresolved_courses.is_empty() {
            writeln!(f, "Not in catalog: {}", self.unresolved_courses.join(", "))?;
        }
        Ok(())
    }
}
