//! Course model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Stable course identifier (e.g., "CS5010")
pub type CourseId = String;

/// Subject codes offered by the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubjectCode {
    /// Computer Science
    Cs,
    /// Data Science
    Ds,
}

impl FromStr for SubjectCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CS" => Ok(Self::Cs),
            "DS" => Ok(Self::Ds),
            other => Err(format!("Unknown subject code '{other}'")),
        }
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cs => write!(f, "CS"),
            Self::Ds => write!(f, "DS"),
        }
    }
}

/// Credit-accounting category a course may be tagged with.
///
/// Variants are declared in bucket precedence order: when a course carries
/// several tags, its credits land in the smallest one. Subject-specific
/// buckets come first, then core, lower-level and prerequisite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Computer Science subject bucket
    SubjectCs,
    /// Data Science subject bucket
    SubjectDs,
    /// Program core
    Core,
    /// Lower-level (undergraduate) coursework counted toward the program
    LowerLevel,
    /// Bridge/prerequisite coursework
    Prerequisite,
}

impl Category {
    /// All categories in precedence order
    pub const ALL: [Self; 5] = [
        Self::SubjectCs,
        Self::SubjectDs,
        Self::Core,
        Self::LowerLevel,
        Self::Prerequisite,
    ];

    /// Short label used in CSV files and CLI output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubjectCs => "subject-cs",
            Self::SubjectDs => "subject-ds",
            Self::Core => "core",
            Self::LowerLevel => "lower-level",
            Self::Prerequisite => "prerequisite",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("Unknown category '{}'", s.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Course level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    /// Graduate course
    Graduate,
    /// Undergraduate course
    Undergraduate,
}

impl FromStr for CourseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graduate" | "grad" | "g" => Ok(Self::Graduate),
            "undergraduate" | "undergrad" | "u" => Ok(Self::Undergraduate),
            other => Err(format!("Unknown course level '{other}'")),
        }
    }
}

/// Academic semester
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    /// Spring term
    Spring,
    /// Summer term
    Summer,
    /// Fall term
    Fall,
}

impl FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" => Ok(Self::Fall),
            other => Err(format!("Unknown semester '{other}'")),
        }
    }
}

/// A semester in a given year. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Calendar year
    pub year: u16,
    /// Semester within the year
    pub semester: Semester,
}

impl Term {
    /// Create a new term
    #[must_use]
    pub const fn new(semester: Semester, year: u16) -> Self {
        Self { year, semester }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let semester = match self.semester {
            Semester::Spring => "Spring",
            Semester::Summer => "Summer",
            Semester::Fall => "Fall",
        };
        write!(f, "{semester} {}", self.year)
    }
}

impl FromStr for Term {
    type Err = String;

    /// Parses "Fall 2024", "fall-2024" or "2024 fall"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|p| !p.is_empty())
            .collect();
        let [first, second] = parts.as_slice() else {
            return Err(format!("Invalid term '{s}', expected e.g. 'Fall 2024'"));
        };
        let (semester, year) = if first.chars().all(|c| c.is_ascii_digit()) {
            (second, first)
        } else {
            (first, second)
        };
        let year = year
            .parse::<u16>()
            .map_err(|_| format!("Invalid year in term '{s}'"))?;
        Ok(Self::new(semester.parse()?, year))
    }
}

/// Represents a published course offering in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Stable identifier (e.g., "CS5010")
    pub id: CourseId,

    /// Registration reference number of this offering
    pub reference_number: String,

    /// Subject code
    pub subject: SubjectCode,

    /// Course number (e.g., "5010")
    pub number: String,

    /// Course title (e.g., "Programming Design Paradigm")
    pub title: String,

    /// Credit value (positive)
    pub credits: u32,

    /// Category tags (never empty for a published course)
    pub categories: BTreeSet<Category>,

    /// Certificates this course is tagged for
    pub certifications: BTreeSet<String>,

    /// Prerequisites, in catalog order. Course ids, or titles when the
    /// catalog is evaluated in title-matching mode.
    pub prerequisites: Vec<String>,

    /// Graduate or undergraduate
    pub level: CourseLevel,

    /// Term this offering was published for
    pub term: Term,
}

impl Course {
    /// Create a course with a single category and no prerequisites
    ///
    /// # Arguments
    /// * `id` - Stable course id
    /// * `title` - Course title
    /// * `credits` - Credit value
    /// * `category` - Initial category tag
    #[must_use]
    pub fn new(id: &str, title: &str, credits: u32, category: Category) -> Self {
        let (subject, number) = split_course_id(id);
        Self {
            id: id.to_string(),
            reference_number: id.to_string(),
            subject,
            number,
            title: title.to_string(),
            credits,
            categories: BTreeSet::from([category]),
            certifications: BTreeSet::new(),
            prerequisites: Vec::new(),
            level: CourseLevel::Graduate,
            term: Term::new(Semester::Fall, 2024),
        }
    }

    /// Add a prerequisite reference (ignores duplicates)
    pub fn add_prerequisite(&mut self, prereq: &str) {
        if !self.prerequisites.iter().any(|p| p == prereq) {
            self.prerequisites.push(prereq.to_string());
        }
    }

    /// Add a category tag
    pub fn add_category(&mut self, category: Category) {
        self.categories.insert(category);
    }

    /// Builder-style prerequisite addition
    #[must_use]
    pub fn with_prerequisite(mut self, prereq: &str) -> Self {
        self.add_prerequisite(prereq);
        self
    }

    /// Builder-style category addition
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.add_category(category);
        self
    }

    /// The bucket this course's credits are accounted in.
    ///
    /// # Returns
    /// The highest-precedence category tag, or `None` for an untagged course
    #[must_use]
    pub fn primary_category(&self) -> Option<Category> {
        self.categories.iter().next().copied()
    }

    /// Course code for display (e.g., "CS 5010")
    #[must_use]
    pub fn code(&self) -> String {
        format!("{} {}", self.subject, self.number)
    }
}

/// Split a course id such as "CS5010" into its subject and number
///
/// # Errors
/// Returns an error when the prefix is not a known subject or the number is missing
pub fn parse_course_id(id: &str) -> Result<(SubjectCode, String), String> {
    let split_at = id.find(|c: char| c.is_ascii_digit()).unwrap_or(id.len());
    let (prefix, number) = id.split_at(split_at);
    let subject = prefix
        .parse()
        .map_err(|e| format!("course id '{id}': {e}"))?;
    let number = number.trim();
    if number.is_empty() {
        return Err(format!("course id '{id}' has no course number"));
    }
    Ok((subject, number.to_string()))
}

/// Subject and number for the in-memory builder. Ids outside the known
/// subjects keep the whole id as their number under CS; catalog imports go
/// through [`parse_course_id`] and reject them instead.
fn split_course_id(id: &str) -> (SubjectCode, String) {
    parse_course_id(id).unwrap_or_else(|_| (SubjectCode::Cs, id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_parse() {
        let fall = Term::new(Semester::Fall, 2024);
        assert_eq!("Fall 2024".parse::<Term>(), Ok(fall));
        assert_eq!("fall-2024".parse::<Term>(), Ok(fall));
        assert_eq!("2024 FALL".parse::<Term>(), Ok(fall));
        assert!("Fall".parse::<Term>().is_err());
        assert!("Autumn 2024".parse::<Term>().is_err());
        assert!(Term::new(Semester::Spring, 2025) > fall);
    }

    #[test]
    fn test_parse_course_id() {
        assert_eq!(
            parse_course_id("DS5110"),
            Ok((SubjectCode::Ds, "5110".to_string()))
        );
        assert!(parse_course_id("MATH5000").unwrap_err().contains("MATH"));
        assert!(parse_course_id("CS").is_err());
    }

    #[test]
    fn test_course_creation() {
        let course = Course::new("CS5010", "Programming Design Paradigm", 4, Category::Core);

        assert_eq!(course.id, "CS5010");
        assert_eq!(course.subject, SubjectCode::Cs);
        assert_eq!(course.number, "5010");
        assert_eq!(course.credits, 4);
        assert!(course.prerequisites.is_empty());
        assert_eq!(course.code(), "CS 5010");
    }

    #[test]
    fn test_add_prerequisite_deduplicates() {
        let mut course = Course::new("CS5800", "Algorithms", 4, Category::Core);
        course.add_prerequisite("CS5008");
        course.add_prerequisite("CS5008");
        assert_eq!(course.prerequisites, vec!["CS5008".to_string()]);
    }

    #[test]
    fn test_primary_category_follows_precedence() {
        let course = Course::new("CS5200", "Database Management", 4, Category::Prerequisite)
            .with_category(Category::Core)
            .with_category(Category::SubjectDs);
        assert_eq!(course.primary_category(), Some(Category::SubjectDs));

        let lower = Course::new("CS2500", "Fundamentals", 4, Category::Prerequisite)
            .with_category(Category::LowerLevel);
        assert_eq!(lower.primary_category(), Some(Category::LowerLevel));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("core".parse::<Category>(), Ok(Category::Core));
        assert_eq!("Lower Level".parse::<Category>(), Ok(Category::LowerLevel));
        assert_eq!("subject_cs".parse::<Category>(), Ok(Category::SubjectCs));
        assert!("elective".parse::<Category>().is_err());
    }

    #[test]
    fn test_term_ordering() {
        let fall = Term::new(Semester::Fall, 2023);
        let spring = Term::new(Semester::Spring, 2024);
        let summer = Term::new(Semester::Summer, 2024);
        assert!(fall < spring);
        assert!(spring < summer);
        assert_eq!(spring.to_string(), "Spring 2024");
    }

    #[test]
    fn test_subject_from_id() {
        let course = Course::new("DS5110", "Data Management", 4, Category::SubjectDs);
        assert_eq!(course.subject, SubjectCode::Ds);
        assert_eq!(course.number, "5110");
    }
}
