//! Course catalog: the published offerings a registration is checked against

pub mod csv_import;

use crate::core::error::{EngineError, EngineResult, EntityKind};
use crate::core::models::{Course, Term};
use std::collections::{BTreeMap, BTreeSet};

pub use csv_import::{import_catalog_csv, import_catalog_str, load_catalog_csv, ImportReport};

/// Lookup interface the engine consumes to resolve course ids
pub trait CourseCatalog {
    /// Resolve a course id to its current catalog record
    ///
    /// # Errors
    /// Returns `NotFound` if the id is not in the catalog
    fn course(&self, id: &str) -> EngineResult<Course>;

    /// Titles shared by more than one distinct course id, sorted
    fn duplicate_titles(&self) -> Vec<String>;
}

/// Upsert key of a catalog offering: (reference number, term)
pub type OfferingKey = (String, Term);

/// Result of upserting one offering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new offering was created
    Inserted,
    /// An existing offering with the same key was replaced
    Updated,
}

/// In-memory course catalog, keyed by (reference number, semester, year)
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Catalog name (e.g., "Graduate Catalog 2024")
    pub name: String,

    /// Institution publishing the catalog
    pub institution: String,

    offerings: BTreeMap<OfferingKey, Course>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new(name: &str, institution: &str) -> Self {
        Self {
            name: name.to_string(),
            institution: institution.to_string(),
            offerings: BTreeMap::new(),
        }
    }

    /// Insert or replace an offering by its (reference number, term) key
    pub fn upsert(&mut self, course: Course) -> UpsertOutcome {
        let key = (course.reference_number.clone(), course.term);
        if self.offerings.insert(key, course).is_some() {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        }
    }

    /// Get the most recent offering of a course id
    #[must_use]
    pub fn get_course(&self, id: &str) -> Option<&Course> {
        self.offerings
            .values()
            .filter(|course| course.id == id)
            .max_by_key(|course| course.term)
    }

    /// Latest offering of every course id, ordered by id
    #[must_use]
    pub fn courses(&self) -> Vec<&Course> {
        let mut latest: BTreeMap<&str, &Course> = BTreeMap::new();
        for course in self.offerings.values() {
            latest
                .entry(course.id.as_str())
                .and_modify(|current| {
                    if course.term > current.term {
                        *current = course;
                    }
                })
                .or_insert(course);
        }
        latest.into_values().collect()
    }

    /// Number of offerings (all terms)
    #[must_use]
    pub fn offering_count(&self) -> usize {
        self.offerings.len()
    }

    /// Find courses whose title matches exactly
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Vec<&Course> {
        self.courses()
            .into_iter()
            .filter(|course| course.title == title)
            .collect()
    }

    /// Validate that every prerequisite reference resolves
    ///
    /// # Arguments
    /// * `by_title` - Resolve references as titles instead of course ids
    ///
    /// # Errors
    /// Returns `Err` with one message per dangling reference
    pub fn validate_prerequisites(&self, by_title: bool) -> Result<(), Vec<String>> {
        let mut invalid = Vec::new();

        for course in self.courses() {
            for prereq in &course.prerequisites {
                let resolves = if by_title {
                    !self.find_by_title(prereq).is_empty()
                } else {
                    self.get_course(prereq).is_some()
                };
                if !resolves {
                    invalid.push(format!(
                        "Course '{}': prerequisite '{}' not found",
                        course.id, prereq
                    ));
                }
            }
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(invalid)
        }
    }

    /// Require globally unique titles (needed for title-based matching)
    ///
    /// # Errors
    /// Returns `Validation` listing every duplicated title
    pub fn ensure_unique_titles(&self) -> EngineResult<()> {
        let duplicates = self.duplicate_titles();
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(format!(
                "course titles are not unique: {}",
                duplicates.join(", ")
            )))
        }
    }
}

impl CourseCatalog for Catalog {
    fn course(&self, id: &str) -> EngineResult<Course> {
        self.get_course(id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(EntityKind::Course, id))
    }

    fn duplicate_titles(&self) -> Vec<String> {
        let mut ids_by_title: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for course in self.offerings.values() {
            ids_by_title
                .entry(course.title.as_str())
                .or_default()
                .insert(course.id.as_str());
        }
        ids_by_title
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(title, _)| title.to_string())
            .collect()
    }
}
