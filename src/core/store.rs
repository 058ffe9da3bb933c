//! Record store and certificate catalog collaborators
//!
//! The engine only reads point-in-time snapshots through these traits. Writes
//! go through the store, which owns the (student, course, semester, year)
//! uniqueness key and the one-planned-entry-per-student rule, and reports
//! collisions as retryable conflicts.

use crate::core::error::{EngineError, EngineResult, EntityKind};
use crate::core::models::{AcademicRecordEntry, Certificate, RecordStatus, StudentId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

/// Per-student academic record storage
pub trait RecordStore {
    /// All entries of a student's record, oldest term first
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown student
    fn student_record(&self, student_id: &str) -> EngineResult<Vec<AcademicRecordEntry>>;

    /// Create an entry; the (student, course, term) key must be new
    ///
    /// # Errors
    /// Returns `Conflict` if the key exists, `PendingRegistration` when a
    /// planned entry is written while another is pending, `Validation` for a
    /// malformed entry, `NotFound` for an unknown student
    fn insert_entry(&self, entry: AcademicRecordEntry) -> EngineResult<()>;

    /// Create or replace an entry by its (student, course, term) key
    ///
    /// # Errors
    /// Returns `Validation` for a malformed entry, `NotFound` for an unknown student
    fn upsert_entry(&self, entry: AcademicRecordEntry) -> EngineResult<()>;

    /// Remove a student's entry for a course and return it. A pending entry is
    /// removed first; otherwise the most recent attempt.
    ///
    /// # Errors
    /// Returns `NotFound` if the student or entry does not exist
    fn delete_entry(&self, student_id: &str, course_id: &str)
        -> EngineResult<AcademicRecordEntry>;
}

/// Certificate requirement catalog
pub trait CertificateCatalog {
    /// Every certificate, in definition order
    ///
    /// # Errors
    /// Returns `Storage` if the catalog cannot be read
    fn certificates(&self) -> EngineResult<Vec<Certificate>>;
}

/// Serialized form of one student's record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentDocument {
    /// Student id
    pub id: StudentId,
    /// Record entries (the owning student id may be omitted)
    #[serde(default)]
    pub records: Vec<RecordDocument>,
}

/// Serialized record entry, without the owning student id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDocument {
    /// Course taken
    pub course_id: String,
    /// Attempt status
    pub status: RecordStatus,
    /// Posted grade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<crate::core::models::Grade>,
    /// Term taken
    pub term: crate::core::models::Term,
    /// Credits captured at the time
    pub credits: u32,
}

/// Serialized form of the whole store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Students and their records
    #[serde(default)]
    pub students: Vec<StudentDocument>,
    /// Certificate catalog
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

/// In-memory document store implementing both collaborator traits
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<StudentId, Vec<AcademicRecordEntry>>>,
    certificates: RwLock<Vec<Certificate>>,
}

fn poisoned<T>(_: T) -> EngineError {
    EngineError::Storage("store lock poisoned".to_string())
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a student with an empty record (no-op if already known)
    ///
    /// # Errors
    /// Returns `Validation` for a blank id, `Storage` if the lock is poisoned
    pub fn enroll_student(&self, student_id: &str) -> EngineResult<()> {
        crate::core::error::require_id("student id", student_id)?;
        self.records
            .write()
            .map_err(poisoned)?
            .entry(student_id.to_string())
            .or_default();
        Ok(())
    }

    /// Add a certificate to the catalog
    ///
    /// # Errors
    /// Returns `Validation` if the certificate is malformed, `Conflict` if the
    /// name is already taken
    pub fn add_certificate(&self, certificate: Certificate) -> EngineResult<()> {
        certificate.validate()?;
        let mut certificates = self.certificates.write().map_err(poisoned)?;
        if certificates.iter().any(|c| c.name == certificate.name) {
            return Err(EngineError::Conflict(format!(
                "certificate '{}' already exists",
                certificate.name
            )));
        }
        certificates.push(certificate);
        Ok(())
    }

    /// Build a store from its serialized document
    ///
    /// # Errors
    /// Returns the first validation error or conflict found in the document
    pub fn from_document(document: StoreDocument) -> EngineResult<Self> {
        let store = Self::new();
        for student in document.students {
            store.enroll_student(&student.id)?;
            for record in student.records {
                store.insert_entry(AcademicRecordEntry {
                    student_id: student.id.clone(),
                    course_id: record.course_id,
                    status: record.status,
                    grade: record.grade,
                    term: record.term,
                    credits: record.credits,
                })?;
            }
        }
        for certificate in document.certificates {
            store.add_certificate(certificate)?;
        }
        Ok(store)
    }

    /// Serialize the store's current contents
    ///
    /// # Errors
    /// Returns `Storage` if a lock is poisoned
    pub fn to_document(&self) -> EngineResult<StoreDocument> {
        let records = self.records.read().map_err(poisoned)?;
        let students = records
            .iter()
            .map(|(id, entries)| StudentDocument {
                id: id.clone(),
                records: entries
                    .iter()
                    .map(|entry| RecordDocument {
                        course_id: entry.course_id.clone(),
                        status: entry.status,
                        grade: entry.grade,
                        term: entry.term,
                        credits: entry.credits,
                    })
                    .collect(),
            })
            .collect();
        Ok(StoreDocument {
            students,
            certificates: self.certificates()?,
        })
    }

    /// Parse a store from TOML
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or the contents are invalid
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let document: StoreDocument = toml::from_str(toml_str)?;
        Ok(Self::from_document(document)?)
    }

    /// Load a store from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Write the store to a TOML file
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let toml_str = toml::to_string_pretty(&self.to_document()?)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    fn write_entry(&self, entry: AcademicRecordEntry, replace: bool) -> EngineResult<()> {
        entry.validate().map_err(EngineError::Validation)?;
        let mut records = self.records.write().map_err(poisoned)?;
        let entries = records
            .get_mut(&entry.student_id)
            .ok_or_else(|| EngineError::not_found(EntityKind::Student, &entry.student_id))?;

        let key = entry.key();
        let position = entries.iter().position(|e| e.key() == key);
        if position.is_some() && !replace {
            return Err(EngineError::Conflict(format!(
                "'{}' already has an entry for '{}' in {}",
                entry.student_id, entry.course_id, entry.term
            )));
        }

        // At most one planned entry per student
        if entry.status == RecordStatus::Planned {
            if let Some(pending) = entries
                .iter()
                .find(|e| e.status == RecordStatus::Planned && e.key() != key)
            {
                return Err(EngineError::PendingRegistration {
                    student_id: entry.student_id.clone(),
                    course_id: pending.course_id.clone(),
                });
            }
        }

        if let Some(position) = position {
            entries[position] = entry;
        } else {
            entries.push(entry);
            entries.sort_by(|a, b| a.term.cmp(&b.term).then_with(|| a.course_id.cmp(&b.course_id)));
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn student_record(&self, student_id: &str) -> EngineResult<Vec<AcademicRecordEntry>> {
        self.records
            .read()
            .map_err(poisoned)?
            .get(student_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(EntityKind::Student, student_id))
    }

    fn insert_entry(&self, entry: AcademicRecordEntry) -> EngineResult<()> {
        self.write_entry(entry, false)
    }

    fn upsert_entry(&self, entry: AcademicRecordEntry) -> EngineResult<()> {
        self.write_entry(entry, true)
    }

    fn delete_entry(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> EngineResult<AcademicRecordEntry> {
        let mut records = self.records.write().map_err(poisoned)?;
        let entries = records
            .get_mut(student_id)
            .ok_or_else(|| EngineError::not_found(EntityKind::Student, student_id))?;

        let position = entries
            .iter()
            .position(|e| e.course_id == course_id && e.status == RecordStatus::Planned)
            .or_else(|| entries.iter().rposition(|e| e.course_id == course_id))
            .ok_or_else(|| {
                EngineError::not_found(EntityKind::RecordEntry, &format!("{student_id}/{course_id}"))
            })?;
        Ok(entries.remove(position))
    }
}

impl CertificateCatalog for MemoryStore {
    fn certificates(&self) -> EngineResult<Vec<Certificate>> {
        Ok(self.certificates.read().map_err(poisoned)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Grade, Semester, Term};

    fn fall(year: u16) -> Term {
        Term::new(Semester::Fall, year)
    }

    fn store_with_student() -> MemoryStore {
        let store = MemoryStore::new();
        store.enroll_student("s1").unwrap();
        store
    }

    #[test]
    fn test_unknown_student() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.student_record("nobody"),
            Err(EngineError::NotFound { kind: EntityKind::Student, .. })
        ));
    }

    #[test]
    fn test_insert_conflicts_on_same_key() {
        let store = store_with_student();
        let entry = AcademicRecordEntry::planned("s1", "CS5010", fall(2024), 4);
        store.insert_entry(entry.clone()).unwrap();

        let err = store.insert_entry(entry).unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_same_course_different_term_is_allowed() {
        let store = store_with_student();
        store
            .insert_entry(AcademicRecordEntry::completed("s1", "CS5010", Grade::F, fall(2023), 4))
            .unwrap();
        store
            .insert_entry(AcademicRecordEntry::planned("s1", "CS5010", fall(2024), 4))
            .unwrap();
        assert_eq!(store.student_record("s1").unwrap().len(), 2);
    }

    #[test]
    fn test_second_planned_entry_is_pending_conflict() {
        let store = store_with_student();
        store
            .insert_entry(AcademicRecordEntry::planned("s1", "CS5010", fall(2024), 4))
            .unwrap();

        let err = store
            .insert_entry(AcademicRecordEntry::planned("s1", "CS5800", fall(2024), 4))
            .unwrap_err();
        assert!(matches!(err, EngineError::PendingRegistration { ref course_id, .. } if course_id == "CS5010"));
        assert!(err.is_retryable());

        // Completed entries are not constrained
        store
            .insert_entry(AcademicRecordEntry::completed("s1", "CS5800", Grade::B, fall(2023), 4))
            .unwrap();
        assert_eq!(store.student_record("s1").unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_replaces() {
        let store = store_with_student();
        store
            .upsert_entry(AcademicRecordEntry::planned("s1", "CS5010", fall(2024), 4))
            .unwrap();
        store
            .upsert_entry(AcademicRecordEntry::completed("s1", "CS5010", Grade::A, fall(2024), 4))
            .unwrap();

        let record = store.student_record("s1").unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record[0].status, RecordStatus::Completed);
    }

    #[test]
    fn test_insert_rejects_invalid_entry() {
        let store = store_with_student();
        let mut entry = AcademicRecordEntry::planned("s1", "CS5010", fall(2024), 4);
        entry.status = RecordStatus::Completed;
        assert!(matches!(
            store.insert_entry(entry),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_prefers_planned_entry() {
        let store = store_with_student();
        store
            .insert_entry(AcademicRecordEntry::completed("s1", "CS5010", Grade::F, fall(2023), 4))
            .unwrap();
        store
            .insert_entry(AcademicRecordEntry::planned("s1", "CS5010", fall(2024), 4))
            .unwrap();

        let removed = store.delete_entry("s1", "CS5010").unwrap();
        assert_eq!(removed.status, RecordStatus::Planned);
        assert_eq!(store.student_record("s1").unwrap().len(), 1);

        store.delete_entry("s1", "CS5010").unwrap();
        assert!(matches!(
            store.delete_entry("s1", "CS5010"),
            Err(EngineError::NotFound { kind: EntityKind::RecordEntry, .. })
        ));
    }

    #[test]
    fn test_certificate_names_are_unique() {
        let store = MemoryStore::new();
        let cert = Certificate::new("AI", vec!["CS5100".to_string()]).unwrap();
        store.add_certificate(cert.clone()).unwrap();
        assert!(matches!(
            store.add_certificate(cert),
            Err(EngineError::Conflict(_))
        ));
    }

    #[test]
    fn test_toml_document_round_trip() {
        let toml_str = r#"
[[students]]
id = "s1"

[[students.records]]
course_id = "CS5010"
status = "completed"
grade = "A"
credits = 4
term = { year = 2023, semester = "fall" }

[[students.records]]
course_id = "CS5800"
status = "planned"
credits = 4
term = { year = 2024, semester = "spring" }

[[certificates]]
name = "Software Engineering"
required = ["CS5010", "CS5500"]
"#;
        let store = MemoryStore::from_toml_str(toml_str).unwrap();
        let record = store.student_record("s1").unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record[0].student_id, "s1");
        assert_eq!(record[0].grade, Some(Grade::A));
        assert_eq!(store.certificates().unwrap().len(), 1);

        let reparsed = toml::to_string_pretty(&store.to_document().unwrap()).unwrap();
        let again = MemoryStore::from_toml_str(&reparsed).unwrap();
        assert_eq!(again.student_record("s1").unwrap(), record);
    }
}
