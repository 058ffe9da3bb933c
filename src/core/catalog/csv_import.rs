//! Bulk catalog import from CSV
//!
//! Expected layout:
//!
//! ```text
//! Catalog,Graduate Catalog 2024
//! Institution,Northeastern University
//! Courses
//! Course ID,Reference Number,Subject,Number,Title,Credits,Categories,Certifications,Prerequisites,Level,Semester,Year
//! CS5800,30112,CS,5800,Algorithms,4,core,,CS5008,graduate,fall,2024
//! ```
//!
//! Multi-valued columns (Categories, Certifications, Prerequisites) are
//! separated with `;`. Rows that fail validation are reported and skipped.

use super::{Catalog, UpsertOutcome};
use crate::core::models::{
    parse_course_id, Category, Course, CourseLevel, Semester, SubjectCode, Term,
};
use crate::{debug, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Columns every catalog file must provide
const REQUIRED_COLUMNS: [&str; 12] = [
    "Course ID",
    "Reference Number",
    "Subject",
    "Number",
    "Title",
    "Credits",
    "Categories",
    "Certifications",
    "Prerequisites",
    "Level",
    "Semester",
    "Year",
];

/// Catalog metadata from the CSV header section
#[derive(Debug, Clone, Default)]
pub struct CatalogMetadata {
    /// Catalog name
    pub name: String,
    /// Institution name
    pub institution: String,
}

/// Summary of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Offerings created
    pub inserted: usize,
    /// Offerings replaced on the (reference number, semester, year) key
    pub updated: usize,
    /// One message per rejected row
    pub errors: Vec<String>,
}

impl ImportReport {
    /// Whether every row imported cleanly
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load a new catalog from a CSV file
///
/// # Errors
/// Returns an error if the file cannot be read or its metadata or header
/// section is malformed. Row-level problems are reported in the `ImportReport`.
pub fn load_catalog_csv<P: AsRef<Path>>(
    path: P,
) -> Result<(Catalog, ImportReport), Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    let metadata = parse_metadata(&lines)?;

    let mut catalog = Catalog::new(&metadata.name, &metadata.institution);
    let report = import_lines(&lines, &mut catalog)?;
    Ok((catalog, report))
}

/// Upsert every row of a CSV file into an existing catalog
///
/// # Errors
/// Returns an error if the file cannot be read or has no course section
pub fn import_catalog_csv<P: AsRef<Path>>(
    path: P,
    catalog: &mut Catalog,
) -> Result<ImportReport, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    import_catalog_str(&content, catalog)
}

/// Upsert every row of CSV content into an existing catalog
///
/// # Errors
/// Returns an error if the content has no course section or header
pub fn import_catalog_str(
    content: &str,
    catalog: &mut Catalog,
) -> Result<ImportReport, Box<dyn Error>> {
    let lines: Vec<&str> = content.lines().collect();
    import_lines(&lines, catalog)
}

fn import_lines(lines: &[&str], catalog: &mut Catalog) -> Result<ImportReport, Box<dyn Error>> {
    let courses_start = lines
        .iter()
        .position(|line| is_courses_marker(line))
        .ok_or("No 'Courses' section found in CSV")?;

    let header_line = lines
        .get(courses_start + 1)
        .ok_or("No course header found")?;
    let headers = parse_csv_line(header_line);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h.eq_ignore_ascii_case(col)))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(format!("Missing catalog columns: {}", missing.join(", ")).into());
    }

    let mut report = ImportReport::default();
    for (idx, line) in lines.iter().enumerate().skip(courses_start + 2) {
        if line.trim().is_empty() {
            continue;
        }

        match parse_course_line(line, &headers) {
            Ok(course) => {
                debug!("Importing {} ({})", course.id, course.term);
                match catalog.upsert(course) {
                    UpsertOutcome::Inserted => report.inserted += 1,
                    UpsertOutcome::Updated => report.updated += 1,
                }
            }
            Err(e) => {
                let message = format!("Row {}: {e}", idx + 1);
                warn!("Skipping catalog row. {message}");
                report.errors.push(message);
            }
        }
    }

    Ok(report)
}

/// Parse catalog metadata from the header section
fn parse_metadata(lines: &[&str]) -> Result<CatalogMetadata, Box<dyn Error>> {
    let mut metadata = CatalogMetadata::default();

    for line in lines
        .iter()
        .take_while(|line| !is_courses_marker(line))
    {
        let parts = parse_csv_line(line);
        if parts.len() < 2 {
            continue;
        }

        match parts[0].to_lowercase().as_str() {
            "catalog" => metadata.name.clone_from(&parts[1]),
            "institution" => metadata.institution.clone_from(&parts[1]),
            _ => {}
        }
    }

    if metadata.name.is_empty() {
        return Err("Missing Catalog name".into());
    }
    if metadata.institution.is_empty() {
        return Err("Missing Institution".into());
    }

    Ok(metadata)
}

/// Whether a line opens the course section (trailing empty cells allowed)
fn is_courses_marker(line: &str) -> bool {
    let mut cells = line.split(',').map(str::trim);
    cells
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case("courses"))
        && cells.all(str::is_empty)
}

/// Parse a CSV line into fields
fn parse_csv_line(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .map(std::string::ToString::to_string)
        .collect()
}

/// Get a field value from a CSV line by header name
fn get_field<'a>(fields: &'a [String], header_name: &str, headers: &[String]) -> &'a str {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(header_name))
        .and_then(|idx| fields.get(idx))
        .map_or("", String::as_str)
}

/// Split a `;`-separated column into trimmed, non-empty items
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|item| !item.is_empty())
}

/// Parse and validate a single course row
fn parse_course_line(line: &str, headers: &[String]) -> Result<Course, String> {
    let fields = parse_csv_line(line);
    let field = |name: &str| get_field(&fields, name, headers);

    let id = field("Course ID");
    if id.is_empty() {
        return Err("missing Course ID".to_string());
    }
    let normalized_id = normalize_course_key(id);
    let reference_number = field("Reference Number");
    if reference_number.is_empty() {
        return Err(format!("{id}: missing Reference Number"));
    }
    let title = field("Title");
    if title.is_empty() {
        return Err(format!("{id}: missing Title"));
    }

    let subject: SubjectCode = field("Subject").parse().map_err(|e| format!("{id}: {e}"))?;
    let (id_subject, id_number) = parse_course_id(&normalized_id)?;
    if id_subject != subject || id_number != field("Number") {
        return Err(format!(
            "{id}: Course ID does not match Subject '{}' and Number '{}'",
            field("Subject"),
            field("Number")
        ));
    }
    let credits = field("Credits")
        .parse::<u32>()
        .ok()
        .filter(|c| *c > 0)
        .ok_or_else(|| format!("{id}: credits must be a positive integer"))?;

    let categories = split_list(field("Categories"))
        .map(str::parse::<Category>)
        .collect::<Result<BTreeSet<_>, _>>()
        .map_err(|e| format!("{id}: {e}"))?;
    if categories.is_empty() {
        return Err(format!("{id}: at least one category is required"));
    }

    let level: CourseLevel = field("Level").parse().map_err(|e| format!("{id}: {e}"))?;
    let semester: Semester = field("Semester").parse().map_err(|e| format!("{id}: {e}"))?;
    let year = field("Year")
        .parse::<u16>()
        .map_err(|_| format!("{id}: invalid year '{}'", field("Year")))?;

    let mut prerequisites: Vec<String> = Vec::new();
    for prereq in split_list(field("Prerequisites")) {
        let normalized = normalize_course_key(prereq);
        if !prerequisites.contains(&normalized) {
            prerequisites.push(normalized);
        }
    }

    Ok(Course {
        id: normalized_id,
        reference_number: reference_number.to_string(),
        subject,
        number: id_number,
        title: title.to_string(),
        credits,
        categories,
        certifications: split_list(field("Certifications"))
            .map(str::to_string)
            .collect(),
        prerequisites,
        level,
        term: Term::new(semester, year),
    })
}

/// Normalize a course key to PREFIXNUMBER format
/// Handles cases like "CS 5800", "CS5800", "CS 5800 (or equivalent)".
/// Anything that is not a course code (a title reference) is only trimmed.
fn normalize_course_key(input: &str) -> String {
    let cleaned = input.split('(').next().unwrap_or(input).trim();
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    let is_code = match parts.as_slice() {
        [code] => code.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && code.chars().any(|c| c.is_ascii_digit())
            && !code.contains(char::is_lowercase),
        [prefix, number] => prefix.chars().all(|c| c.is_ascii_uppercase())
            && number.chars().all(|c| c.is_ascii_alphanumeric())
            && number.starts_with(|c: char| c.is_ascii_digit()),
        _ => false,
    };
    if is_code {
        parts.concat()
    } else {
        input.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CourseCatalog;

    const HEADER: &str = "Course ID,Reference Number,Subject,Number,Title,Credits,Categories,Certifications,Prerequisites,Level,Semester,Year";

    fn csv(rows: &[&str]) -> String {
        let mut out = format!("Catalog,Test\nInstitution,Test U\nCourses\n{HEADER}\n");
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_normalize_course_key() {
        assert_eq!(normalize_course_key("CS 5800"), "CS5800");
        assert_eq!(normalize_course_key("CS5800"), "CS5800");
        assert_eq!(normalize_course_key("CS 5800 (or equivalent)"), "CS5800");
        assert_eq!(normalize_course_key("  DS  5110  "), "DS5110");
        assert_eq!(normalize_course_key("Intro to Programming"), "Intro to Programming");
        assert_eq!(normalize_course_key(" Algorithms "), "Algorithms");
    }

    #[test]
    fn test_import_valid_rows() {
        let content = csv(&[
            "CS5008,30100,CS,5008,Data Structures,4,prerequisite;lower-level,,,undergraduate,fall,2024",
            "CS5800,30112,CS,5800,Algorithms,4,core,Theory,CS 5008,graduate,fall,2024",
        ]);
        let mut catalog = Catalog::new("Test", "Test U");
        let report = import_catalog_str(&content, &mut catalog).unwrap();

        assert_eq!(report.inserted, 2);
        assert!(report.is_clean());
        let algo = catalog.course("CS5800").unwrap();
        assert_eq!(algo.prerequisites, vec!["CS5008".to_string()]);
        assert!(algo.certifications.contains("Theory"));
        let ds = catalog.course("CS5008").unwrap();
        assert_eq!(ds.primary_category(), Some(Category::LowerLevel));
        assert_eq!(ds.level, CourseLevel::Undergraduate);
    }

    #[test]
    fn test_import_upserts_on_reference_and_term() {
        let mut catalog = Catalog::new("Test", "Test U");
        let first = csv(&["CS5800,30112,CS,5800,Algorithms,4,core,,,graduate,fall,2024"]);
        let second = csv(&["CS5800,30112,CS,5800,Algorithms,3,core,,,graduate,fall,2024"]);

        import_catalog_str(&first, &mut catalog).unwrap();
        let report = import_catalog_str(&second, &mut catalog).unwrap();

        assert_eq!(report.inserted, 0);
        assert_eq!(report.updated, 1);
        assert_eq!(catalog.course("CS5800").unwrap().credits, 3);
    }

    #[test]
    fn test_import_reports_invalid_rows() {
        let content = csv(&[
            "CS5800,30112,CS,5800,Algorithms,0,core,,,graduate,fall,2024",
            "CS5600,30113,EE,5600,Systems,4,core,,,graduate,fall,2024",
            "CS5500,30114,CS,5500,Software Eng,4,,,,graduate,fall,2024",
            "CS6140,30115,CS,6140,Machine Learning,4,core,,,graduate,winter,2024",
            "CS5200,30116,CS,5200,Databases,4,core,,,graduate,spring,2025",
            "MATH5000,30117,CS,5000,Discrete Math,4,core,,,graduate,fall,2024",
            "DS5220,30118,CS,5220,Supervised ML,4,core,,,graduate,fall,2024",
        ]);
        let mut catalog = Catalog::new("Test", "Test U");
        let report = import_catalog_str(&content, &mut catalog).unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.errors.len(), 6);
        assert!(report.errors[0].contains("positive integer"));
        assert!(report.errors[1].contains("subject"));
        assert!(report.errors[2].contains("category"));
        assert!(report.errors[3].contains("semester"));
        assert!(report.errors[4].contains("MATH"));
        assert!(report.errors[5].contains("does not match"));
        assert!(catalog.course("MATH5000").is_err());
    }

    #[test]
    fn test_missing_columns() {
        let content = "Courses\nCourse ID,Title\nCS5800,Algorithms\n";
        let mut catalog = Catalog::new("Test", "Test U");
        let err = import_catalog_str(content, &mut catalog).unwrap_err();
        assert!(err.to_string().contains("Missing catalog columns"));
    }

    #[test]
    fn test_metadata_requires_name() {
        let lines = ["Institution,Test U", "Courses"];
        assert!(parse_metadata(&lines).is_err());
    }
}
