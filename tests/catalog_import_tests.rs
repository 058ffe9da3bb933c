//! Integration tests for bulk catalog import

use nu_progress::core::catalog::{import_catalog_csv, load_catalog_csv, CourseCatalog};
use nu_progress::core::models::{Category, Semester, SubjectCode};
use std::fs;
use tempfile::TempDir;

const HEADER: &str = "Course ID,Reference Number,Subject,Number,Title,Credits,Categories,Certifications,Prerequisites,Level,Semester,Year";

fn write_catalog(dir: &TempDir, name: &str, rows: &[&str]) -> std::path::PathBuf {
    let mut content = format!("Catalog,Graduate Catalog\nInstitution,Test University\nCourses,,,\n{HEADER}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write catalog");
    path
}

#[test]
fn test_load_sample_catalog() {
    let (catalog, report) = load_catalog_csv("samples/catalog.csv").expect("Failed to load sample");

    assert!(report.is_clean(), "{:?}", report.errors);
    assert_eq!(catalog.institution, "Northeastern University");
    assert_eq!(report.inserted, 14);
    assert_eq!(report.updated, 0);
    assert_eq!(catalog.offering_count(), 14);
    assert!(catalog.validate_prerequisites(false).is_ok());

    // CS5010 is offered twice; the latest offering wins
    let pdp = catalog.course("CS5010").expect("CS5010");
    assert_eq!(pdp.term.semester, Semester::Spring);
    assert_eq!(pdp.reference_number, "30110");

    let ml = catalog.course("CS6140").expect("CS6140");
    assert_eq!(ml.prerequisites, vec!["CS5800".to_string(), "DS5110".to_string()]);
    assert!(ml.certifications.contains("Data Science"));

    let fundies = catalog.course("CS2500").expect("CS2500");
    assert_eq!(fundies.primary_category(), Some(Category::LowerLevel));
}

#[test]
fn test_invalid_rows_are_skipped_and_reported() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_catalog(
        &dir,
        "catalog.csv",
        &[
            "CS5010,1,CS,5010,Programming Design Paradigm,4,core,,,graduate,fall,2024",
            "MA1000,2,MATH,1000,Calculus,4,core,,,graduate,fall,2024",
            "CS5800,3,CS,5800,Algorithms,zero,core,,,graduate,fall,2024",
            "DS5110,4,DS,5110,Data Management,4,,,,graduate,fall,2024",
            "DS5220,5,DS,5220,Supervised ML,4,subject-ds,,DS 5110,graduate,winter,2024",
        ],
    );

    let (catalog, report) = load_catalog_csv(&path).expect("Failed to load");
    assert_eq!(report.inserted, 1);
    assert_eq!(report.errors.len(), 4);
    assert!(report.errors[0].starts_with("Row 6"));
    assert_eq!(catalog.offering_count(), 1);
    assert_eq!(
        catalog.course("CS5010").expect("CS5010").subject,
        SubjectCode::Cs
    );
}

#[test]
fn test_reimport_updates_existing_offerings() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let first = write_catalog(
        &dir,
        "first.csv",
        &["CS5010,1,CS,5010,Programming Design Paradigm,4,core,,,graduate,fall,2024"],
    );
    let second = write_catalog(
        &dir,
        "second.csv",
        &[
            "CS5010,1,CS,5010,Program Design Paradigm,4,core,,,graduate,fall,2024",
            "CS5010,9,CS,5010,Program Design Paradigm,4,core,,,graduate,spring,2025",
        ],
    );

    let (mut catalog, _) = load_catalog_csv(&first).expect("Failed to load");
    let report = import_catalog_csv(&second, &mut catalog).expect("Failed to import");

    assert_eq!(report.updated, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(catalog.offering_count(), 2);
    assert_eq!(
        catalog.course("CS5010").expect("CS5010").title,
        "Program Design Paradigm"
    );
}

#[test]
fn test_dangling_prerequisites_detected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_catalog(
        &dir,
        "catalog.csv",
        &["CS5800,1,CS,5800,Algorithms,4,core,,CS 5008,graduate,fall,2024"],
    );
    let (catalog, report) = load_catalog_csv(&path).expect("Failed to load");
    assert!(report.is_clean());

    let problems = catalog.validate_prerequisites(false).unwrap_err();
    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("CS5008"));
}

#[test]
fn test_missing_metadata_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("bad.csv");
    fs::write(&path, format!("Courses\n{HEADER}\n")).expect("Failed to write");
    assert!(load_catalog_csv(&path).is_err());
    assert!(load_catalog_csv(dir.path().join("missing.csv")).is_err());
}
