//! Core eligibility and aggregation engine

pub mod catalog;
pub mod certificates;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod prerequisites;
pub mod program;
pub mod registration;
pub mod store;

pub use eligibility::EligibilityEngine;
pub use error::{EngineError, EngineResult, ErrorKind};
pub use registration::RegistrationOutcome;

/// Returns the current version of the `NuProgress` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
