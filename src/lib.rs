//! Shared library for `NuProgress`
//! Registration eligibility, certificate progress and program-of-study
//! statistics, used by the `nuprogress` CLI.

pub mod config;
pub mod core;
pub mod logger;

pub use crate::core::get_version;
