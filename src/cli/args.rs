//! CLI argument definitions for `NuProgress`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use nu_progress::config::ConfigOverrides;
use nu_progress::core::models::{Grade, Term};
use nu_progress::core::prerequisites::MatchMode;
use nu_progress::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `Level` for
/// runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Level::from(*self).as_str())
    }
}

/// CLI prerequisite match argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum MatchArg {
    /// Match prerequisites by course id
    Id,
    /// Match prerequisites by course title (requires unique titles)
    Title,
}

impl From<MatchArg> for MatchMode {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Id => Self::Id,
            MatchArg::Title => Self::Title,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `store_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Check whether a student may register for a course.
    Check {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
    },
    /// Re-check eligibility with prerequisites completed elsewhere.
    ///
    /// Each PREREQ may be a course id or the title shown by `check`.
    Confirm {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
        /// Prerequisites the student confirms as completed
        #[arg(value_name = "PREREQ", num_args = 1.., required = true)]
        confirmed: Vec<String>,
    },
    /// Show the certificate progress a course would bring a student.
    Certificates {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
    },
    /// Show a student's program-of-study snapshot.
    Snapshot {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
    },
    /// Register a student for a course (writes a planned entry when allowed).
    Register {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
        /// Term of the registration, e.g. "Fall 2024"
        #[arg(short, long, value_name = "TERM")]
        term: Term,
        /// Prerequisites the student confirms as completed elsewhere
        #[arg(long = "confirm", value_name = "PREREQ")]
        confirmed: Vec<String>,
    },
    /// Post a final grade for a planned course.
    Grade {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
        /// Grade (A, B, C, D, F, P, NP)
        #[arg(value_name = "GRADE")]
        grade: Grade,
    },
    /// Drop a course from a student's record.
    Drop {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course id
        #[arg(value_name = "COURSE")]
        course: String,
    },
    /// Validate a catalog CSV and optionally install it as the configured catalog.
    Import {
        /// Path to the catalog CSV file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,
        /// Copy the file to the configured catalog location when it imports cleanly
        #[arg(long)]
        install: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "nuprogress",
    about = "NuProgress registration eligibility and program progress",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config catalog CSV path
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog_file: Option<PathBuf>,

    /// Override config store file path
    #[arg(long = "store", value_name = "FILE")]
    pub store_file: Option<PathBuf>,

    /// Override config prerequisite match mode
    #[arg(long = "match", value_enum)]
    pub prerequisite_match: Option<MatchArg>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means no override; overrides are applied per run and never saved.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            catalog_file: self
                .catalog_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            store_file: self
                .store_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            prerequisite_match: self.prerequisite_match.map(Into::into),
        }
    }
}
