//! Command-line interface entry point for `NuProgress`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use nu_progress::config::Config;
use nu_progress::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use nu_progress::{error, info};
use std::path::PathBuf;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Check { student, course } => commands::check::run(&student, &course, &config),
        Command::Confirm {
            student,
            course,
            confirmed,
        } => commands::check::confirm(&student, &course, &confirmed, &config),
        Command::Certificates { student, course } => {
            commands::certificates::run(&student, &course, &config)
        }
        Command::Snapshot { student } => commands::snapshot::run(&student, &config),
        Command::Register {
            student,
            course,
            term,
            confirmed,
        } => commands::register::register(&student, &course, term, &confirmed, &config),
        Command::Grade {
            student,
            course,
            grade,
        } => commands::register::grade(&student, &course, grade, &config),
        Command::Drop { student, course } => commands::register::drop_course(&student, &course, &config),
        Command::Import {
            input_file,
            install,
        } => commands::import::run(&input_file, install, &config, verbose),
    };

    if let Err(message) = result {
        error!("{message}");
        eprintln!("{message}");
        std::process::exit(1);
    }
}
