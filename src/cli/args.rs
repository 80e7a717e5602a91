//! CLI argument definitions using clap
//!
//! Commands:
//! - aerorecord demo
//! - aerorecord check --schema <path>
//! - aerorecord check --schema-dir <dir> --record <name>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::observability::Severity;

/// aerorecord - strictly validated records
#[derive(Parser, Debug)]
#[command(name = "aerorecord")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Minimum severity of structured log lines
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk through construction, assignment and dump on both record kinds
    Demo,

    /// Drive a record from JSON requests on stdin
    Check {
        /// Path to a record schema file
        #[arg(long, required_unless_present = "schema_dir", conflicts_with = "schema_dir")]
        schema: Option<PathBuf>,

        /// Directory of schema files, one record per file
        #[arg(long, requires = "record")]
        schema_dir: Option<PathBuf>,

        /// Record name to look up in --schema-dir
        #[arg(long, requires = "schema_dir")]
        record: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Severity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Severity::Trace,
            LogLevel::Info => Severity::Info,
            LogLevel::Warn => Severity::Warn,
            LogLevel::Error => Severity::Error,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
