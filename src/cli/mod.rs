//! CLI module for aerorecord
//!
//! Provides command-line interface for:
//! - demo: walkthrough of validated and plain records
//! - check: JSON-lines driver for a record built from a schema file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, LogLevel};
pub use commands::{check, check_session, demo, resolve_schema, run, run_command, Request};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_response};
