//! CLI command implementations
//!
//! `demo` walks through both record kinds and prints what each step
//! produces. `check` drives a single record over JSON lines.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::observability::Logger;
use crate::record::{PlainRecord, Record, ValidatedRecord};
use crate::schema::{read_schema_file, RecordSchema, SchemaLoader};

use super::args::{Cli, Command};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_requests, write_error, write_response};

/// A single `check` request
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    /// Build a new record, replacing any previous one
    Construct { fields: Value },
    /// Assign one field on the current record
    Assign { field: String, value: Value },
    /// Snapshot the current record
    Dump,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    Logger::set_min_severity(cli.log_level.into());
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Demo => demo(&mut io::stdout()),
        Command::Check {
            schema,
            schema_dir,
            record,
        } => check(resolve_schema(schema, schema_dir, record)?),
    }
}

/// Walkthrough of validated and plain records.
pub fn demo<W: Write>(out: &mut W) -> CliResult<()> {
    let user_schema = Arc::new(RecordSchema::user());

    writeln!(out, "== {} (validate_assignment = true)", user_schema.name)?;

    let mut user = ValidatedRecord::construct(
        Arc::clone(&user_schema),
        &json!({"name": "Areeba", "age": 22, "email": "areeba@example.com"}),
    )?;
    writeln!(out, "{}", Value::Object(user.dump()))?;

    match ValidatedRecord::construct(
        Arc::clone(&user_schema),
        &json!({"name": "Areeba", "age": "Twenty Two", "email": "areeba@example.com"}),
    ) {
        Ok(_) => writeln!(out, "Creation unexpectedly succeeded")?,
        Err(e) => writeln!(out, "Creation error:\n{}", e)?,
    }

    if let Err(e) = user.assign("age", "Twenty Three") {
        writeln!(out, "Update error:\n{}", e)?;
    }
    writeln!(out, "{}", Value::Object(user.dump()))?;

    let data_schema = Arc::new(RecordSchema::user_data());
    writeln!(out)?;
    writeln!(out, "== {} (validated at construction only)", data_schema.name)?;

    let mut data = PlainRecord::construct(data_schema, &json!({"name": "Areeba", "age": 22}))?;
    writeln!(out, "{}", data)?;
    writeln!(out, "{}", Value::Object(data.dump()))?;

    data.set("age", "Twenty Three");
    writeln!(out, "{}", data)?;

    Ok(())
}

/// Picks the schema for `check`: a single file, or a named record from a
/// directory of schema files.
pub fn resolve_schema(
    schema: Option<PathBuf>,
    schema_dir: Option<PathBuf>,
    record: Option<String>,
) -> CliResult<Arc<RecordSchema>> {
    match (schema, schema_dir, record) {
        (Some(path), _, _) => Ok(Arc::new(read_schema_file(&path)?)),
        (None, Some(dir), Some(name)) => {
            let mut loader = SchemaLoader::new(&dir);
            loader.load_all()?;
            Ok(loader.get(&name)?)
        }
        _ => Err(CliError::bad_request(
            "check needs --schema, or --schema-dir with --record",
        )),
    }
}

/// Serves requests from stdin until EOF.
pub fn check(schema: Arc<RecordSchema>) -> CliResult<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    check_session(schema, stdin.lock(), &mut stdout)
}

/// Serves `check` requests from `input`, one response per request.
///
/// Request-level failures are written as error responses and do not
/// end the session; only I/O failures do.
pub fn check_session<R: BufRead, W: Write>(
    schema: Arc<RecordSchema>,
    input: R,
    out: &mut W,
) -> CliResult<()> {
    let mut record: Option<Record> = None;

    for line in read_requests(input) {
        let outcome = line
            .and_then(|value| {
                serde_json::from_value::<Request>(value)
                    .map_err(|e| CliError::bad_request(format!("Invalid request: {}", e)))
            })
            .and_then(|request| handle(&schema, &mut record, request));

        match outcome {
            Ok(data) => write_response(out, data)?,
            Err(e) if *e.code() == CliErrorCode::IoError => return Err(e),
            Err(e) => write_error(out, &e)?,
        }
    }

    Ok(())
}

fn handle(
    schema: &Arc<RecordSchema>,
    record: &mut Option<Record>,
    request: Request,
) -> CliResult<Value> {
    match request {
        Request::Construct { fields } => {
            let built = Record::construct(Arc::clone(schema), &fields)?;
            let data = Value::Object(built.dump());
            *record = Some(built);
            Ok(data)
        }
        Request::Assign { field, value } => {
            let current = record.as_mut().ok_or_else(CliError::not_constructed)?;
            current.assign(&field, value)?;
            Ok(Value::Object(current.dump()))
        }
        Request::Dump => {
            let current = record.as_ref().ok_or_else(CliError::not_constructed)?;
            Ok(Value::Object(current.dump()))
        }
    }
}
