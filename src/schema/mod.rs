//! Record schemas and field validation
//!
//! A schema is an ordered list of typed fields. Each field type maps to
//! an explicit validator function; `SchemaValidator` holds one per field
//! and is used both when a record is constructed and when a field is
//! reassigned.
//!
//! # Rules
//!
//! - All offending fields are reported in one error
//! - Optional fields default to null
//! - Undeclared input keys are ignored at construction
//! - Validation is deterministic and never mutates its input

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{ErrorKind, FieldError, FieldFailure, SchemaError, SchemaResult, ValidationError};
pub use loader::{read_schema_file, SchemaLoader};
pub use types::{FieldDef, FieldType, RecordSchema};
pub use validator::{
    validate_email, validate_int, validate_string, validator_for, FieldValidator, SchemaValidator,
};
