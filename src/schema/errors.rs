//! Validation and schema error types
//!
//! Error codes:
//! - RECORD_VALIDATION_FAILED (one or more fields rejected)
//! - RECORD_SCHEMA_MALFORMED (schema file unreadable or invalid JSON)
//! - RECORD_SCHEMA_DUPLICATE (schema name already registered)
//! - RECORD_SCHEMA_UNKNOWN (schema name not registered)

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Kind of a single field failure, reported as `type=<code>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Value is not an integer and cannot be coerced to one
    IntType,
    /// String could not be parsed as an integer
    IntParsing,
    /// String holds an integer outside the 64-bit range
    IntParsingSize,
    /// Float with a fractional part
    IntFromFloat,
    /// Value is not a string
    StringType,
    /// String does not have an email shape
    ValueError,
    /// Required field omitted
    Missing,
    /// Field is not declared by the schema
    NoSuchAttribute,
    /// Document is not an object
    ModelType,
}

impl ErrorKind {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::IntType => "int_type",
            ErrorKind::IntParsing => "int_parsing",
            ErrorKind::IntParsingSize => "int_parsing_size",
            ErrorKind::IntFromFloat => "int_from_float",
            ErrorKind::StringType => "string_type",
            ErrorKind::ValueError => "value_error",
            ErrorKind::Missing => "missing",
            ErrorKind::NoSuchAttribute => "no_such_attribute",
            ErrorKind::ModelType => "model_type",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why a single value was rejected, before it is attached to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Attaches the failure to a field and the offending input
    pub fn at(self, field: impl Into<String>, input: Value) -> FieldError {
        FieldError {
            field: field.into(),
            kind: self.kind,
            message: self.message,
            input,
        }
    }
}

/// A rejected field with its reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Failure kind
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Human-readable reason
    pub message: String,
    /// The rejected input value
    pub input: Value,
}

impl FieldError {
    /// Required field omitted at construction
    pub fn missing(field: impl Into<String>) -> Self {
        FieldFailure::new(ErrorKind::Missing, "field required").at(field, Value::Null)
    }

    /// Field is not declared by the schema
    pub fn no_such_attribute(field: impl Into<String>, input: Value) -> Self {
        let field = field.into();
        let message = format!("object has no field \"{}\"", field);
        FieldFailure::new(ErrorKind::NoSuchAttribute, message).at(field, input)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {} [type={}", self.field, self.message, self.kind)?;
        if self.kind != ErrorKind::Missing {
            write!(f, ", input_value={}", self.input)?;
        }
        write!(f, "]")
    }
}

/// One or more field values failed their declared constraint
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", render_report(.model, .errors))]
pub struct ValidationError {
    model: String,
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Error code for every validation failure
    pub const CODE: &'static str = "RECORD_VALIDATION_FAILED";

    /// Creates an error for a record type. `errors` should not be empty.
    pub fn new(model: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            model: model.into(),
            errors,
        }
    }

    /// Creates an error with a single field failure
    pub fn single(model: impl Into<String>, error: FieldError) -> Self {
        Self::new(model, vec![error])
    }

    /// Record type the error was raised for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// All field failures, in schema order
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Number of rejected fields
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Names of the rejected fields
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }

    /// Returns the failure for a field, if any
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Returns the failures as a JSON array
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.errors).unwrap_or(Value::Null)
    }
}

fn render_report(model: &str, errors: &[FieldError]) -> String {
    let noun = if errors.len() == 1 { "error" } else { "errors" };
    let mut out = format!("{} validation {} for {}", errors.len(), noun, model);
    for error in errors {
        out.push('\n');
        out.push_str(&error.to_string());
    }
    out
}

/// Schema loading and registration errors
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema file unreadable or not valid JSON
    #[error("Malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// A schema with the same name is already registered
    #[error("Schema '{0}' is already registered")]
    AlreadyRegistered(String),

    /// No schema with the given name
    #[error("Schema '{0}' not found")]
    Unknown(String),
}

impl SchemaError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Malformed { .. } => "RECORD_SCHEMA_MALFORMED",
            SchemaError::AlreadyRegistered(_) => "RECORD_SCHEMA_DUPLICATE",
            SchemaError::Unknown(_) => "RECORD_SCHEMA_UNKNOWN",
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn int_parsing(input: &str) -> FieldError {
        FieldFailure::new(
            ErrorKind::IntParsing,
            "input should be a valid integer, unable to parse string as an integer",
        )
        .at("age", json!(input))
    }

    #[test]
    fn test_report_format_single() {
        let err = ValidationError::single("User", int_parsing("Twenty Two"));
        assert_eq!(
            err.to_string(),
            "1 validation error for User\nage\n  input should be a valid integer, \
             unable to parse string as an integer [type=int_parsing, input_value=\"Twenty Two\"]"
        );
    }

    #[test]
    fn test_report_format_plural_and_missing() {
        let err = ValidationError::new(
            "User",
            vec![int_parsing("x"), FieldError::missing("email")],
        );
        let display = err.to_string();
        assert!(display.starts_with("2 validation errors for User"));
        assert!(display.contains("email\n  field required [type=missing]"));
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["age", "email"]);
    }

    #[test]
    fn test_error_json_shape() {
        let err = ValidationError::single("User", int_parsing("x"));
        let value = err.to_json();
        assert_eq!(value[0]["field"], "age");
        assert_eq!(value[0]["type"], "int_parsing");
        assert_eq!(value[0]["input"], "x");
    }

    #[test]
    fn test_no_such_attribute_message() {
        let err = FieldError::no_such_attribute("nickname", json!("Ari"));
        assert_eq!(err.kind, ErrorKind::NoSuchAttribute);
        assert!(err.message.contains("nickname"));
    }

    #[test]
    fn test_schema_error_codes() {
        assert_eq!(SchemaError::Unknown("x".into()).code(), "RECORD_SCHEMA_UNKNOWN");
        assert_eq!(
            SchemaError::malformed("a.json", "bad").code(),
            "RECORD_SCHEMA_MALFORMED"
        );
        assert!(SchemaError::AlreadyRegistered("User".into())
            .to_string()
            .contains("User"));
    }
}
