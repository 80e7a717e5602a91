//! CLI-specific error types

use std::fmt;
use std::io;

use serde_json::Value;

use crate::schema::{SchemaError, ValidationError};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Schema file could not be loaded
    SchemaError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Request line is not a valid request
    BadRequest,
    /// Assign or dump before a successful construct
    NotConstructed,
    /// Construction or assignment rejected
    ValidationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaError => "RECORD_CLI_SCHEMA_ERROR",
            Self::IoError => "RECORD_CLI_IO_ERROR",
            Self::BadRequest => "RECORD_CLI_BAD_REQUEST",
            Self::NotConstructed => "RECORD_CLI_NOT_CONSTRUCTED",
            Self::ValidationFailed => ValidationError::CODE,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    details: Option<Value>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Malformed request line
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BadRequest, msg)
    }

    /// No record constructed yet
    pub fn not_constructed() -> Self {
        Self::new(
            CliErrorCode::NotConstructed,
            "No record constructed yet. Send a 'construct' request first.",
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Per-field failures, for validation errors
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, e.to_string())
    }
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        Self {
            code: CliErrorCode::ValidationFailed,
            message: e.to_string(),
            details: Some(e.to_json()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldError;

    #[test]
    fn test_validation_error_carries_details() {
        let err: CliError =
            ValidationError::single("User", FieldError::missing("email")).into();
        assert_eq!(err.code_str(), "RECORD_VALIDATION_FAILED");
        assert_eq!(err.details().unwrap()[0]["field"], "email");
    }

    #[test]
    fn test_display_includes_code() {
        let err = CliError::not_constructed();
        assert!(err.to_string().starts_with("RECORD_CLI_NOT_CONSTRUCTED"));
    }
}
