//! Record schema definitions
//!
//! Supported field types:
//! - string: UTF-8 string, never coerced
//! - int: 64-bit signed integer, coerced from integral floats and numeric strings
//! - email: string with a minimal email shape

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Email-shaped string
    Email,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Email => "email",
        }
    }
}

/// A single declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field data type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Accepts null, and defaults to null when omitted
    #[serde(default)]
    pub optional: bool,
}

impl FieldDef {
    /// Create a required field
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional: false,
        }
    }

    /// Create an optional field defaulting to null
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional: true,
        }
    }

    /// Create a required string field
    pub fn required_string(name: impl Into<String>) -> Self {
        Self::required(name, FieldType::String)
    }

    /// Create an optional string field
    pub fn optional_string(name: impl Into<String>) -> Self {
        Self::optional(name, FieldType::String)
    }

    /// Create a required int field
    pub fn required_int(name: impl Into<String>) -> Self {
        Self::required(name, FieldType::Int)
    }

    /// Create a required email field
    pub fn required_email(name: impl Into<String>) -> Self {
        Self::required(name, FieldType::Email)
    }
}

/// Complete record schema: a named, ordered list of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Record type name, used in error reports and display
    pub name: String,
    /// Whether assignments after construction are validated
    #[serde(default)]
    pub validate_assignment: bool,
    /// Field definitions in declaration order
    pub fields: Vec<FieldDef>,
}

impl RecordSchema {
    /// Create a schema that validates only at construction
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            validate_assignment: false,
            fields,
        }
    }

    /// Enable or disable validation on assignment
    pub fn with_validate_assignment(mut self, enabled: bool) -> Self {
        self.validate_assignment = enabled;
        self
    }

    /// Looks up a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if the field is declared
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Schema name must not be empty".into());
        }

        if self.fields.is_empty() {
            return Err(format!("Schema '{}' declares no fields", self.name));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(format!("Schema '{}' has a field with an empty name", self.name));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!(
                    "Schema '{}' declares field '{}' more than once",
                    self.name, field.name
                ));
            }
        }

        Ok(())
    }

    /// The strict user model: validated on construction and assignment
    pub fn user() -> Self {
        Self::new(
            "User",
            vec![
                FieldDef::required_string("name"),
                FieldDef::required_int("age"),
                FieldDef::required_email("email"),
            ],
        )
        .with_validate_assignment(true)
    }

    /// The plain user data record: validated on construction only
    pub fn user_data() -> Self {
        Self::new(
            "UserData",
            vec![
                FieldDef::required_string("name"),
                FieldDef::required_int("age"),
                FieldDef::optional_string("email"),
            ],
        )
    }
}
