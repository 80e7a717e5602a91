//! Records validated at construction and on every assignment

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{RecordSchema, SchemaValidator, ValidationError};

use super::{construct_values, render};

/// A record whose fields satisfy their declared constraints at all
/// observable times after construction.
///
/// Assignment is all-or-nothing per field: a rejected value leaves every
/// field, including the target, exactly as it was.
#[derive(Debug, Clone)]
pub struct ValidatedRecord {
    validator: SchemaValidator,
    values: Map<String, Value>,
}

impl ValidatedRecord {
    /// Validates `document` against `schema` and builds the record.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every offending field. No
    /// record is produced. Undeclared keys in `document` are dropped
    /// without error.
    pub fn construct(schema: Arc<RecordSchema>, document: &Value) -> Result<Self, ValidationError> {
        let validator = SchemaValidator::new(schema);
        let values = construct_values(&validator, document)?;
        Ok(Self { validator, values })
    }

    /// Validates `value` for `field` and stores the coerced result.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the field is undeclared or the value
    /// fails the field's validator. The record is unchanged.
    pub fn assign(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ValidationError> {
        let value = value.into();
        let model = self.validator.schema().name.as_str();

        match self.validator.validate_field(field, &value) {
            Ok(coerced) => {
                log_event_with_fields(
                    Event::AssignmentApplied,
                    &[("field", field), ("record", model)],
                );
                self.values.insert(field.to_string(), coerced);
                Ok(())
            }
            Err(err) => {
                log_event_with_fields(
                    Event::AssignmentRejected,
                    &[("field", field), ("record", model), ("reason", err.errors()[0].message.as_str())],
                );
                Err(err)
            }
        }
    }

    /// Current value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Independent snapshot of all fields, in declaration order
    pub fn dump(&self) -> Map<String, Value> {
        self.values.clone()
    }

    /// The record's schema
    pub fn schema(&self) -> &RecordSchema {
        self.validator.schema()
    }
}

impl fmt::Display for ValidatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, &self.schema().name, &self.values)
    }
}
