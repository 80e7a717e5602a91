//! Records validated at construction only

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{RecordSchema, SchemaValidator, ValidationError};

use super::{construct_values, render};

/// A record checked once, when it is built.
///
/// Setting a field afterwards is never validated: a record whose `age`
/// holds a string is a legal state. Attributes outside the schema can be
/// set and read back, but are not part of `dump`.
#[derive(Debug, Clone)]
pub struct PlainRecord {
    schema: Arc<RecordSchema>,
    values: Map<String, Value>,
    extras: Map<String, Value>,
}

impl PlainRecord {
    /// Validates `document` against `schema` and builds the record.
    ///
    /// Keys in `document` that the schema does not declare are dropped,
    /// not rejected; use `set` to attach undeclared attributes.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every offending field.
    pub fn construct(schema: Arc<RecordSchema>, document: &Value) -> Result<Self, ValidationError> {
        let validator = SchemaValidator::new(schema);
        let values = construct_values(&validator, document)?;
        Ok(Self {
            schema: Arc::clone(validator.schema()),
            values,
            extras: Map::new(),
        })
    }

    /// Stores `value` verbatim and returns the previous value, if any.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        let model = self.schema.name.as_str();

        if self.schema.has_field(field) {
            log_event_with_fields(
                Event::UncheckedAssignment,
                &[("field", field), ("record", model)],
            );
            self.values.insert(field.to_string(), value)
        } else {
            log_event_with_fields(
                Event::UndeclaredAttributeSet,
                &[("field", field), ("record", model)],
            );
            self.extras.insert(field.to_string(), value)
        }
    }

    /// Current value of a declared field or a previously set attribute
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field).or_else(|| self.extras.get(field))
    }

    /// Independent snapshot of the declared fields, in declaration order
    pub fn dump(&self) -> Map<String, Value> {
        self.values.clone()
    }

    /// The record's schema
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }
}

impl fmt::Display for PlainRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, &self.schema.name, &self.values)
    }
}
