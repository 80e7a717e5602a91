//! Validated and plain records
//!
//! Both record kinds validate every field when constructed. They differ
//! only after construction:
//!
//! - `ValidatedRecord` re-validates each assignment; a rejected value is
//!   never stored
//! - `PlainRecord` stores whatever it is given
//!
//! `Record` picks one of the two from the schema's `validate_assignment`
//! flag.

mod plain;
mod validated;

pub use plain::PlainRecord;
pub use validated::ValidatedRecord;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{RecordSchema, SchemaValidator, ValidationError};

/// A record whose assignment behavior follows its schema
#[derive(Debug, Clone)]
pub enum Record {
    /// Schema has `validate_assignment` set
    Validated(ValidatedRecord),
    /// Schema validates at construction only
    Plain(PlainRecord),
}

impl Record {
    /// Builds a validated or plain record depending on the schema flag.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every offending field.
    pub fn construct(schema: Arc<RecordSchema>, document: &Value) -> Result<Self, ValidationError> {
        if schema.validate_assignment {
            ValidatedRecord::construct(schema, document).map(Record::Validated)
        } else {
            PlainRecord::construct(schema, document).map(Record::Plain)
        }
    }

    /// Assigns a field. Plain records always succeed.
    ///
    /// # Errors
    ///
    /// Validated records return `ValidationError` and keep their state.
    pub fn assign(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ValidationError> {
        match self {
            Record::Validated(r) => r.assign(field, value),
            Record::Plain(r) => {
                r.set(field, value);
                Ok(())
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Record::Validated(r) => r.get(field),
            Record::Plain(r) => r.get(field),
        }
    }

    pub fn dump(&self) -> Map<String, Value> {
        match self {
            Record::Validated(r) => r.dump(),
            Record::Plain(r) => r.dump(),
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        match self {
            Record::Validated(r) => r.schema(),
            Record::Plain(r) => r.schema(),
        }
    }

    /// Returns true if assignments are validated
    pub fn validates_assignment(&self) -> bool {
        matches!(self, Record::Validated(_))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Validated(r) => fmt::Display::fmt(r, f),
            Record::Plain(r) => fmt::Display::fmt(r, f),
        }
    }
}

/// Validates a construction document and logs the outcome.
fn construct_values(
    validator: &SchemaValidator,
    document: &Value,
) -> Result<Map<String, Value>, ValidationError> {
    let model = validator.schema().name.as_str();

    match validator.validate_document(document) {
        Ok(values) => {
            log_event_with_fields(Event::RecordConstructed, &[("record", model)]);
            Ok(values)
        }
        Err(err) => {
            let fields = err.fields().collect::<Vec<_>>().join(",");
            log_event_with_fields(
                Event::ConstructionRejected,
                &[("fields", fields.as_str()), ("record", model)],
            );
            Err(err)
        }
    }
}

/// Renders `Name(field=value, ...)` with JSON values.
fn render(f: &mut fmt::Formatter<'_>, name: &str, values: &Map<String, Value>) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, (key, value)) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", key, value)?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flag_selects_record_kind() {
        let doc = json!({"name": "Areeba", "age": 22, "email": "areeba@example.com"});
        let strict = Record::construct(Arc::new(RecordSchema::user()), &doc).unwrap();
        let plain = Record::construct(Arc::new(RecordSchema::user_data()), &doc).unwrap();
        assert!(strict.validates_assignment());
        assert!(!plain.validates_assignment());
    }

    #[test]
    fn test_assign_dispatch() {
        let doc = json!({"name": "Areeba", "age": 22, "email": "areeba@example.com"});
        let mut strict = Record::construct(Arc::new(RecordSchema::user()), &doc).unwrap();
        let mut plain = Record::construct(Arc::new(RecordSchema::user_data()), &doc).unwrap();

        assert!(strict.assign("age", "Twenty Three").is_err());
        assert_eq!(strict.get("age"), Some(&json!(22)));

        assert!(plain.assign("age", "Twenty Three").is_ok());
        assert_eq!(plain.get("age"), Some(&json!("Twenty Three")));
    }

    #[test]
    fn test_display_delegates() {
        let plain = Record::construct(
            Arc::new(RecordSchema::user_data()),
            &json!({"name": "Areeba", "age": 22}),
        )
        .unwrap();
        assert_eq!(plain.to_string(), r#"UserData(name="Areeba", age=22, email=null)"#);
        assert_eq!(plain.schema().name, "UserData");
    }
}
