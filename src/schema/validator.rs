//! Per-field validators and the schema validator that applies them
//!
//! Each field type maps to one validator function. A validator either
//! returns the (possibly coerced) value to store, or the reason the
//! value was rejected. Construction and assignment go through the same
//! functions.
//!
//! Coercion rules:
//! - int accepts integers, integral floats and trimmed numeric strings
//! - string and email accept only JSON strings
//! - null is accepted only by optional fields

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::{Map, Value};

use super::errors::{ErrorKind, FieldError, FieldFailure, ValidationError};
use super::types::{FieldType, RecordSchema};

/// Validates and coerces a single candidate value
pub type FieldValidator = fn(&Value) -> Result<Value, FieldFailure>;

/// Returns the validator for a field type
pub fn validator_for(field_type: FieldType) -> FieldValidator {
    match field_type {
        FieldType::String => validate_string,
        FieldType::Int => validate_int,
        FieldType::Email => validate_email,
    }
}

/// Integer fields: integers, integral floats, and strings that parse as i64.
///
/// Every path accepts exactly the signed 64-bit range; anything outside it
/// fails with `int_parsing_size` instead of being clamped.
pub fn validate_int(value: &Value) -> Result<Value, FieldFailure> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::from(i));
            }
            match n.as_f64() {
                Some(f) if n.is_u64() || f.fract() == 0.0 => float_to_i64(f).map(Value::from),
                _ => Err(FieldFailure::new(
                    ErrorKind::IntFromFloat,
                    "input should be a valid integer, got a number with a fractional part",
                )),
            }
        }
        Value::String(s) => parse_int_str(s).map(Value::from),
        _ => Err(FieldFailure::new(
            ErrorKind::IntType,
            "input should be a valid integer",
        )),
    }
}

// 2^63 is exact as f64 while i64::MAX is not, so the upper bound is exclusive.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn float_to_i64(f: f64) -> Result<i64, FieldFailure> {
    if f >= -I64_UPPER_BOUND && f < I64_UPPER_BOUND {
        Ok(f as i64)
    } else {
        Err(FieldFailure::new(
            ErrorKind::IntParsingSize,
            "input should be a valid integer, exceeded maximum size",
        ))
    }
}

fn parse_int_str(s: &str) -> Result<i64, FieldFailure> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldFailure::new(
            ErrorKind::IntParsing,
            "input should be a valid integer, unable to parse string as an integer",
        ));
    }
    trimmed.parse::<i64>().map_err(|_| {
        FieldFailure::new(
            ErrorKind::IntParsingSize,
            "unable to parse input string as an integer, exceeded maximum size",
        )
    })
}

/// String fields: JSON strings only, stored verbatim.
pub fn validate_string(value: &Value) -> Result<Value, FieldFailure> {
    match value {
        Value::String(_) => Ok(value.clone()),
        _ => Err(FieldFailure::new(
            ErrorKind::StringType,
            "input should be a valid string",
        )),
    }
}

/// Email fields: a string with a non-empty local part, one `@`, and a
/// dotted domain.
pub fn validate_email(value: &Value) -> Result<Value, FieldFailure> {
    let s = match value {
        Value::String(s) => s,
        _ => {
            return Err(FieldFailure::new(
                ErrorKind::StringType,
                "input should be a valid string",
            ))
        }
    };

    let reason = match s.matches('@').count() {
        0 => Some("an email address must have an @-sign"),
        1 => {
            let (local, domain) = s.split_once('@').unwrap_or_default();
            if local.is_empty() {
                Some("there must be something before the @-sign")
            } else if !email_shape().is_match(s) {
                if domain.contains('.') {
                    Some("the domain name is not valid")
                } else {
                    Some("the domain name must contain a period")
                }
            } else {
                None
            }
        }
        _ => Some("an email address must have exactly one @-sign"),
    };

    match reason {
        None => Ok(value.clone()),
        Some(reason) => Err(FieldFailure::new(
            ErrorKind::ValueError,
            format!("value is not a valid email address: {}", reason),
        )),
    }
}

fn email_shape() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
        )
        .expect("email pattern is a valid regex")
    })
}

#[derive(Clone, Copy)]
struct FieldRule {
    validator: FieldValidator,
    optional: bool,
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

impl FieldRule {
    fn check(&self, value: &Value) -> Result<Value, FieldFailure> {
        if self.optional && value.is_null() {
            return Ok(Value::Null);
        }
        (self.validator)(value)
    }
}

/// Applies a record schema to candidate field values.
///
/// Holds one validator per declared field, keyed by field name.
/// Validation never mutates its input and is deterministic.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Arc<RecordSchema>,
    rules: HashMap<String, FieldRule>,
}

impl SchemaValidator {
    /// Builds the validator table for a schema.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let rules = schema
            .fields
            .iter()
            .map(|f| {
                let rule = FieldRule {
                    validator: validator_for(f.field_type),
                    optional: f.optional,
                };
                (f.name.clone(), rule)
            })
            .collect();

        Self { schema, rules }
    }

    /// The schema this validator enforces
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Validates a full set of candidate values for construction.
    ///
    /// Every declared field is checked; all failures are reported
    /// together in declaration order. Omitted optional fields default to
    /// null. Undeclared input keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every rejected field.
    pub fn validate_fields(&self, input: &Map<String, Value>) -> Result<Map<String, Value>, ValidationError> {
        let mut values = Map::new();
        let mut errors = Vec::new();

        for def in &self.schema.fields {
            let rule = &self.rules[&def.name];
            match input.get(&def.name) {
                Some(candidate) => match rule.check(candidate) {
                    Ok(v) => {
                        values.insert(def.name.clone(), v);
                    }
                    Err(failure) => errors.push(failure.at(&def.name, candidate.clone())),
                },
                None if rule.optional => {
                    values.insert(def.name.clone(), Value::Null);
                }
                None => errors.push(FieldError::missing(&def.name)),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(ValidationError::new(&self.schema.name, errors))
        }
    }

    /// Validates a JSON document for construction.
    ///
    /// # Errors
    ///
    /// A non-object document is rejected as a whole, reported on the
    /// pseudo-field `$root`.
    pub fn validate_document(&self, document: &Value) -> Result<Map<String, Value>, ValidationError> {
        match document.as_object() {
            Some(obj) => self.validate_fields(obj),
            None => Err(ValidationError::single(
                &self.schema.name,
                FieldFailure::new(ErrorKind::ModelType, "input should be a valid dictionary")
                    .at("$root", document.clone()),
            )),
        }
    }

    /// Validates one candidate value for a declared field.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` with kind `no_such_attribute` if the
    /// field is not declared, or the validator's failure otherwise.
    pub fn validate_field(&self, field: &str, value: &Value) -> Result<Value, ValidationError> {
        let rule = self.rules.get(field).ok_or_else(|| {
            ValidationError::single(
                &self.schema.name,
                FieldError::no_such_attribute(field, value.clone()),
            )
        })?;

        rule.check(value).map_err(|failure| {
            ValidationError::single(&self.schema.name, failure.at(field, value.clone()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_validator() -> SchemaValidator {
        SchemaValidator::new(Arc::new(RecordSchema::user()))
    }

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_int_accepts_integers_and_numeric_strings() {
        assert_eq!(validate_int(&json!(22)).unwrap(), json!(22));
        assert_eq!(validate_int(&json!("22")).unwrap(), json!(22));
        assert_eq!(validate_int(&json!("  -7 ")).unwrap(), json!(-7));
        assert_eq!(validate_int(&json!("+5")).unwrap(), json!(5));
        assert_eq!(validate_int(&json!(22.0)).unwrap(), json!(22));
    }

    #[test]
    fn test_int_rejects_words() {
        let failure = validate_int(&json!("Twenty Two")).unwrap_err();
        assert_eq!(failure.kind, ErrorKind::IntParsing);
        assert_eq!(
            failure.message,
            "input should be a valid integer, unable to parse string as an integer"
        );
        assert_eq!(validate_int(&json!("")).unwrap_err().kind, ErrorKind::IntParsing);
        assert_eq!(validate_int(&json!("2.5")).unwrap_err().kind, ErrorKind::IntParsing);
    }

    #[test]
    fn test_int_rejects_fractions_bools_and_overflow() {
        assert_eq!(validate_int(&json!(22.5)).unwrap_err().kind, ErrorKind::IntFromFloat);
        assert_eq!(validate_int(&json!(true)).unwrap_err().kind, ErrorKind::IntType);
        assert_eq!(validate_int(&Value::Null).unwrap_err().kind, ErrorKind::IntType);
        assert_eq!(
            validate_int(&json!("99999999999999999999")).unwrap_err().kind,
            ErrorKind::IntParsingSize
        );
    }

    #[test]
    fn test_int_range_is_signed_64_bit_on_every_path() {
        assert_eq!(validate_int(&json!(i64::MAX)).unwrap(), json!(i64::MAX));
        assert_eq!(validate_int(&json!(i64::MIN)).unwrap(), json!(i64::MIN));

        let too_big = u64::MAX;
        assert_eq!(validate_int(&json!(too_big)).unwrap_err().kind, ErrorKind::IntParsingSize);
        assert_eq!(
            validate_int(&json!(too_big.to_string())).unwrap_err().kind,
            ErrorKind::IntParsingSize
        );
        assert_eq!(
            validate_int(&json!((i64::MAX as u64) + 1)).unwrap_err().kind,
            ErrorKind::IntParsingSize
        );
    }

    #[test]
    fn test_int_float_edges_never_clamp() {
        assert_eq!(
            validate_int(&json!(9_223_372_036_854_775_808.0)).unwrap_err().kind,
            ErrorKind::IntParsingSize
        );
        assert_eq!(
            validate_int(&json!(-9_223_372_036_854_775_808.0)).unwrap(),
            json!(i64::MIN)
        );
        assert_eq!(
            validate_int(&json!(-9_223_372_036_854_777_856.0)).unwrap_err().kind,
            ErrorKind::IntParsingSize
        );
        assert_eq!(
            validate_int(&json!(9_223_372_036_854_774_784.0)).unwrap(),
            json!(9_223_372_036_854_774_784_i64)
        );
    }

    #[test]
    fn test_string_never_coerces() {
        assert_eq!(validate_string(&json!("Areeba")).unwrap(), json!("Areeba"));
        assert_eq!(validate_string(&json!(42)).unwrap_err().kind, ErrorKind::StringType);
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email(&json!("areeba@example.com")).is_ok());
        assert!(validate_email(&json!("a.b+tag@mail.example.org")).is_ok());

        for bad in ["areeba", "@example.com", "a@@example.com", "a@example", "a@.com", "a b@example.com"] {
            let failure = validate_email(&json!(bad)).unwrap_err();
            assert_eq!(failure.kind, ErrorKind::ValueError, "{}", bad);
            assert!(failure.message.starts_with("value is not a valid email address"));
        }
        assert_eq!(validate_email(&json!(1)).unwrap_err().kind, ErrorKind::StringType);
    }

    #[test]
    fn test_validate_fields_collects_all_errors_in_order() {
        let v = user_validator();
        let err = v
            .validate_fields(&obj(json!({"email": "nope", "age": "Twenty Two"})))
            .unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["name", "age", "email"]);
        assert_eq!(err.for_field("name").unwrap().kind, ErrorKind::Missing);
        assert_eq!(err.model(), "User");
    }

    #[test]
    fn test_validate_fields_orders_and_coerces() {
        let v = user_validator();
        let values = v
            .validate_fields(&obj(json!({
                "email": "areeba@example.com",
                "age": "22",
                "name": "Areeba",
                "ignored": true
            })))
            .unwrap();
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["name", "age", "email"]);
        assert_eq!(values["age"], json!(22));
    }

    #[test]
    fn test_optional_defaults_to_null() {
        let v = SchemaValidator::new(Arc::new(RecordSchema::user_data()));
        let values = v.validate_fields(&obj(json!({"name": "Areeba", "age": 22}))).unwrap();
        assert_eq!(values["email"], Value::Null);
        assert_eq!(v.validate_field("email", &Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_validate_field_unknown() {
        let err = user_validator().validate_field("nickname", &json!("Ari")).unwrap_err();
        assert_eq!(err.errors()[0].kind, ErrorKind::NoSuchAttribute);
    }

    #[test]
    fn test_validate_document_requires_object() {
        let err = user_validator().validate_document(&json!([1, 2])).unwrap_err();
        assert_eq!(err.errors()[0].field, "$root");
        assert_eq!(err.errors()[0].kind, ErrorKind::ModelType);
    }
}
