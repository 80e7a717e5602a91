//! aerorecord - strictly validated records
//!
//! Records are checked field by field when constructed. A
//! `ValidatedRecord` also checks every later assignment and keeps its
//! last valid state when one is rejected; a `PlainRecord` accepts any
//! later assignment.

pub mod cli;
pub mod observability;
pub mod record;
pub mod schema;

pub use record::{PlainRecord, Record, ValidatedRecord};
pub use schema::{RecordSchema, ValidationError};
