//! Observability for record validation
//!
//! Structured JSON logging of typed lifecycle events. Logging is
//! read-only: it never changes the outcome of a validation.
//!
//! # Usage
//!
//! ```ignore
//! use aerorecord::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event_with_fields(Event::RecordConstructed, &[("record", "User")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
