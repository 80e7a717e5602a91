//! Observable record lifecycle events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Schema file loaded and registered
    SchemaLoaded,
    /// Record construction passed validation
    RecordConstructed,
    /// Record construction rejected
    ConstructionRejected,
    /// Validated assignment applied
    AssignmentApplied,
    /// Validated assignment rejected, record unchanged
    AssignmentRejected,
    /// Plain record field set without validation
    UncheckedAssignment,
    /// Plain record attribute outside the schema set
    UndeclaredAttributeSet,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::RecordConstructed => "RECORD_CONSTRUCTED",
            Event::ConstructionRejected => "CONSTRUCTION_REJECTED",
            Event::AssignmentApplied => "ASSIGNMENT_APPLIED",
            Event::AssignmentRejected => "ASSIGNMENT_REJECTED",
            Event::UncheckedAssignment => "UNCHECKED_ASSIGNMENT",
            Event::UndeclaredAttributeSet => "UNDECLARED_ATTRIBUTE_SET",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaLoaded | Event::ConstructionRejected | Event::AssignmentRejected => {
                Severity::Info
            }
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_unique() {
        let all = [
            Event::SchemaLoaded,
            Event::RecordConstructed,
            Event::ConstructionRejected,
            Event::AssignmentApplied,
            Event::AssignmentRejected,
            Event::UncheckedAssignment,
            Event::UndeclaredAttributeSet,
        ];
        let mut names: Vec<_> = all.iter().map(Event::as_str).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_rejections_logged_above_trace() {
        assert_eq!(Event::AssignmentRejected.severity(), Severity::Info);
        assert_eq!(Event::AssignmentApplied.severity(), Severity::Trace);
    }
}
