//! Port for the structured audit trail.
//!
//! Defines the [`AuditLogger`] trait for recording council decisions
//! (completed analyses, failures, abstentions, bias checks) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures what the
//! council decided and why in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing event-specific
/// fields. The adapter stamps the UTC timestamp when it writes the record.
pub struct AuditEvent {
    /// Event type identifier (e.g., "analysis_completed", "agent_abstained").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging audit events.
///
/// The `log` method is synchronous and non-fallible; a failed write must
/// never fail the analysis it describes.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
