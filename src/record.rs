//! The immutable log record and the embedder-defined component id.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::levels::Severity;

/// Subsystem tag attached to each record.
///
/// The core assigns no meaning to the value; embedders map their own
/// component enums onto it. Equality and hashing are on the integer.
pub type ComponentId = u32;

/// Optional resolver from a component id to a display name, used when a
/// file sink formats a line. A `None` return falls back to the bare
/// integer.
pub type ComponentNamer = Arc<dyn Fn(ComponentId) -> Option<String> + Send + Sync>;

/// One log event.
///
/// Constructed on the producer thread inside `Logger::log`, so the
/// timestamp reflects production order rather than dispatch order. Records
/// move through the pipeline unchanged; sinks observe them by reference.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub component: ComponentId,
    pub message: String,
    pub file: String,
    pub line: u32,
}
