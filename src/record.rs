//! In-flight log records

use std::panic::Location;

use chrono::{DateTime, Utc};

use crate::fields::Field;
use crate::level::Level;

/// A single log record on its way to the sinks
///
/// Field slices are borrowed rather than collected: `bound` holds the
/// logger's persistent fields, `extra` the per-call ones. Encoders emit
/// them in that order.
#[derive(Debug)]
pub struct Record<'a> {
    /// When the record was emitted
    pub timestamp: DateTime<Utc>,
    /// Record severity
    pub level: Level,
    /// Logger name, empty for the unnamed root
    pub logger: &'a str,
    /// Short caller location (`dir/file.rs:line`), if attribution is active
    pub caller: Option<String>,
    /// Message text
    pub message: String,
    /// Captured call stack for records at or above the configured threshold
    pub stacktrace: Option<String>,
    /// Fields bound to the emitting logger
    pub bound: &'a [Field],
    /// Fields passed with this emission
    pub extra: &'a [Field],
}

impl Record<'_> {
    /// Iterate bound fields followed by per-call fields
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.bound.iter().chain(self.extra.iter())
    }
}

/// Shorten a caller location to its last two path components
///
/// Mirrors the usual short-caller rendering: `src/worker.rs:42` rather than
/// the full absolute path.
pub(crate) fn short_caller(location: &Location<'_>) -> String {
    let file = location.file().replace('\\', "/");
    let mut parts: Vec<&str> = file.rsplit('/').take(2).collect();
    parts.reverse();
    format!("{}:{}", parts.join("/"), location.line())
}
