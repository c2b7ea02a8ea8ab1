//! Structured fields attached to log records

use serde_json::Value;

/// A named, typed value attached to a log record beyond its message text
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name, merged at the top level of JSON records
    pub key: String,
    /// Field value; any JSON-representable value
    pub value: Value,
}

/// Create a field from a key and any JSON-convertible value
pub fn field(key: impl Into<String>, value: impl Into<Value>) -> Field {
    Field {
        key: key.into(),
        value: value.into(),
    }
}

/// Convert alternating key/value arguments into typed fields
///
/// Scans pairs left to right. The scan stops at the first malformed
/// position: a non-string entry in key position, or a trailing key with no
/// value. Whatever was already converted is returned and the remainder is
/// dropped without error. Callers that need hard validation should build
/// [`Field`]s directly.
pub fn coerce_key_values(args: &[Value]) -> Vec<Field> {
    let mut fields = Vec::with_capacity(args.len() / 2);
    let mut i = 0;
    while i < args.len() {
        // A trailing key with no value ends the scan
        if i == args.len() - 1 {
            break;
        }
        let key = match args[i].as_str() {
            Some(k) => k,
            None => break,
        };
        fields.push(field(key, args[i + 1].clone()));
        i += 2;
    }
    fields
}
