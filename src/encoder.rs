//! Record serialization for file and stdout sinks

use chrono::SecondsFormat;
use serde_json::{Map, Value};

use crate::record::Record;

/// How a sink serializes records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// One JSON object per line with fixed keys plus attached fields
    Json,
    /// Human-readable single-line format
    Text,
}

impl Encoding {
    /// Serialize a record, newline-terminated
    pub fn encode(&self, record: &Record<'_>) -> Vec<u8> {
        match self {
            Encoding::Json => encode_json(record),
            Encoding::Text => encode_text(record),
        }
    }
}

fn timestamp(record: &Record<'_>) -> String {
    record
        .timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fixed keys: `timestamp`, `level`, `logger` (named loggers only),
/// `caller` (when attribution is active), `message`, `stacktrace` (when
/// captured). Attached fields are merged at the top level and can shadow
/// the fixed keys.
fn encode_json(record: &Record<'_>) -> Vec<u8> {
    let mut map = Map::new();
    map.insert("timestamp".to_string(), Value::String(timestamp(record)));
    map.insert(
        "level".to_string(),
        Value::String(record.level.as_str().to_string()),
    );
    if !record.logger.is_empty() {
        map.insert("logger".to_string(), Value::String(record.logger.to_string()));
    }
    if let Some(caller) = &record.caller {
        map.insert("caller".to_string(), Value::String(caller.clone()));
    }
    map.insert("message".to_string(), Value::String(record.message.clone()));
    if let Some(stacktrace) = &record.stacktrace {
        map.insert("stacktrace".to_string(), Value::String(stacktrace.clone()));
    }
    for field in record.fields() {
        map.insert(field.key.clone(), field.value.clone());
    }

    match serde_json::to_vec(&Value::Object(map)) {
        Ok(mut bytes) => {
            bytes.push(b'\n');
            bytes
        }
        Err(_) => Vec::new(),
    }
}

/// `<timestamp> <LEVEL> [name] [caller]: message k=v ...`, with the
/// captured stack appended on following lines when present
fn encode_text(record: &Record<'_>) -> Vec<u8> {
    let mut line = format!(
        "{} {:>5}",
        timestamp(record),
        record.level.as_str().to_uppercase()
    );
    if !record.logger.is_empty() {
        line.push(' ');
        line.push_str(record.logger);
    }
    if let Some(caller) = &record.caller {
        line.push(' ');
        line.push_str(caller);
    }
    line.push_str(": ");
    line.push_str(&record.message);
    for field in record.fields() {
        line.push(' ');
        line.push_str(&field.key);
        line.push('=');
        match serde_json::to_string(&field.value) {
            Ok(rendered) => line.push_str(&rendered),
            Err(_) => line.push_str("<unencodable>"),
        }
    }
    line.push('\n');
    if let Some(stacktrace) = &record.stacktrace {
        line.push_str(stacktrace);
        if !stacktrace.ends_with('\n') {
            line.push('\n');
        }
    }
    line.into_bytes()
}
