//! Logger construction and the emission path
//!
//! A [`Logger`] fans records out across one or more sinks, each pairing a
//! severity filter with an encoding and a rotating file writer. Derived
//! loggers (named, field-bound, caller-adjusted) share the sinks through an
//! `Arc` core and never mutate their parent.

use std::backtrace::Backtrace;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::path::Path;
use std::process;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;

use crate::config::Config;
use crate::context::Context;
use crate::encoder::Encoding;
use crate::fields::{coerce_key_values, Field};
use crate::level::{Level, LevelFilter};
use crate::record::{short_caller, Record};
use crate::retention;
use crate::writer::{open_sink_writer, SinkWriter};

/// Capability set of a logger instance
///
/// [`Logger`] is the one concrete implementation; the trait is the seam for
/// callers that want to accept any logger. Emission entry points are
/// `#[track_caller]` so reported locations name the call site, not the
/// facade.
pub trait Log: Send + Sync {
    /// Emit a record at the given severity
    #[track_caller]
    fn log(&self, level: Level, message: &str, fields: &[Field]);

    /// Emit at debug severity
    #[track_caller]
    fn debug(&self, message: &str, fields: &[Field]);

    /// Emit at info severity
    #[track_caller]
    fn info(&self, message: &str, fields: &[Field]);

    /// Emit at warn severity
    #[track_caller]
    fn warn(&self, message: &str, fields: &[Field]);

    /// Emit at error severity
    #[track_caller]
    fn error(&self, message: &str, fields: &[Field]);

    /// Emit at fatal severity, then terminate the process
    #[track_caller]
    fn fatal(&self, message: &str, fields: &[Field]);

    /// Emit a formatted message at debug severity
    #[track_caller]
    fn debugf(&self, args: fmt::Arguments<'_>);

    /// Emit a formatted message at info severity
    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>);

    /// Emit a formatted message at warn severity
    #[track_caller]
    fn warnf(&self, args: fmt::Arguments<'_>);

    /// Emit a formatted message at error severity
    #[track_caller]
    fn errorf(&self, args: fmt::Arguments<'_>);

    /// Emit a formatted message at fatal severity, then terminate
    #[track_caller]
    fn fatalf(&self, args: fmt::Arguments<'_>);

    /// Derive a logger bound to an additional name segment
    fn with_name(&self, segment: &str) -> Box<dyn Log>;

    /// Derive a logger with additional persistent fields, coerced from
    /// alternating key/value arguments
    fn with_values(&self, pairs: &[Value]) -> Box<dyn Log>;

    /// Derive a logger for emission sites wrapped in extra indirection
    fn with_caller_skip(&self, skip: usize) -> Box<dyn Log>;

    /// Resolve the logger attached to an ambient context, falling back to
    /// the process-wide default
    fn with_context(&self, ctx: &Context) -> Box<dyn Log>;
}

/// One output destination: severity filter + encoding + rotating writer
struct Sink {
    filter: LevelFilter,
    encoding: Encoding,
    writer: Mutex<SinkWriter>,
}

impl Sink {
    fn open(config: &Config, dir: &Path, file_name: &str, filter: LevelFilter) -> Result<Sink> {
        let writer = open_sink_writer(config, dir, file_name)?;
        if config.max_age > 0 {
            // Best effort; a failed sweep must not block logger construction
            let _ = retention::cleanup_rotated_backups(dir, file_name, config.max_age);
        }
        let encoding = if config.json_encode {
            Encoding::Json
        } else {
            Encoding::Text
        };
        Ok(Sink {
            filter,
            encoding,
            writer: Mutex::new(writer),
        })
    }

    fn write(&self, record: &Record<'_>) {
        let bytes = self.encoding.encode(record);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(&bytes);
        }
    }
}

/// State shared by a logger and everything derived from it
struct LoggerCore {
    sinks: Vec<Sink>,
    stacktrace_threshold: Level,
}

/// Leveled, field-carrying logger over a set of rotating sinks
///
/// Cloning is cheap (the sink set is shared); derivation methods return new
/// instances and leave the parent untouched.
#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
    name: String,
    fields: Vec<Field>,
    caller_skip: usize,
}

impl Logger {
    /// Build a logger from a configuration
    ///
    /// With `filePerLevel` set, four sinks are opened: debug.log, info.log
    /// and warn.log each take exactly their tier, error.log takes error and
    /// anything more urgent. Otherwise a single sink filtered at the
    /// configured minimum severity writes the configured file. Rotated
    /// backups past `maxAge` days are swept at construction.
    pub fn new(config: &Config) -> Result<Logger> {
        let dir = config.resolve_dir();
        let mut sinks = Vec::new();
        if config.file_per_level {
            for (file_name, filter) in [
                ("debug.log", LevelFilter::Exactly(Level::Debug)),
                ("info.log", LevelFilter::Exactly(Level::Info)),
                ("warn.log", LevelFilter::Exactly(Level::Warn)),
                ("error.log", LevelFilter::AtLeast(Level::Error)),
            ] {
                sinks.push(Sink::open(config, &dir, file_name, filter)?);
            }
        } else {
            sinks.push(Sink::open(
                config,
                &dir,
                config.log_file(),
                LevelFilter::AtLeast(config.min_level()),
            )?);
        }

        Ok(Logger {
            core: Arc::new(LoggerCore {
                sinks,
                stacktrace_threshold: config.stacktrace_threshold(),
            }),
            name: String::new(),
            fields: Vec::new(),
            caller_skip: 0,
        })
    }

    /// A logger with no sinks
    ///
    /// Used as the last-resort fallback when the lazy process-wide default
    /// cannot open its files; emissions are accepted and discarded.
    pub fn disabled() -> Logger {
        Logger {
            core: Arc::new(LoggerCore {
                sinks: Vec::new(),
                stacktrace_threshold: Level::Fatal,
            }),
            name: String::new(),
            fields: Vec::new(),
            caller_skip: 0,
        }
    }

    /// Derive a logger bound to an additional name segment
    ///
    /// Segments join with dots: `with_name("store")` on a logger named
    /// "svc" yields "svc.store". The parent is unchanged.
    pub fn with_name(&self, segment: &str) -> Logger {
        let name = if self.name.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", self.name, segment)
        };
        Logger {
            name,
            ..self.clone()
        }
    }

    /// Derive a logger with additional persistent fields
    ///
    /// `pairs` is an alternating key/value sequence, coerced leniently (see
    /// [`coerce_key_values`]); the resulting fields attach to every future
    /// emission of the child. The parent is unchanged.
    pub fn with_values(&self, pairs: &[Value]) -> Logger {
        let mut fields = self.fields.clone();
        fields.extend(coerce_key_values(pairs));
        Logger {
            fields,
            ..self.clone()
        }
    }

    /// Derive a logger for emission sites wrapped in extra indirection
    ///
    /// Caller attribution flows through any wrapper annotated with
    /// `#[track_caller]`, which is the supported way to keep locations
    /// accurate. A nonzero skip marks wrappers that cannot annotate; the
    /// derived logger suppresses the caller field rather than report a
    /// location inside the wrapper.
    pub fn with_caller_skip(&self, skip: usize) -> Logger {
        Logger {
            caller_skip: skip,
            ..self.clone()
        }
    }

    /// Resolve the logger attached to `ctx`, falling back to the
    /// process-wide default
    pub fn with_context(&self, ctx: &Context) -> Logger {
        crate::context::from_context(ctx)
    }

    /// Emit a record at the given severity
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        self.emit(level, message.to_string(), fields);
    }

    /// Emit at debug severity
    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Debug, message.to_string(), fields);
    }

    /// Emit at info severity
    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Info, message.to_string(), fields);
    }

    /// Emit at warn severity
    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Warn, message.to_string(), fields);
    }

    /// Emit at error severity
    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Error, message.to_string(), fields);
    }

    /// Emit at fatal severity, then terminate the process with exit code 1
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Fatal, message.to_string(), fields);
    }

    /// Emit a formatted message at debug severity
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args.to_string(), &[]);
    }

    /// Emit a formatted message at info severity
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args.to_string(), &[]);
    }

    /// Emit a formatted message at warn severity
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args.to_string(), &[]);
    }

    /// Emit a formatted message at error severity
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args.to_string(), &[]);
    }

    /// Emit a formatted message at fatal severity, then terminate
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Fatal, args.to_string(), &[]);
    }

    #[track_caller]
    fn emit(&self, level: Level, message: String, extra: &[Field]) {
        let caller = if self.caller_skip == 0 {
            Some(short_caller(Location::caller()))
        } else {
            None
        };
        let stacktrace =
            if !self.core.sinks.is_empty() && level >= self.core.stacktrace_threshold {
                Some(Backtrace::force_capture().to_string())
            } else {
                None
            };

        let record = Record {
            timestamp: Utc::now(),
            level,
            logger: &self.name,
            caller,
            message,
            stacktrace,
            bound: &self.fields,
            extra,
        };

        for sink in &self.core.sinks {
            if sink.filter.enabled(level) {
                sink.write(&record);
            }
        }

        if level == Level::Fatal {
            process::exit(1);
        }
    }
}

impl Log for Logger {
    fn log(&self, level: Level, message: &str, fields: &[Field]) {
        Logger::log(self, level, message, fields);
    }

    fn debug(&self, message: &str, fields: &[Field]) {
        Logger::debug(self, message, fields);
    }

    fn info(&self, message: &str, fields: &[Field]) {
        Logger::info(self, message, fields);
    }

    fn warn(&self, message: &str, fields: &[Field]) {
        Logger::warn(self, message, fields);
    }

    fn error(&self, message: &str, fields: &[Field]) {
        Logger::error(self, message, fields);
    }

    fn fatal(&self, message: &str, fields: &[Field]) {
        Logger::fatal(self, message, fields);
    }

    fn debugf(&self, args: fmt::Arguments<'_>) {
        Logger::debugf(self, args);
    }

    fn infof(&self, args: fmt::Arguments<'_>) {
        Logger::infof(self, args);
    }

    fn warnf(&self, args: fmt::Arguments<'_>) {
        Logger::warnf(self, args);
    }

    fn errorf(&self, args: fmt::Arguments<'_>) {
        Logger::errorf(self, args);
    }

    fn fatalf(&self, args: fmt::Arguments<'_>) {
        Logger::fatalf(self, args);
    }

    fn with_name(&self, segment: &str) -> Box<dyn Log> {
        Box::new(Logger::with_name(self, segment))
    }

    fn with_values(&self, pairs: &[Value]) -> Box<dyn Log> {
        Box::new(Logger::with_values(self, pairs))
    }

    fn with_caller_skip(&self, skip: usize) -> Box<dyn Log> {
        Box::new(Logger::with_caller_skip(self, skip))
    }

    fn with_context(&self, ctx: &Context) -> Box<dyn Log> {
        Box::new(Logger::with_context(self, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn single_file_config(dir: &Path) -> Config {
        Config {
            dir: dir.to_path_buf(),
            file: "test.log".to_string(),
            level: "info".to_string(),
            json_encode: true,
            ..Config::default()
        }
    }

    fn split_config(dir: &Path) -> Config {
        Config {
            dir: dir.to_path_buf(),
            level: "debug".to_string(),
            json_encode: true,
            file_per_level: true,
            ..Config::default()
        }
    }

    fn read_records(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_single_file_filters_below_minimum() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&single_file_config(temp_dir.path())).unwrap();

        logger.debug("too quiet", &[]);
        logger.info("kept info", &[]);
        logger.error("kept error", &[]);

        let records = read_records(&temp_dir.path().join("test.log"));
        let messages: Vec<&str> = records
            .iter()
            .map(|r| r["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages, vec!["kept info", "kept error"]);
    }

    #[test]
    fn test_split_mode_routes_each_tier_to_its_file() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&split_config(temp_dir.path())).unwrap();

        logger.debug("debug record", &[]);
        logger.info("info record", &[]);
        logger.warn("warn record", &[]);
        logger.error("error record", &[]);

        for (file, expected) in [
            ("debug.log", "debug record"),
            ("info.log", "info record"),
            ("warn.log", "warn record"),
            ("error.log", "error record"),
        ] {
            let records = read_records(&temp_dir.path().join(file));
            assert_eq!(records.len(), 1, "{file} should hold exactly one record");
            assert_eq!(records[0]["message"], expected);
        }
    }

    #[test]
    fn test_json_record_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&single_file_config(temp_dir.path()))
            .unwrap()
            .with_name("store");

        logger.info("saved", &[crate::fields::field("rows", 12)]);

        let records = read_records(&temp_dir.path().join("test.log"));
        let object = records[0].as_object().unwrap();

        // Fixed keys plus the attached field, nothing else
        assert_eq!(object.len(), 6);
        assert_eq!(object["level"], "info");
        assert_eq!(object["logger"], "store");
        assert_eq!(object["message"], "saved");
        assert_eq!(object["rows"], 12);
        assert!(object["caller"].as_str().unwrap().contains("logger.rs"));
        chrono::DateTime::parse_from_rfc3339(object["timestamp"].as_str().unwrap()).unwrap();
    }

    #[test]
    fn test_children_do_not_mutate_parent() {
        let temp_dir = TempDir::new().unwrap();
        let parent = Logger::new(&single_file_config(temp_dir.path())).unwrap();

        let _named = parent.with_name("child");
        let _bound = parent.with_values(&[json!("request"), json!("abc-1")]);

        parent.info("from parent", &[]);

        let records = read_records(&temp_dir.path().join("test.log"));
        let object = records[0].as_object().unwrap();
        assert!(!object.contains_key("logger"));
        assert!(!object.contains_key("request"));
    }

    #[test]
    fn test_bound_fields_attach_to_child_emissions() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&single_file_config(temp_dir.path()))
            .unwrap()
            .with_values(&[json!("a"), json!(1), json!("b")]);

        logger.info("bound", &[]);

        let records = read_records(&temp_dir.path().join("test.log"));
        let object = records[0].as_object().unwrap();
        // Lenient coercion kept "a" and dropped the trailing key
        assert_eq!(object["a"], 1);
        assert!(!object.contains_key("b"));
    }

    #[test]
    fn test_name_segments_join_with_dots() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&single_file_config(temp_dir.path()))
            .unwrap()
            .with_name("svc")
            .with_name("store");

        logger.info("nested", &[]);

        let records = read_records(&temp_dir.path().join("test.log"));
        assert_eq!(records[0]["logger"], "svc.store");
    }

    #[test]
    fn test_unrecognized_level_disables_filtering() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            level: "verbose".to_string(),
            ..single_file_config(temp_dir.path())
        };
        let logger = Logger::new(&config).unwrap();

        logger.debug("still here", &[]);

        let records = read_records(&temp_dir.path().join("test.log"));
        assert_eq!(records[0]["message"], "still here");
    }

    #[test]
    fn test_caller_skip_suppresses_location() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&single_file_config(temp_dir.path())).unwrap();

        logger.info("attributed", &[]);
        logger.with_caller_skip(1).info("wrapped", &[]);

        let records = read_records(&temp_dir.path().join("test.log"));
        assert!(records[0].as_object().unwrap().contains_key("caller"));
        assert!(!records[1].as_object().unwrap().contains_key("caller"));
    }

    #[test]
    fn test_error_records_carry_stacktrace() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&single_file_config(temp_dir.path())).unwrap();

        logger.info("calm", &[]);
        logger.error("boom", &[]);

        let records = read_records(&temp_dir.path().join("test.log"));
        assert!(!records[0].as_object().unwrap().contains_key("stacktrace"));
        assert!(records[1].as_object().unwrap().contains_key("stacktrace"));
    }

    #[test]
    fn test_formatted_emission() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&single_file_config(temp_dir.path())).unwrap();

        logger.infof(format_args!("retry {} of {}", 2, 5));

        let records = read_records(&temp_dir.path().join("test.log"));
        assert_eq!(records[0]["message"], "retry 2 of 5");
    }

    #[test]
    fn test_text_mode_writes_readable_lines() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            json_encode: false,
            ..single_file_config(temp_dir.path())
        };
        let logger = Logger::new(&config).unwrap();

        logger.warn("disk nearly full", &[crate::fields::field("free_mb", 12)]);

        let content = fs::read_to_string(temp_dir.path().join("test.log")).unwrap();
        assert!(content.contains(" WARN "));
        assert!(content.contains("disk nearly full"));
        assert!(content.contains("free_mb=12"));
    }

    #[test]
    fn test_trait_object_emission() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(&single_file_config(temp_dir.path())).unwrap();
        let dynamic: &dyn Log = &logger;

        dynamic.info("through the trait", &[]);
        let derived = dynamic.with_name("dyn");
        derived.info("derived through the trait", &[]);

        let records = read_records(&temp_dir.path().join("test.log"));
        assert_eq!(records[0]["message"], "through the trait");
        assert_eq!(records[1]["logger"], "dyn");
    }

    #[test]
    fn test_disabled_logger_accepts_emissions() {
        let logger = Logger::disabled();
        logger.info("nowhere", &[]);
        logger.error("still nowhere", &[]);
    }
}
