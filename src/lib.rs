//! Fanlog - leveled structured logging over rotating files
//!
//! A logging facade that routes leveled, field-carrying records across one
//! or more size-rotated files - optionally one file per severity tier -
//! with JSON or text encoding, stdout mirroring, caller attribution, and
//! stack-trace capture above a configurable threshold. A lazily
//! initialized process-wide default backs the package-level functions and
//! the `debugf!`..`fatalf!` macros.
//!
//! ```no_run
//! use fanlog::{field, Config};
//!
//! let mut config = Config::standard();
//! config.dir = "/var/log/myapp".into();
//! fanlog::init(&config).expect("logger init failed");
//!
//! fanlog::info("server started", &[field("port", 8080)]);
//! fanlog::infof!("{} workers online", 4);
//!
//! let worker = fanlog::with_name("worker");
//! worker.warn("queue is backing up", &[field("depth", 170)]);
//! ```

pub mod config;
pub mod context;
pub mod encoder;
pub mod fields;
pub mod level;
pub mod logger;
mod macros;
pub mod record;
pub mod retention;
pub mod writer;

pub use config::{Config, LOG_DIR_ENV};
pub use context::{from_context, Context, LOGGER_KEY};
pub use fields::{coerce_key_values, field, Field};
pub use level::{Level, LevelFilter};
pub use logger::{Log, Logger};

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use serde_json::Value;

/// Process-wide default logger; init-on-first-use, no teardown
static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide default logger from a configuration
///
/// May be called at most once, before any package-level emission; a second
/// call (or a call after the lazy default has already been constructed) is
/// an error.
pub fn init(config: &Config) -> Result<()> {
    let logger = Logger::new(config)?;
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| anyhow!("default logger is already initialized"))
}

/// The process-wide default logger
///
/// Lazily constructed from [`Config::standard`] when [`init`] was never
/// called. If construction fails (the standard directory cannot be
/// opened), emissions are discarded rather than failing the application.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER
        .get_or_init(|| Logger::new(&Config::standard()).unwrap_or_else(|_| Logger::disabled()))
}

/// Emit at debug severity through the default logger
#[track_caller]
pub fn debug(message: &str, fields: &[Field]) {
    default_logger().debug(message, fields);
}

/// Emit at info severity through the default logger
#[track_caller]
pub fn info(message: &str, fields: &[Field]) {
    default_logger().info(message, fields);
}

/// Emit at warn severity through the default logger
#[track_caller]
pub fn warn(message: &str, fields: &[Field]) {
    default_logger().warn(message, fields);
}

/// Emit at error severity through the default logger
#[track_caller]
pub fn error(message: &str, fields: &[Field]) {
    default_logger().error(message, fields);
}

/// Emit at fatal severity through the default logger, then terminate the
/// process
#[track_caller]
pub fn fatal(message: &str, fields: &[Field]) {
    default_logger().fatal(message, fields);
}

/// Derive a logger from the default, bound to a name segment
pub fn with_name(segment: &str) -> Logger {
    default_logger().with_name(segment)
}

/// Derive a logger from the default with additional persistent fields,
/// coerced from alternating key/value arguments
pub fn with_values(pairs: &[Value]) -> Logger {
    default_logger().with_values(pairs)
}
