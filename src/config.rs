//! Logger configuration

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Environment variable supplying the log directory when `dir` is unset
pub const LOG_DIR_ENV: &str = "FANLOG_DIR";

/// File name used when `file` is unset in single-file mode
const DEFAULT_LOG_FILE: &str = "app.log";

/// Logger configuration
///
/// All fields are defaulted, so partial documents deserialize; absent
/// options take their zero values, and the accessors below resolve those
/// to working settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory for log files; empty means `$FANLOG_DIR`, falling back to
    /// the current directory
    pub dir: PathBuf,

    /// Log file name in single-file mode (default: app.log). Ignored when
    /// `filePerLevel` is set
    pub file: String,

    /// Maximum size in megabytes of a log file before it gets rotated
    /// (default: 100)
    pub max_size: u64,

    /// Maximum number of rotated files to retain; 0 retains all
    pub max_backups: u64,

    /// Maximum number of days to retain rotated files; 0 retains all
    pub max_age: u64,

    /// Gzip-compress rotated-out files
    pub compress: bool,

    /// Minimum severity to emit, e.g. "info". Case-insensitive; an
    /// unrecognized value means debug (no filtering)
    pub level: String,

    /// Emit JSON records instead of human-readable text lines
    pub json_encode: bool,

    /// Severity at or above which records carry a stack trace
    /// (default: "error")
    pub stacktrace_level: String,

    /// Mirror every record to standard output as well
    pub stdout: bool,

    /// Write each severity tier to its own file (debug.log, info.log,
    /// warn.log, error.log) instead of one shared file
    pub file_per_level: bool,
}

impl Config {
    /// Built-in configuration used for the lazily constructed process-wide
    /// logger: JSON records, split by severity, everything from debug up,
    /// stack traces at error
    pub fn standard() -> Self {
        Config {
            file: DEFAULT_LOG_FILE.to_string(),
            level: "debug".to_string(),
            json_encode: true,
            stacktrace_level: "error".to_string(),
            file_per_level: true,
            ..Config::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Minimum severity this configuration emits
    pub fn min_level(&self) -> Level {
        Level::parse(&self.level)
    }

    /// Severity at or above which records carry a stack trace
    pub fn stacktrace_threshold(&self) -> Level {
        if self.stacktrace_level.is_empty() {
            Level::Error
        } else {
            Level::parse(&self.stacktrace_level)
        }
    }

    /// Resolve the output directory: the configured one, else
    /// `$FANLOG_DIR`, else the current directory
    pub fn resolve_dir(&self) -> PathBuf {
        if !self.dir.as_os_str().is_empty() {
            return self.dir.clone();
        }
        if let Ok(dir) = env::var(LOG_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    /// Log file name for single-file mode
    pub fn log_file(&self) -> &str {
        if self.file.is_empty() {
            DEFAULT_LOG_FILE
        } else {
            &self.file
        }
    }
}
