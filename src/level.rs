//! Log severities and sink-level filtering

use std::fmt;

/// Log severity, ordered by increasing urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Get the lowercase name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Parse a level name, case-insensitively
    ///
    /// Unrecognized input resolves to `Debug` (the most verbose level, so no
    /// filtering occurs) rather than failing.
    pub fn parse(s: &str) -> Level {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" => Level::Warn,
            "error" => Level::Error,
            "fatal" => Level::Fatal,
            _ => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate deciding which severities a sink accepts
///
/// Split-by-severity mode uses `Exactly` for the debug/info/warn tiers and
/// `AtLeast(Error)` for the error tier; single-file mode uses `AtLeast` at
/// the configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    /// Accept exactly one severity
    Exactly(Level),
    /// Accept the given severity and anything more urgent
    AtLeast(Level),
}

impl LevelFilter {
    /// Check whether a record at `level` passes this filter
    pub fn enabled(&self, level: Level) -> bool {
        match self {
            LevelFilter::Exactly(l) => level == *l,
            LevelFilter::AtLeast(l) => level >= *l,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_parse_known_levels() {
        assert_eq!(Level::parse("debug"), Level::Debug);
        assert_eq!(Level::parse("info"), Level::Info);
        assert_eq!(Level::parse("warn"), Level::Warn);
        assert_eq!(Level::parse("error"), Level::Error);
        assert_eq!(Level::parse("fatal"), Level::Fatal);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Level::parse("INFO"), Level::Info);
        assert_eq!(Level::parse("Warn"), Level::Warn);
        assert_eq!(Level::parse(" ERROR "), Level::Error);
    }

    #[test]
    fn test_parse_unrecognized_defaults_to_debug() {
        assert_eq!(Level::parse("verbose"), Level::Debug);
        assert_eq!(Level::parse(""), Level::Debug);
        assert_eq!(Level::parse("42"), Level::Debug);
    }

    #[test]
    fn test_as_str_is_lowercase() {
        for level in [
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Fatal,
        ] {
            assert_eq!(level.as_str(), level.as_str().to_lowercase());
        }
    }

    #[test]
    fn test_exactly_filter() {
        let filter = LevelFilter::Exactly(Level::Info);
        assert!(filter.enabled(Level::Info));
        assert!(!filter.enabled(Level::Debug));
        assert!(!filter.enabled(Level::Warn));
    }

    #[test]
    fn test_at_least_filter() {
        let filter = LevelFilter::AtLeast(Level::Warn);
        assert!(!filter.enabled(Level::Debug));
        assert!(!filter.enabled(Level::Info));
        assert!(filter.enabled(Level::Warn));
        assert!(filter.enabled(Level::Error));
        assert!(filter.enabled(Level::Fatal));
    }
}
