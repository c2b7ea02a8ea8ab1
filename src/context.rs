//! Ambient request-scoped context
//!
//! A small key/value carrier that request-handling code threads through a
//! call chain. A logger attached under [`LOGGER_KEY`] travels with it;
//! [`from_context`] resolves that logger, falling back to the process-wide
//! default, so lookups never fail.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::logger::Logger;

/// Well-known key under which a logger is attached to a context
pub const LOGGER_KEY: &str = "fanlog.logger";

/// Key/value carrier for request-scoped state
#[derive(Clone, Default)]
pub struct Context {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a value under a key, replacing any previous value
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// Look up a value by key and type
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.values
            .get(key)
            .and_then(|value| value.as_ref().downcast_ref::<T>())
    }

    /// Attach a logger under the well-known key
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.insert(LOGGER_KEY, logger);
        self
    }

    /// The logger attached under the well-known key, if any
    pub fn logger(&self) -> Option<&Logger> {
        self.get::<Logger>(LOGGER_KEY)
    }
}

/// Resolve the logger carried by `ctx`
///
/// Falls back to the process-wide default when no logger is attached (or
/// something other than a logger sits under the key).
pub fn from_context(ctx: &Context) -> Logger {
    ctx.logger()
        .cloned()
        .unwrap_or_else(|| crate::default_logger().clone())
}
