//! Format-string emission macros
//!
//! Thin sugar over the process-wide default logger. Each macro forwards its
//! arguments through `format_args!`, so formatting follows the standard
//! `format!` rules and caller attribution points at the macro invocation.

/// Emit a formatted message at debug severity through the default logger
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)*) => {
        $crate::default_logger().debugf(::core::format_args!($($arg)*))
    };
}

/// Emit a formatted message at info severity through the default logger
#[macro_export]
macro_rules! infof {
    ($($arg:tt)*) => {
        $crate::default_logger().infof(::core::format_args!($($arg)*))
    };
}

/// Emit a formatted message at warn severity through the default logger
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)*) => {
        $crate::default_logger().warnf(::core::format_args!($($arg)*))
    };
}

/// Emit a formatted message at error severity through the default logger
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::default_logger().errorf(::core::format_args!($($arg)*))
    };
}

/// Emit a formatted message at fatal severity through the default logger,
/// then terminate the process
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)*) => {
        $crate::default_logger().fatalf(::core::format_args!($($arg)*))
    };
}
