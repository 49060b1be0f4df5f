//! Logging facade
//!
//! The navigator never talks to a logging backend directly. Every message goes
//! through the macros below, which forward to either `log` or `tracing`
//! depending on the enabled cargo feature:
//!
//! - `log` (default) - forwards to the `log` crate
//! - `tracing` - forwards to the `tracing` crate
//!
//! With neither feature enabled the macros expand to nothing and the
//! arguments are not evaluated.
//!
//! ```ignore
//! use screen_navigator::{debug_log, warn_log};
//!
//! debug_log!("resolving '{}'", address);
//! warn_log!("history underflow, {} entries left", len);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __nav_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: "screen_navigator", $($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!(target: "screen_navigator", $($arg)*);
    };
}

/// Trace-level message (per-segment matching, cache lookups).
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__nav_log!(trace, $($arg)*) };
}

/// Debug-level message (entry points, phase boundaries).
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__nav_log!(debug, $($arg)*) };
}

/// Info-level message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__nav_log!(info, $($arg)*) };
}

/// Warn-level message.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__nav_log!(warn, $($arg)*) };
}

/// Error-level message.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__nav_log!(error, $($arg)*) };
}
