#![deny(missing_docs)]
//! Shared logging utilities for the review watcher workspace.
//!
//! This crate provides the `watch_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line written
//! through the macros is tagged with the current poll cycle.

use std::sync::atomic::{AtomicU64, Ordering};

#[doc(hidden)]
pub use log as __log;

/// Number of the poll cycle currently executing, 0 before the first one.
static CYCLE: AtomicU64 = AtomicU64::new(0);

/// Sets the poll cycle number used to tag log lines.
/// This should be called by the poll loop once per cycle.
pub fn set_cycle(cycle: u64) {
    CYCLE.store(cycle, Ordering::Relaxed);
}

/// Retrieves the poll cycle number.
/// Returns 0 if no cycle has started yet.
pub fn current_cycle() -> u64 {
    CYCLE.load(Ordering::Relaxed)
}

/// Logs a trace-level message tagged with the current cycle.
#[macro_export]
macro_rules! watch_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current cycle.
#[macro_export]
macro_rules! watch_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current cycle.
#[macro_export]
macro_rules! watch_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current cycle.
#[macro_export]
macro_rules! watch_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current cycle.
#[macro_export]
macro_rules! watch_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a condition that stops the process from doing its job.
///
/// The `log` facade has no level above error, so these go out at error level
/// with a `CRITICAL` marker that survives into the log file.
#[macro_export]
macro_rules! watch_critical {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[cycle {}] CRITICAL {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
