//! Logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! The capture path runs once per UI event, so chatty modules can switch
//! their diagnostics off without touching the call sites:
//! ```ignore
//! const ENABLE_LOGS: bool = false;
//!
//! use crate::{log_debug, log_warn};
//!
//! log_debug!("captured {}", signal);
//! ```

/// Debug-level log line, emitted only when the calling module sets
/// `ENABLE_LOGS = true`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// Info-level counterpart of [`log_debug!`].
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Errors are gated too; modules that must always report failures keep
/// `ENABLE_LOGS = true` or call `log::error!` directly.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
