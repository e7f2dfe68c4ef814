//! Structured logging for triagebot
//!
//! Clean, ergonomic logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Colored console output
//!
//! ## Usage
//!
//! ```rust
//! use triagebot::logger::{self, LogTag};
//!
//! logger::error(LogTag::Dispatch, "Adapter unreachable");
//! logger::warning(LogTag::Plan, "Confidence out of range, clamped");
//! logger::info(LogTag::Validate, "Payload accepted");
//! logger::debug(LogTag::Normalize, "alias=result canonical=decision"); // Only if --debug-normalize
//! ```
//!
//! ## Initialization
//!
//! Call once at startup (in main.rs), after arguments are available:
//! ```rust
//! triagebot::logger::init();
//! ```

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Scans command-line arguments for --quiet/--verbose/--debug-<module>
/// flags and configures filtering. Must be called before any logging.
pub fn init() {
    config::init_from_args();
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (gated by --debug-<module>)
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (gated by --verbose)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // Single test because the logger config is process-global
    #[test]
    fn filtering_rules() {
        set_logger_config(LoggerConfig {
            min_level: LogLevel::Warning,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
        });
        assert!(core::should_log(&LogTag::Dispatch, LogLevel::Error));
        assert!(!core::should_log(&LogTag::Dispatch, LogLevel::Info));

        let mut debug_tags = HashSet::new();
        debug_tags.insert("plan");
        set_logger_config(LoggerConfig {
            min_level: LogLevel::Info,
            debug_tags,
            verbose_tags: HashSet::new(),
        });
        assert!(core::should_log(&LogTag::Plan, LogLevel::Debug));
        assert!(!core::should_log(&LogTag::Dispatch, LogLevel::Debug));

        set_logger_config(LoggerConfig::default());
    }
}
