/// Logger configuration with per-module debug gating
///
/// Scans command-line arguments once at init and stores the resulting
/// filter state in a process-wide cell. Reads are lock-free after init
/// apart from the RwLock read guard.
use std::collections::HashSet;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level threshold (Error is always shown regardless)
    pub min_level: LogLevel,

    /// Tags with --debug-<module> enabled
    pub debug_tags: HashSet<&'static str>,

    /// Tags with --verbose-<module> enabled
    pub verbose_tags: HashSet<&'static str>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Build the logger configuration from command-line arguments
///
/// Recognized flags:
/// - `--quiet` lowers the threshold to warnings
/// - `--verbose` raises it to verbose for every tag
/// - `--debug-<module>` / `--verbose-<module>` gate a single tag
pub fn init_from_args() {
    let mut config = LoggerConfig::default();

    if arguments::has_arg("--quiet") {
        config.min_level = LogLevel::Warning;
    }
    if arguments::has_arg("--verbose") {
        config.min_level = LogLevel::Verbose;
    }

    for tag in LogTag::all() {
        let key = tag.to_debug_key();
        if arguments::has_arg(&format!("--debug-{}", key)) {
            config.debug_tags.insert(key);
        }
        if arguments::has_arg(&format!("--verbose-{}", key)) {
            config.verbose_tags.insert(key);
        }
    }

    set_logger_config(config);
}

/// Get a snapshot of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_default()
}

/// Replace the logger configuration (init and tests)
pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut guard) = LOGGER_CONFIG.write() {
        *guard = config;
    }
}

/// Whether --debug-<module> was passed for this tag
pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().debug_tags.contains(tag.to_debug_key())
}

/// Whether --verbose-<module> was passed for this tag
pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config()
        .verbose_tags
        .contains(tag.to_debug_key())
}
