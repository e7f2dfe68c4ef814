/// Log formatting and output with ANSI colors
///
/// Handles:
/// - Colorized console output with tag and level formatting
/// - Broken pipe handling for piped commands
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

use super::tags::LogTag;

/// Display configuration
const LOG_SHOW_TIME: bool = true;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, log_type: &str, message: &str) {
    let now = Local::now();

    let prefix = if LOG_SHOW_TIME {
        format!("{} ", now.format("%H:%M:%S"))
            .dimmed()
            .to_string()
    } else {
        String::new()
    };

    let line = format!(
        "{}[{}] [{}] {}",
        prefix,
        tag.colored(),
        format_log_type(log_type),
        message
    );

    print_stdout_safe(&line);
}

/// Color the level column
fn format_log_type(log_type: &str) -> ColoredString {
    match log_type {
        "ERROR" => log_type.red().bold(),
        "WARNING" => log_type.yellow().bold(),
        "INFO" => log_type.normal(),
        "DEBUG" => log_type.purple(),
        "VERBOSE" => log_type.dimmed(),
        _ => log_type.normal(),
    }
}

/// Print without panicking when the consumer closed the pipe
fn print_stdout_safe(line: &str) {
    let mut out = stdout();
    if let Err(e) = writeln!(out, "{}", line) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
    let _ = out.flush();
}
