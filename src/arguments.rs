/// Centralized argument handling for triagebot
///
/// Consolidates command-line argument parsing and debug flag checking.
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking functions used by the logger
/// - Host/port/config overrides with validation
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
/// Thread-safe singleton that stores arguments for access throughout the application
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by binaries and tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
/// Returns a vector clone to avoid holding the mutex lock
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// OVERRIDES
// =============================================================================

/// Config file path override (--config <path>)
pub fn get_config_override() -> Option<String> {
    get_arg_value("--config")
}

/// Webserver port override (--port <port>)
pub fn get_port_override() -> Option<u16> {
    get_arg_value("--port").and_then(|v| v.parse::<u16>().ok())
}

/// Webserver host override (--host <addr>)
pub fn get_host_override() -> Option<String> {
    get_arg_value("--host")
}

/// Validate the --port argument if present
///
/// Rejects values that are present but unparseable, so a typo fails fast
/// at startup instead of silently binding the default port.
pub fn validate_port_argument() -> Result<(), String> {
    match get_arg_value("--port") {
        Some(raw) => match raw.parse::<u16>() {
            Ok(0) => Err("Port 0 is not a valid listen port".to_string()),
            Ok(_) => Ok(()),
            Err(_) => Err(format!("Invalid --port value '{}'", raw)),
        },
        None => Ok(()),
    }
}

/// Ports below 1024 need elevated privileges on most systems
pub fn is_privileged_port(port: u16) -> bool {
    port < 1024
}

// =============================================================================
// MODE FLAGS
// =============================================================================

/// Dry-run mode: plans are built but every dispatch is skipped
pub fn is_dry_run_enabled() -> bool {
    has_arg("--dry-run")
}

/// Help requested
pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Print usage for the main binary
pub fn print_help() {
    println!("triagebot - contract-versioned triage pipeline");
    println!();
    println!("USAGE:");
    println!("  triagebot [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --config <path>        Config file path (default: data/config.toml)");
    println!("  --host <addr>          Webserver bind host override");
    println!("  --port <port>          Webserver bind port override");
    println!("  --dry-run              Build plans but skip all adapter dispatch");
    println!("  --quiet                Only warnings and errors");
    println!("  --verbose              Full trace output");
    println!("  --debug-<module>       Debug logs for one module");
    println!("                         (system, config, contracts, normalize, validate,");
    println!("                          plan, dispatch, adapter, feedback, webserver)");
    println!("  -h, --help             Show this help");
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because CMD_ARGS is process-global
    #[test]
    fn arg_value_lookup_and_port_validation() {
        set_cmd_args(vec![
            "triagebot".to_string(),
            "--port".to_string(),
            "9090".to_string(),
            "--dry-run".to_string(),
        ]);
        assert_eq!(get_port_override(), Some(9090));
        assert!(is_dry_run_enabled());
        assert!(validate_port_argument().is_ok());

        set_cmd_args(vec![
            "triagebot".to_string(),
            "--port".to_string(),
            "not-a-port".to_string(),
        ]);
        assert!(validate_port_argument().is_err());

        set_cmd_args(vec!["triagebot".to_string()]);
    }
}
