use triagebot::{
    arguments,
    config,
    logger::{self, LogTag},
};

/// Main entry point for triagebot
///
/// Headless service: loads configuration, assembles the adapter registry,
/// and serves the triage pipeline over HTTP until shut down.
#[tokio::main]
async fn main() {
    logger::init();

    if arguments::is_help_requested() {
        arguments::print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, "🚀 TriageBot starting up...");

    if let Err(e) = arguments::validate_port_argument() {
        logger::error(LogTag::System, &format!("Argument validation failed: {}", e));
        std::process::exit(1);
    }

    if let Some(port) = arguments::get_port_override() {
        if arguments::is_privileged_port(port) {
            logger::warning(
                LogTag::System,
                &format!(
                    "Port {} requires elevated privileges (root/Administrator)",
                    port
                ),
            );
        }
        logger::info(LogTag::System, &format!("CLI override: Using port {}", port));
    }

    // Configuration failures at startup are the only fatal errors
    let config_path = arguments::get_config_override()
        .unwrap_or_else(|| config::CONFIG_FILE_PATH.to_string());
    if let Err(e) = config::load_config_from_path(&config_path) {
        logger::error(LogTag::System, &format!("Failed to load config: {}", e));
        std::process::exit(1);
    }
    logger::info(
        LogTag::Config,
        &format!(
            "config={} default_schema_version={} dispatch_mode={}",
            config_path,
            config::with_config(|c| c.contracts.default_schema_version.clone()),
            config::with_config(|c| c.dispatch.mode.clone())
        ),
    );

    if arguments::is_dry_run_enabled() {
        logger::warning(
            LogTag::System,
            "Dry-run mode: plans will be built but no adapter will be called",
        );
    }

    #[cfg(feature = "web")]
    {
        if !config::with_config(|c| c.webserver.enabled) {
            logger::warning(
                LogTag::System,
                "Webserver disabled in config; nothing to serve, exiting",
            );
            return;
        }

        if let Err(e) = ctrlc::set_handler(|| {
            triagebot::webserver::shutdown();
        }) {
            logger::warning(
                LogTag::System,
                &format!("Failed to install Ctrl-C handler: {}", e),
            );
        }

        if let Err(e) = triagebot::webserver::start_server().await {
            logger::error(LogTag::System, &format!("Webserver failed: {}", e));
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "web"))]
    {
        logger::warning(
            LogTag::System,
            "Built without the web feature; use tool_validate_payload for offline validation",
        );
    }

    logger::info(LogTag::System, "TriageBot stopped");
}
