/// Payload Validation Tool
///
/// Validates an upstream screening payload file against its declared
/// contract version and prints the complete violation list, without
/// dispatching anything. With --plan it also prints the plan that would
/// be issued.
///
/// Usage: cargo run --bin tool_validate_payload -- --file <PAYLOAD_JSON> [--plan]
use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::process;

use triagebot::logger::{self, LogTag};
use triagebot::{config, pipeline, validation};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let matches = Command::new("Payload Validation Tool")
        .version("1.0")
        .about("Validate a screening payload against its contract version")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PAYLOAD_JSON")
                .help("Path to the payload JSON file")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("CONFIG_TOML")
                .help("Custom config file (optional)")
                .required(false),
        )
        .arg(
            Arg::new("plan")
                .short('p')
                .long("plan")
                .help("Also print the plan that would be issued")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let file = matches
        .get_one::<String>("file")
        .context("--file is required")?;
    let show_plan = matches.get_flag("plan");

    if let Some(config_path) = matches.get_one::<String>("config") {
        config::load_config_from_path(config_path)
            .map_err(anyhow::Error::msg)
            .context("Failed to load config")?;
    }

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("'{}' is not valid JSON", file))?;

    match validation::validate(&payload) {
        Ok(validated) => {
            logger::info(
                LogTag::Validate,
                &format!(
                    "✅ Valid against schema '{}' ({} alias rewrites applied)",
                    validated.schema_version,
                    validated.applied_aliases.len()
                ),
            );
            for alias in &validated.applied_aliases {
                logger::info(
                    LogTag::Normalize,
                    &format!("  {} -> {}", alias.from, alias.to),
                );
            }
        }
        Err(err) => {
            logger::error(LogTag::Validate, &format!("❌ {}", err));
            for violation in err.violations() {
                logger::error(LogTag::Validate, &format!("  {}", violation));
            }
            process::exit(2);
        }
    }

    if show_plan {
        let plan = pipeline::preview_plan(&payload)
            .map_err(|e| anyhow::anyhow!("Failed to build plan: {}", e))?;
        let rendered =
            serde_json::to_string_pretty(&plan).context("Failed to render plan as JSON")?;
        println!("{}", rendered);
    }

    Ok(())
}
