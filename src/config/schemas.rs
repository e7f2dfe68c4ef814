/// Configuration schema definitions
///
/// Every section has serde defaults so a partial config file (or none at
/// all) still produces a runnable configuration.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub webserver: WebserverConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Version used when an inbound payload omits schema_version
    pub default_schema_version: String,

    /// Reject unknown fields during normalization instead of passing them through
    pub strict_normalization: bool,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            default_schema_version: "v2".to_string(),
            strict_normalization: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Adapter backend: "stub" (in-memory) or "webhook" (HTTP endpoints)
    pub mode: String,

    /// Per-action timeout in milliseconds
    pub action_timeout_ms: u64,

    /// Bounded look-ahead for concurrent adapter calls (1 = fully sequential)
    pub concurrency: usize,

    /// capability -> endpoint URL, used in webhook mode
    pub endpoints: HashMap<String, String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: "stub".to_string(),
            action_timeout_ms: 5_000, // 5 seconds per adapter call
            concurrency: 1,
            endpoints: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebserverConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for WebserverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Sink backend: "log" (forward to logger) or "memory" (tests/tools)
    pub sink: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            sink: "log".to_string(),
        }
    }
}
