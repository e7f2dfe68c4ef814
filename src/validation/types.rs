/// Canonical screening result model
///
/// The typed form an inbound payload takes after normalization and
/// validation. Field names here are the v2 canonical names; older
/// versions reach this struct through their alias maps.
use serde::{Deserialize, Serialize};

use crate::contracts::AppliedAlias;

/// Screening decision from the upstream rule engine / analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "REVIEW")]
    Review,
    #[serde(rename = "FAIL")]
    Fail,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Pass => "PASS",
            Decision::Review => "REVIEW",
            Decision::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transfer routing context
///
/// currency is optional because the v1 contract did not require it; v2
/// payloads always carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    pub origin_country: String,
    pub destination_country: String,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Normalized, validated screening result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResult {
    #[serde(default)]
    pub schema_version: String,
    pub decision: Decision,
    /// Order preserved exactly as received from the producer
    pub rule_codes: Vec<String>,
    pub corridor: Corridor,
    pub amount: f64,
}

/// Output of the contract validator: the typed result plus diagnostics
/// about which contract version matched and which alias rewrites fired
#[derive(Debug, Clone)]
pub struct ValidatedScreening {
    pub result: ScreeningResult,
    pub schema_version: String,
    pub applied_aliases: Vec<AppliedAlias>,
    /// The normalized payload, kept so downstream stages (plan builder)
    /// can extract the action recommendation without re-normalizing
    pub normalized: serde_json::Value,
}
