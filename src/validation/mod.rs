//! Contract validation: version resolution, alias normalization, and
//! structural validation of inbound screening payloads
//!
//! The entry point is [`validate`]; it is side-effect-free and idempotent,
//! so retried requests validate identically.

mod schema_check;
mod types;

pub use types::{Corridor, Decision, ScreeningResult, ValidatedScreening};

use serde_json::Value;

use crate::config::with_config;
use crate::contracts;
use crate::errors::{FieldViolation, SchemaValidationError, TriageError};
use crate::logger::{self, LogTag};
use crate::normalizer;

/// Validate a raw upstream payload into a typed canonical result
///
/// Steps:
/// 1. Read `schema_version` (falling back to the configured default)
/// 2. Normalize alias field names, capturing which rewrites fired
/// 3. Structurally validate against the version's schema document
/// 4. Extract the typed `ScreeningResult`
///
/// All violations are collected before failing, so the caller receives
/// the complete correction list in one round trip.
pub fn validate(raw: &Value) -> Result<ValidatedScreening, TriageError> {
    let version = raw
        .get("schema_version")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(contracts::default_schema_version);

    let aliases = contracts::load_alias_map(&version)?;
    let strict = with_config(|cfg| cfg.contracts.strict_normalization);

    let normalized = normalizer::normalize(raw, &aliases, strict)?;

    if !normalized.applied_aliases.is_empty() {
        logger::debug(
            LogTag::Validate,
            &format!(
                "version={} aliases_applied={}",
                version,
                normalized.applied_aliases.len()
            ),
        );
    }

    let schema = contracts::load_screening_schema(&version)?;
    let violations = schema_check::check(schema.document(), &normalized.value);

    if !violations.is_empty() {
        logger::debug(
            LogTag::Validate,
            &format!("version={} violations={}", version, violations.len()),
        );
        return Err(SchemaValidationError::new(version, violations).into());
    }

    let mut result: ScreeningResult =
        serde_json::from_value(normalized.value.clone()).map_err(|e| {
            // Structurally valid but not extractable means the schema
            // document and the typed model disagree; report it as a
            // validation failure rather than a 500
            TriageError::SchemaValidation(SchemaValidationError::new(
                version.clone(),
                vec![FieldViolation::new("payload", e.to_string())],
            ))
        })?;
    result.schema_version = version.clone();

    Ok(ValidatedScreening {
        result,
        schema_version: version,
        applied_aliases: normalized.applied_aliases,
        normalized: normalized.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canonical_v2_payload() -> Value {
        json!({
            "schema_version": "v2",
            "decision": "REVIEW",
            "rule_codes": ["AML.R1", "SANCTIONS.HIT", "AML.R7"],
            "amount": 9800.0,
            "corridor": {
                "origin_country": "USA",
                "destination_country": "PHL",
                "channel": "WIRE",
                "currency": "USD"
            }
        })
    }

    #[test]
    fn canonical_payload_validates_and_types() {
        let validated = validate(&canonical_v2_payload()).expect("valid payload");
        assert_eq!(validated.schema_version, "v2");
        assert_eq!(validated.result.decision, Decision::Review);
        assert_eq!(
            validated.result.rule_codes,
            vec!["AML.R1", "SANCTIONS.HIT", "AML.R7"]
        );
        assert_eq!(validated.result.corridor.origin_country, "USA");
        assert_eq!(validated.result.amount, 9800.0);
        assert!(validated.applied_aliases.is_empty());
    }

    #[test]
    fn alias_round_trip_matches_canonical_field_for_field() {
        let legacy = json!({
            "schema_version": "v1",
            "verdict": "REVIEW",
            "rules_fired": ["AML.R1"],
            "transfer_amount": 500.0,
            "route": {
                "origin": "USA",
                "beneficiary_country": "MEX",
                "method": "WIRE",
                "ccy": "USD"
            }
        });
        let canonical = json!({
            "schema_version": "v1",
            "decision": "REVIEW",
            "rule_codes": ["AML.R1"],
            "amount": 500.0,
            "corridor": {
                "origin_country": "USA",
                "destination_country": "MEX",
                "channel": "WIRE",
                "currency": "USD"
            }
        });

        let from_legacy = validate(&legacy).expect("legacy names validate");
        let from_canonical = validate(&canonical).expect("canonical names validate");

        assert_eq!(from_legacy.result.decision, from_canonical.result.decision);
        assert_eq!(
            from_legacy.result.rule_codes,
            from_canonical.result.rule_codes
        );
        assert_eq!(from_legacy.result.amount, from_canonical.result.amount);
        assert_eq!(from_legacy.result.corridor, from_canonical.result.corridor);
        assert!(!from_legacy.applied_aliases.is_empty());
        assert!(from_canonical.applied_aliases.is_empty());
    }

    #[test]
    fn invalid_payload_reports_decision_and_amount_together() {
        let payload = json!({
            "schema_version": "v2",
            "decision": "INVALID",
            "amount": -1,
            "rule_codes": [],
            "corridor": {}
        });

        let err = validate(&payload).expect_err("invalid payload");
        let validation = match err {
            TriageError::SchemaValidation(v) => v,
            other => panic!("expected SchemaValidation, got {:?}", other),
        };

        let paths: Vec<&str> = validation
            .violations
            .iter()
            .map(|v| v.path.as_str())
            .collect();
        assert!(paths.contains(&"decision"));
        assert!(paths.contains(&"amount"));
        // Empty corridor is also incomplete
        assert!(paths.iter().any(|p| p.starts_with("corridor.")));
    }

    #[test]
    fn unknown_version_is_rejected_before_validation() {
        let payload = json!({ "schema_version": "v99", "decision": "PASS" });
        let err = validate(&payload).expect_err("unsupported version");
        assert!(matches!(err, TriageError::UnknownSchemaVersion { .. }));
    }

    #[test]
    fn missing_version_falls_back_to_configured_default() {
        let mut payload = canonical_v2_payload();
        payload
            .as_object_mut()
            .expect("object payload")
            .remove("schema_version");

        let validated = validate(&payload).expect("default version applies");
        assert_eq!(validated.schema_version, "v2");
        assert_eq!(validated.result.schema_version, "v2");
    }

    #[test]
    fn v1_contract_accepts_missing_currency() {
        let payload = json!({
            "schema_version": "v1",
            "decision": "PASS",
            "rule_codes": ["KYC.OK"],
            "amount": 20.0,
            "corridor": {
                "origin_country": "SGP",
                "destination_country": "SGP",
                "channel": "CARD"
            }
        });

        let validated = validate(&payload).expect("v1 allows absent currency");
        assert_eq!(validated.result.corridor.currency, None);
    }

    #[test]
    fn v2_contract_requires_currency() {
        let payload = json!({
            "schema_version": "v2",
            "decision": "PASS",
            "rule_codes": [],
            "amount": 20.0,
            "corridor": {
                "origin_country": "SGP",
                "destination_country": "SGP",
                "channel": "CARD"
            }
        });

        let err = validate(&payload).expect_err("currency required in v2");
        let validation = match err {
            TriageError::SchemaValidation(v) => v,
            other => panic!("expected SchemaValidation, got {:?}", other),
        };
        assert!(validation
            .violations
            .iter()
            .any(|v| v.path == "corridor.currency"));
    }
}
