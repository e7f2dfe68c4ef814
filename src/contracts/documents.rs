/// Canonical contract artifacts, one schema document and one alias map per
/// supported version
///
/// These are deployment artifacts authored in code as JSON builders; the
/// registry parses and caches them on first use. New versions register a
/// new builder pair here - behavior is never versioned with conditionals
/// elsewhere.
use serde_json::{json, Value};

/// Versions with a registered schema + alias map pair
pub const SUPPORTED_VERSIONS: &[&str] = &["v1", "v2"];

/// Channels accepted by the v1 contract
const CHANNELS_V1: &[&str] = &["WIRE", "CARD", "WALLET", "CASH_AGENT"];

/// v2 added the CRYPTO channel
const CHANNELS_V2: &[&str] = &["WIRE", "CARD", "WALLET", "CASH_AGENT", "CRYPTO"];

const COUNTRY_PATTERN: &str = "^[A-Z]{3}$";
const CURRENCY_PATTERN: &str = "^[A-Z]{3}$";
const RULE_CODE_PATTERN: &str = "^[A-Z][A-Z0-9_.-]*$";

/// Returns the schema document for a version, None if unregistered
pub fn screening_schema(version: &str) -> Option<Value> {
    match version {
        "v1" => Some(screening_schema_v1()),
        "v2" => Some(screening_schema_v2()),
        _ => None,
    }
}

/// Returns the alias-map document for a version, None if unregistered
pub fn alias_map_document(version: &str) -> Option<Value> {
    match version {
        "v1" => Some(alias_map_v1()),
        "v2" => Some(alias_map_v2()),
        _ => None,
    }
}

/// Screening contract v1
///
/// The original producer layout: corridor currency was optional and the
/// CRYPTO channel did not exist yet.
fn screening_schema_v1() -> Value {
    json!({
        "$id": "triagebot://contracts/screening.v1.schema.json",
        "title": "ScreeningResult v1",
        "type": "object",
        "required": ["decision", "rule_codes", "corridor", "amount"],
        "properties": {
            "schema_version": { "type": "string", "enum": ["v1"] },
            "decision": { "type": "string", "enum": ["PASS", "REVIEW", "FAIL"] },
            "rule_codes": {
                "type": "array",
                "items": { "type": "string", "pattern": RULE_CODE_PATTERN }
            },
            "amount": { "type": "number", "minimum": 0.0 },
            "corridor": {
                "type": "object",
                "required": ["origin_country", "destination_country", "channel"],
                "properties": {
                    "origin_country": { "type": "string", "pattern": COUNTRY_PATTERN },
                    "destination_country": { "type": "string", "pattern": COUNTRY_PATTERN },
                    "channel": { "type": "string", "enum": CHANNELS_V1 },
                    "currency": { "type": "string", "pattern": CURRENCY_PATTERN }
                },
                "additionalProperties": true
            },
            "primary_action": { "type": "object" },
            "alternatives": { "type": "array" },
            "ranked_actions": { "type": "array" }
        },
        "additionalProperties": true
    })
}

/// Screening contract v2 (current default)
fn screening_schema_v2() -> Value {
    json!({
        "$id": "triagebot://contracts/screening.v2.schema.json",
        "title": "ScreeningResult v2",
        "type": "object",
        "required": ["decision", "rule_codes", "corridor", "amount"],
        "properties": {
            "schema_version": { "type": "string", "enum": ["v2"] },
            "decision": { "type": "string", "enum": ["PASS", "REVIEW", "FAIL"] },
            "rule_codes": {
                "type": "array",
                "items": { "type": "string", "pattern": RULE_CODE_PATTERN }
            },
            "amount": { "type": "number", "minimum": 0.0 },
            "corridor": {
                "type": "object",
                "required": ["origin_country", "destination_country", "channel", "currency"],
                "properties": {
                    "origin_country": { "type": "string", "pattern": COUNTRY_PATTERN },
                    "destination_country": { "type": "string", "pattern": COUNTRY_PATTERN },
                    "channel": { "type": "string", "enum": CHANNELS_V2 },
                    "currency": { "type": "string", "pattern": CURRENCY_PATTERN }
                },
                "additionalProperties": true
            },
            "primary_action": { "type": "object" },
            "alternatives": { "type": "array" },
            "ranked_actions": { "type": "array" }
        },
        "additionalProperties": true
    })
}

/// Canonical names shared by both versions
fn canonical_fields() -> Value {
    json!([
        "schema_version",
        "decision",
        "rule_codes",
        "amount",
        "corridor",
        "primary_action",
        "alternatives",
        "ranked_actions"
    ])
}

fn canonical_corridor_fields() -> Value {
    json!(["origin_country", "destination_country", "channel", "currency"])
}

/// v1 alias map
///
/// v1 producers predate the canonical naming pass, so the legacy surface
/// is wide: rule-engine exports ("result", "rules_fired") and the old
/// routing vocabulary ("route", "lane") all map onto canonical names.
fn alias_map_v1() -> Value {
    json!({
        "version": "v1",
        "fields": {
            "result": "decision",
            "verdict": "decision",
            "rules_fired": "rule_codes",
            "triggered_rules": "rule_codes",
            "transfer_amount": "amount",
            "amt": "amount",
            "route": "corridor",
            "lane": "corridor",
            "contract_version": "schema_version",
            "recommended_action": "primary_action",
            "fallback_actions": "alternatives"
        },
        "nested_fields": {
            "corridor": {
                "origin": "origin_country",
                "source_country": "origin_country",
                "dest": "destination_country",
                "beneficiary_country": "destination_country",
                "payment_channel": "channel",
                "method": "channel",
                "ccy": "currency"
            }
        },
        "canonical_fields": canonical_fields(),
        "canonical_nested": { "corridor": canonical_corridor_fields() }
    })
}

/// v2 alias map
///
/// Narrower than v1: only the renames still seen from producers that are
/// mid-migration to the canonical layout.
fn alias_map_v2() -> Value {
    json!({
        "version": "v2",
        "fields": {
            "verdict": "decision",
            "rules_fired": "rule_codes",
            "transfer_amount": "amount",
            "lane": "corridor"
        },
        "nested_fields": {
            "corridor": {
                "origin": "origin_country",
                "dest": "destination_country",
                "payment_channel": "channel",
                "ccy": "currency"
            }
        },
        "canonical_fields": canonical_fields(),
        "canonical_nested": { "corridor": canonical_corridor_fields() }
    })
}
