/// Structural validation of a normalized payload against a contract
/// schema document
///
/// Interprets the subset of JSON Schema our contract documents use:
/// type, required, enum, minimum, pattern, properties, items. Collects
/// every violation instead of stopping at the first, so a single round
/// trip gives the caller the complete correction list.
use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::FieldViolation;

/// Compiled-pattern cache; schema documents carry a handful of patterns
/// that would otherwise be recompiled per request
static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Validate `payload` against `schema`, returning every violation found
pub fn check(schema: &Value, payload: &Value) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_value(schema, payload, "", &mut violations);
    violations
}

fn check_value(schema: &Value, value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    if let Some(expected) = schema.get("type").and_then(|t| t.as_str()) {
        if !type_matches(expected, value) {
            violations.push(FieldViolation::new(
                display_path(path),
                format!("must be {}", type_article(expected)),
            ));
            // Remaining checks assume the declared type
            return;
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(|e| e.as_array()) {
        if !allowed.contains(value) {
            let rendered = allowed
                .iter()
                .map(render_enum_member)
                .collect::<Vec<_>>()
                .join(", ");
            violations.push(FieldViolation::new(
                display_path(path),
                format!("must be one of {}", rendered),
            ));
        }
    }

    if let Some(minimum) = schema.get("minimum").and_then(|m| m.as_f64()) {
        if let Some(number) = value.as_f64() {
            if number < minimum {
                violations.push(FieldViolation::new(
                    display_path(path),
                    format!("must be >= {}", minimum),
                ));
            }
        }
    }

    if let Some(pattern) = schema.get("pattern").and_then(|p| p.as_str()) {
        if let Some(text) = value.as_str() {
            if !pattern_matches(pattern, text) {
                violations.push(FieldViolation::new(
                    display_path(path),
                    format!("must match pattern {}", pattern),
                ));
            }
        }
    }

    if let Some(obj) = value.as_object() {
        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for name in required.iter().filter_map(|n| n.as_str()) {
                if !obj.contains_key(name) {
                    violations.push(FieldViolation::new(
                        join_path(path, name),
                        "is required".to_string(),
                    ));
                }
            }
        }

        if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
            for (name, prop_schema) in properties {
                if let Some(prop_value) = obj.get(name) {
                    check_value(prop_schema, prop_value, &join_path(path, name), violations);
                }
            }
        }
    }

    if let Some(array) = value.as_array() {
        if let Some(items_schema) = schema.get("items") {
            for (index, item) in array.iter().enumerate() {
                check_value(
                    items_schema,
                    item,
                    &format!("{}[{}]", display_path(path), index),
                    violations,
                );
            }
        }
    }
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_article(expected: &str) -> String {
    match expected {
        "object" | "array" | "integer" => format!("an {}", expected),
        _ => format!("a {}", expected),
    }
}

fn render_enum_member(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn pattern_matches(pattern: &str, text: &str) -> bool {
    if let Ok(cache) = PATTERN_CACHE.read() {
        if let Some(regex) = cache.get(pattern) {
            return regex.is_match(text);
        }
    }

    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        // A malformed pattern is a contract-authoring bug; fail open so a
        // bad artifact cannot reject every payload
        Err(_) => return true,
    };

    let matched = regex.is_match(text);
    if let Ok(mut cache) = PATTERN_CACHE.write() {
        cache.entry(pattern.to_string()).or_insert(regex);
    }
    matched
}

/// Root-level violations report against the payload itself
fn display_path(path: &str) -> String {
    if path.is_empty() {
        "payload".to_string()
    } else {
        path.to_string()
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn toy_schema() -> Value {
        json!({
            "type": "object",
            "required": ["decision", "amount"],
            "properties": {
                "decision": { "type": "string", "enum": ["PASS", "REVIEW", "FAIL"] },
                "amount": { "type": "number", "minimum": 0.0 },
                "codes": { "type": "array", "items": { "type": "string", "pattern": "^[A-Z]+$" } }
            }
        })
    }

    #[test]
    fn collects_every_violation_not_just_the_first() {
        let payload = json!({ "decision": "INVALID", "amount": -1 });
        let violations = check(&toy_schema(), &payload);

        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"decision"));
        assert!(paths.contains(&"amount"));
    }

    #[test]
    fn missing_required_fields_are_reported_by_name() {
        let payload = json!({});
        let violations = check(&toy_schema(), &payload);
        assert!(violations
            .iter()
            .any(|v| v.path == "decision" && v.reason == "is required"));
        assert!(violations.iter().any(|v| v.path == "amount"));
    }

    #[test]
    fn array_items_are_validated_with_indexed_paths() {
        let payload = json!({ "decision": "PASS", "amount": 1.0, "codes": ["OK", "bad"] });
        let violations = check(&toy_schema(), &payload);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "codes[1]");
    }

    #[test]
    fn wrong_root_shape_is_one_clear_violation() {
        let payload = json!([1, 2, 3]);
        let violations = check(&toy_schema(), &payload);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "payload");
    }

    #[test]
    fn valid_payload_has_no_violations() {
        let payload = json!({ "decision": "PASS", "amount": 0.0, "codes": ["AML"] });
        assert!(check(&toy_schema(), &payload).is_empty());
    }
}
