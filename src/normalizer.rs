/// Alias normalization: rewrite an arbitrary-shaped payload into the
/// canonical field names of its contract version
///
/// Rewrites top-level keys and the keys of nested objects one level deep
/// (the corridor sub-object). Non-destructive: when both an alias and its
/// canonical key are present the canonical value wins. Output depends only
/// on (payload, alias map, strict) - no hidden state - and normalizing an
/// already-canonical payload is a no-op.
use serde_json::{Map, Value};

use crate::contracts::{AliasMap, AppliedAlias};
use crate::errors::TriageError;

/// Result of a normalization pass: the rewritten payload plus the alias
/// rewrites that fired (kept for diagnostics)
#[derive(Debug, Clone)]
pub struct NormalizedPayload {
    pub value: Value,
    pub applied_aliases: Vec<AppliedAlias>,
}

/// Rewrite `payload` into canonical field names for `aliases.version`
///
/// Unknown keys pass through unchanged when `strict` is false and raise
/// `UnknownFieldError` when `strict` is true. Non-object payloads are
/// returned untouched - the validator reports the shape violation.
pub fn normalize(
    payload: &Value,
    aliases: &AliasMap,
    strict: bool,
) -> Result<NormalizedPayload, TriageError> {
    let obj = match payload.as_object() {
        Some(obj) => obj,
        None => {
            return Ok(NormalizedPayload {
                value: payload.clone(),
                applied_aliases: Vec::new(),
            })
        }
    };

    let mut applied = Vec::new();
    let mut out = Map::new();

    // Alias-named keys first, canonical keys second: the canonical entry
    // is always the last write on its name.
    for (key, value) in obj {
        if let Some(canonical) = aliases.fields.get(key) {
            let rewritten = normalize_object_level(canonical, value, aliases, strict, &mut applied)?;
            applied.push(AppliedAlias::new(key.clone(), canonical.clone()));
            out.insert(canonical.clone(), rewritten);
        }
    }

    for (key, value) in obj {
        if aliases.is_alias_top(key) {
            continue;
        }
        match aliases.resolve_top(key) {
            Some(canonical) => {
                let canonical = canonical.to_string();
                let rewritten =
                    normalize_object_level(&canonical, value, aliases, strict, &mut applied)?;
                out.insert(canonical, rewritten);
            }
            None => {
                if strict {
                    return Err(TriageError::UnknownField {
                        version: aliases.version.clone(),
                        path: key.clone(),
                    });
                }
                out.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(NormalizedPayload {
        value: Value::Object(out),
        applied_aliases: applied,
    })
}

/// Rewrite the keys of one nested object under its canonical parent name
fn normalize_object_level(
    parent: &str,
    value: &Value,
    aliases: &AliasMap,
    strict: bool,
    applied: &mut Vec<AppliedAlias>,
) -> Result<Value, TriageError> {
    if !aliases.has_nested(parent) {
        return Ok(value.clone());
    }

    let obj = match value.as_object() {
        Some(obj) => obj,
        None => return Ok(value.clone()),
    };

    let mut out = Map::new();

    for (key, inner) in obj {
        if aliases.is_alias_nested(parent, key) {
            if let Some(canonical) = aliases.resolve_nested(parent, key) {
                applied.push(AppliedAlias::new(
                    format!("{}.{}", parent, key),
                    format!("{}.{}", parent, canonical),
                ));
                out.insert(canonical.to_string(), inner.clone());
            }
        }
    }

    for (key, inner) in obj {
        if aliases.is_alias_nested(parent, key) {
            continue;
        }
        match aliases.resolve_nested(parent, key) {
            Some(canonical) => {
                out.insert(canonical.to_string(), inner.clone());
            }
            None => {
                if strict {
                    return Err(TriageError::UnknownField {
                        version: aliases.version.clone(),
                        path: format!("{}.{}", parent, key),
                    });
                }
                out.insert(key.clone(), inner.clone());
            }
        }
    }

    Ok(Value::Object(out))
}
