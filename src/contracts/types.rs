/// Contract registry data shapes
///
/// A SchemaDocument wraps the JSON-schema artifact for one version; an
/// AliasMap carries the legacy-to-canonical field renames for the same
/// version. Both are immutable once loaded.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// JSON-schema document for one screening contract version
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    version: String,
    document: Value,
}

impl SchemaDocument {
    pub fn new(version: impl Into<String>, document: Value) -> Self {
        Self {
            version: version.into(),
            document,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

/// Per-version alias map: legacy field names -> canonical field names
///
/// `fields` covers top-level keys, `nested_fields` covers the keys of one
/// nested object level (the corridor sub-object), keyed by the canonical
/// parent name. `canonical_fields`/`canonical_nested` enumerate the names
/// that are already canonical, so strict mode can tell a canonical key
/// from an unknown one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasMap {
    pub version: String,

    #[serde(default)]
    pub fields: HashMap<String, String>,

    #[serde(default)]
    pub nested_fields: HashMap<String, HashMap<String, String>>,

    #[serde(default)]
    pub canonical_fields: Vec<String>,

    #[serde(default)]
    pub canonical_nested: HashMap<String, Vec<String>>,
}

impl AliasMap {
    /// Resolve a top-level key to its canonical name
    ///
    /// Returns the canonical name when the key is an alias or already
    /// canonical, None when the key is unknown for this version.
    pub fn resolve_top(&self, key: &str) -> Option<&str> {
        if let Some(canonical) = self.fields.get(key) {
            return Some(canonical);
        }
        self.canonical_fields
            .iter()
            .find(|c| c.as_str() == key)
            .map(|c| c.as_str())
    }

    /// Resolve a nested key under a canonical parent
    pub fn resolve_nested(&self, parent: &str, key: &str) -> Option<&str> {
        if let Some(canonical) = self.nested_fields.get(parent).and_then(|m| m.get(key)) {
            return Some(canonical);
        }
        self.canonical_nested
            .get(parent)
            .and_then(|names| names.iter().find(|c| c.as_str() == key))
            .map(|c| c.as_str())
    }

    /// Whether a canonical parent field has nested renames to apply
    pub fn has_nested(&self, parent: &str) -> bool {
        self.nested_fields.contains_key(parent) || self.canonical_nested.contains_key(parent)
    }

    /// Whether a top-level key is an alias (not already canonical)
    pub fn is_alias_top(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Whether a nested key is an alias under the given canonical parent
    pub fn is_alias_nested(&self, parent: &str, key: &str) -> bool {
        self.nested_fields
            .get(parent)
            .map(|m| m.contains_key(key))
            .unwrap_or(false)
    }
}

/// One alias rewrite that fired during normalization, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAlias {
    pub from: String,
    pub to: String,
}

impl AppliedAlias {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
