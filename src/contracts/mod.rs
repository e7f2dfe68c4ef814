//! Contract registry: versioned schema documents and alias maps
//!
//! Pure lookup, no business logic. Documents are loaded lazily on first
//! request for a version and cached for the process lifetime; the caches
//! are single-writer-then-read-only, so warm reads never contend with a
//! writer. Runtime invalidation is not supported - contract documents are
//! deployment artifacts.

mod documents;
mod types;

pub use documents::SUPPORTED_VERSIONS;
pub use types::{AliasMap, AppliedAlias, SchemaDocument};

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::config::with_config;
use crate::errors::TriageError;
use crate::logger::{self, LogTag};

static SCHEMA_CACHE: Lazy<RwLock<HashMap<String, Arc<SchemaDocument>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static ALIAS_CACHE: Lazy<RwLock<HashMap<String, Arc<AliasMap>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// The version used when an inbound payload carries no schema_version
pub fn default_schema_version() -> String {
    with_config(|cfg| cfg.contracts.default_schema_version.clone())
}

/// All versions with registered contract artifacts
pub fn registered_versions() -> Vec<String> {
    SUPPORTED_VERSIONS.iter().map(|v| v.to_string()).collect()
}

/// Load (and cache) the schema document for a contract version
///
/// Fails with UnknownSchemaVersion when the version has no registered
/// document.
pub fn load_screening_schema(version: &str) -> Result<Arc<SchemaDocument>, TriageError> {
    if let Ok(cache) = SCHEMA_CACHE.read() {
        if let Some(doc) = cache.get(version) {
            return Ok(Arc::clone(doc));
        }
    }

    let document =
        documents::screening_schema(version).ok_or_else(|| TriageError::UnknownSchemaVersion {
            version: version.to_string(),
        })?;

    let doc = Arc::new(SchemaDocument::new(version, document));

    if let Ok(mut cache) = SCHEMA_CACHE.write() {
        // Another request may have loaded it while we built ours; keep the
        // cached instance so every reader shares one Arc.
        let entry = cache
            .entry(version.to_string())
            .or_insert_with(|| Arc::clone(&doc));
        let shared = Arc::clone(entry);
        drop(cache);
        logger::debug(
            LogTag::Contracts,
            &format!("schema version={} cached", version),
        );
        return Ok(shared);
    }

    Ok(doc)
}

/// Load (and cache) the alias map for a contract version
///
/// One alias-map document exists per version; the lookup table is the
/// only per-version dispatch in the pipeline.
pub fn load_alias_map(version: &str) -> Result<Arc<AliasMap>, TriageError> {
    if let Ok(cache) = ALIAS_CACHE.read() {
        if let Some(map) = cache.get(version) {
            return Ok(Arc::clone(map));
        }
    }

    let document =
        documents::alias_map_document(version).ok_or_else(|| TriageError::UnknownSchemaVersion {
            version: version.to_string(),
        })?;

    let parsed: AliasMap = serde_json::from_value(document).map_err(|e| {
        TriageError::configuration(format!(
            "Alias map document for '{}' is malformed: {}",
            version, e
        ))
    })?;

    let map = Arc::new(parsed);

    if let Ok(mut cache) = ALIAS_CACHE.write() {
        let entry = cache
            .entry(version.to_string())
            .or_insert_with(|| Arc::clone(&map));
        let shared = Arc::clone(entry);
        drop(cache);
        logger::debug(
            LogTag::Contracts,
            &format!("alias map version={} cached", version),
        );
        return Ok(shared);
    }

    Ok(map)
}
