//! Adapter boundary: one trait per downstream capability call, a registry
//! keyed by action category, and in-memory stub implementations
//!
//! Adapters are freely substitutable (stub, sandbox, live) behind the
//! DownstreamAdapter trait; the dispatcher never depends on anything
//! beyond this shape.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::config::DispatchConfig;
use crate::logger::{self, LogTag};
use crate::plan::ActionCategory;

use super::http::WebhookAdapter;
use super::types::{AdapterError, AdapterRequest, AdapterResponse};

/// One downstream capability implementation
#[async_trait]
pub trait DownstreamAdapter: Send + Sync {
    /// The capability this adapter executes
    fn capability(&self) -> ActionCategory;

    /// Adapter name for logs and execution records
    fn name(&self) -> &str;

    /// Execute one action; must be idempotent per request.idempotency_key
    async fn execute(&self, request: &AdapterRequest) -> Result<AdapterResponse, AdapterError>;
}

/// Capability -> adapter lookup, assembled once at process start
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<ActionCategory, Arc<dyn DownstreamAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn DownstreamAdapter>) {
        self.adapters.insert(adapter.capability(), adapter);
    }

    pub fn get(&self, category: ActionCategory) -> Option<&Arc<dyn DownstreamAdapter>> {
        self.adapters.get(&category)
    }

    /// Registry with an in-memory stub per capability
    pub fn stub_registry() -> Self {
        let mut registry = Self::new();
        for &(category, prefix) in CAPABILITIES {
            registry.register(Arc::new(StubAdapter::new(category, prefix)));
        }
        registry
    }

    /// Build the registry from configuration
    ///
    /// In webhook mode each capability with a configured endpoint gets a
    /// WebhookAdapter; capabilities without one fall back to stubs so a
    /// partially configured deployment still dispatches.
    pub fn from_config(config: &DispatchConfig) -> Self {
        if config.mode != "webhook" {
            logger::info(LogTag::Adapter, "Registry mode=stub (in-memory adapters)");
            return Self::stub_registry();
        }

        let mut registry = Self::new();
        for &(category, prefix) in CAPABILITIES {
            match config.endpoints.get(category.as_str()) {
                Some(endpoint) => {
                    logger::info(
                        LogTag::Adapter,
                        &format!("capability={} endpoint={}", category, endpoint),
                    );
                    registry.register(Arc::new(WebhookAdapter::new(category, endpoint.clone())));
                }
                None => {
                    logger::warning(
                        LogTag::Adapter,
                        &format!("capability={} has no endpoint, using stub", category),
                    );
                    registry.register(Arc::new(StubAdapter::new(category, prefix)));
                }
            }
        }
        registry
    }
}

/// The five downstream capabilities and their stub reference prefixes
const CAPABILITIES: &[(ActionCategory, &str)] = &[
    (ActionCategory::CreateCase, "case"),
    (ActionCategory::PlaceHold, "hold"),
    (ActionCategory::SendCommunication, "msg"),
    (ActionCategory::FileReport, "filing"),
    (ActionCategory::AssignTeam, "routing"),
];

// =============================================================================
// STUB ADAPTER
// =============================================================================

/// In-memory adapter used in tests and stub deployments
///
/// Replays the stored response for a key it has already seen (status
/// "duplicate", same reference id) instead of performing a second state
/// transition - the same contract a live downstream system provides.
pub struct StubAdapter {
    capability: ActionCategory,
    name: String,
    reference_prefix: &'static str,
    seen: Mutex<HashMap<String, AdapterResponse>>,
    state_transitions: AtomicUsize,
}

impl StubAdapter {
    pub fn new(capability: ActionCategory, reference_prefix: &'static str) -> Self {
        Self {
            capability,
            name: format!("stub-{}", capability.as_str()),
            reference_prefix,
            seen: Mutex::new(HashMap::new()),
            state_transitions: AtomicUsize::new(0),
        }
    }

    /// Number of distinct state transitions performed (duplicates excluded)
    pub fn state_transitions(&self) -> usize {
        self.state_transitions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DownstreamAdapter for StubAdapter {
    fn capability(&self) -> ActionCategory {
        self.capability
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, request: &AdapterRequest) -> Result<AdapterResponse, AdapterError> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|e| AdapterError::Unavailable {
                reason: format!("stub state poisoned: {}", e),
            })?;

        if let Some(existing) = seen.get(request.idempotency_key.as_str()) {
            logger::debug(
                LogTag::Adapter,
                &format!(
                    "adapter={} key={} duplicate, replaying stored response",
                    self.name,
                    request.idempotency_key
                ),
            );
            let mut replay = existing.clone();
            replay.status = "duplicate".to_string();
            return Ok(replay);
        }

        let sequence = self.state_transitions.fetch_add(1, Ordering::SeqCst) + 1;
        let response = AdapterResponse {
            status: "accepted".to_string(),
            reference_id: format!("{}-{:04}", self.reference_prefix, sequence),
            echoed_payload: json!({
                "action_id": request.action_id,
                "parameters": request.parameters,
            }),
        };

        seen.insert(request.idempotency_key.as_str().to_string(), response.clone());
        Ok(response)
    }
}
