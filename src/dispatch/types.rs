//! Dispatch data shapes: idempotency keys, adapter request/response, and
//! the per-plan execution record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::plan::ActionCategory;

// =============================================================================
// IDEMPOTENCY
// =============================================================================

/// Deterministic identifier for one (plan, action) side effect
///
/// Re-dispatching the same plan derives the same keys, so downstream
/// systems can deduplicate retried requests. The key carries no payload
/// data - only plan and action identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Derive the key for a (plan id, action id) pair
    pub fn derive(plan_id: &str, action_id: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(plan_id.as_bytes());
        hasher.update(b":");
        hasher.update(action_id.as_bytes());
        let digest = hasher.finalize();

        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            hex.push_str(&format!("{:02x}", byte));
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ADAPTER BOUNDARY
// =============================================================================

/// Uniform request every adapter receives, regardless of backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterRequest {
    pub idempotency_key: IdempotencyKey,
    pub action_id: String,
    pub parameters: Value,
}

/// Uniform response shape across stub, sandbox, and live adapters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterResponse {
    /// Adapter-level outcome, e.g. "accepted" or "duplicate"
    pub status: String,

    /// Downstream reference (case number, hold id, filing receipt)
    pub reference_id: String,

    /// The parameters the adapter acknowledged, echoed back for audits
    pub echoed_payload: Value,
}

/// Failure at the adapter boundary
///
/// Never escalates past the dispatcher: it is recorded per-action in the
/// execution record while the rest of the plan continues.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("rejected: {reason}")]
    Rejected { reason: String },
}

// =============================================================================
// EXECUTION RECORD
// =============================================================================

/// Per-action dispatch outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Accepted by the downstream adapter
    Queued,

    /// Adapter call failed or timed out; safe to retry under the same key
    Failed,

    /// Not attempted (awaiting approval, dry run, or no adapter)
    Skipped,
}

/// Outcome of dispatching one planned action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExecution {
    pub action_id: String,
    pub category: ActionCategory,
    pub idempotency_key: IdempotencyKey,
    pub status: ActionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_reason: Option<String>,

    pub duration_ms: u64,
}

/// Aggregated dispatch outcome for one plan
///
/// Partial failure is a first-class outcome: a single downstream outage
/// degrades to failed entries here, never an error for the whole plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub plan_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Canonical plan order, one entry per recommended action
    pub actions: Vec<ActionExecution>,
}

impl ExecutionRecord {
    pub fn queued_count(&self) -> usize {
        self.count(ActionStatus::Queued)
    }

    pub fn failed_count(&self) -> usize {
        self.count(ActionStatus::Failed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(ActionStatus::Skipped)
    }

    fn count(&self, status: ActionStatus) -> usize {
        self.actions.iter().filter(|a| a.status == status).count()
    }

    /// Merge a re-dispatch delta into a previous record
    ///
    /// The explicit combinator applied by retrying callers: delta entries
    /// replace previous entries with the same action id (a retried action
    /// has one authoritative latest outcome); actions only present in the
    /// previous record are kept. Order follows the previous record, with
    /// genuinely new actions appended in delta order.
    pub fn merge(previous: &ExecutionRecord, delta: &ExecutionRecord) -> ExecutionRecord {
        let mut actions: Vec<ActionExecution> = previous
            .actions
            .iter()
            .map(|prev| {
                delta
                    .actions
                    .iter()
                    .find(|d| d.action_id == prev.action_id)
                    .unwrap_or(prev)
                    .clone()
            })
            .collect();

        for delta_action in &delta.actions {
            if !actions.iter().any(|a| a.action_id == delta_action.action_id) {
                actions.push(delta_action.clone());
            }
        }

        ExecutionRecord {
            plan_id: previous.plan_id.clone(),
            started_at: previous.started_at,
            completed_at: delta.completed_at,
            actions,
        }
    }
}

/// Caller-side switches for one dispatch pass
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Execute actions that require approval (set after human sign-off)
    pub approvals_granted: bool,

    /// Record every action as skipped without touching any adapter
    pub dry_run: bool,
}
