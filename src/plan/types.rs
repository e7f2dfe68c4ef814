//! Plan and action-recommendation types
//!
//! The upstream analyzer's recommendation envelope arrives in one of two
//! shapes (a primary action with alternatives, or a pre-ranked list);
//! both are resolved once at ingestion into the ActionRecommendation
//! tagged union and never re-checked downstream.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ACTION CATEGORIES
// =============================================================================

/// Downstream capability an action dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// Open a case in case management
    CreateCase,

    /// Place a hold on the account/transfer
    PlaceHold,

    /// Send a customer or internal communication
    SendCommunication,

    /// File a regulatory report
    FileReport,

    /// Route to a review team
    AssignTeam,

    /// No known capability; kept in the plan for traceability, skipped at dispatch
    Unmapped,
}

impl ActionCategory {
    /// Stable label used for tallies and adapter registry keys
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::CreateCase => "create_case",
            ActionCategory::PlaceHold => "place_hold",
            ActionCategory::SendCommunication => "send_communication",
            ActionCategory::FileReport => "file_report",
            ActionCategory::AssignTeam => "assign_team",
            ActionCategory::Unmapped => "unmapped",
        }
    }

    /// Infer the category from a conventional action identifier
    ///
    /// Used when the producer omits an explicit category field. Hold
    /// detection runs first: identifiers like PLACE_SOFT_HOLD mention
    /// neither case nor team but always mean a hold.
    pub fn from_action_id(action_id: &str) -> ActionCategory {
        let id = action_id.to_uppercase();
        if id.contains("HOLD") || id.contains("FREEZE") {
            ActionCategory::PlaceHold
        } else if id.contains("CASE") {
            ActionCategory::CreateCase
        } else if id.contains("NOTIFY") || id.contains("RFI") || id.contains("COMMUNICAT") {
            ActionCategory::SendCommunication
        } else if id.contains("FILE") || id.contains("REPORT") || id.contains("STR") || id.contains("SAR") {
            ActionCategory::FileReport
        } else if id.contains("ASSIGN") || id.contains("TEAM") || id.contains("ESCALATE") {
            ActionCategory::AssignTeam
        } else {
            ActionCategory::Unmapped
        }
    }
}

impl std::fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// UPSTREAM RECOMMENDATION ENVELOPE
// =============================================================================

/// One recommended action as produced by the upstream analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamAction {
    pub action_id: String,

    /// Explicit category; inferred from the identifier when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ActionCategory>,

    #[serde(default)]
    pub confidence: f64,

    #[serde(default)]
    pub requires_approval: bool,

    #[serde(default)]
    pub parameters: Value,
}

/// The analyzer's recommendation envelope, as found in the normalized payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamActionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_action: Option<UpstreamAction>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<UpstreamAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranked_actions: Option<Vec<UpstreamAction>>,
}

impl UpstreamActionPayload {
    /// Both shapes populated at once (producer bug; primary wins)
    pub fn has_conflicting_shapes(&self) -> bool {
        self.primary_action.is_some()
            && self.ranked_actions.as_ref().map(|r| !r.is_empty()).unwrap_or(false)
    }

    /// Resolve the envelope into its canonical tagged form
    ///
    /// Primary/alternatives takes precedence when both shapes are
    /// populated. An empty ranked list counts as missing.
    pub fn resolve(self) -> ActionRecommendation {
        if let Some(primary) = self.primary_action {
            return ActionRecommendation::PrimaryWithAlternatives {
                primary,
                alternatives: self.alternatives,
            };
        }
        match self.ranked_actions {
            Some(ranked) if !ranked.is_empty() => ActionRecommendation::Ranked(ranked),
            _ => ActionRecommendation::Missing,
        }
    }
}

/// Canonical recommendation shape, resolved once at ingestion
#[derive(Debug, Clone)]
pub enum ActionRecommendation {
    PrimaryWithAlternatives {
        primary: UpstreamAction,
        alternatives: Vec<UpstreamAction>,
    },
    Ranked(Vec<UpstreamAction>),
    Missing,
}

// =============================================================================
// PLAN
// =============================================================================

/// Where a planned action sat in the upstream recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    Primary,
    Alternative,
    Ranked,
}

/// One action in an issued plan
///
/// An owned snapshot of the upstream action: later mutation of the
/// original payload cannot corrupt an issued plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedAction {
    pub action_id: String,
    pub category: ActionCategory,
    pub confidence: f64,
    pub requires_approval: bool,
    pub parameters: Value,
    pub source: ActionSource,
}

/// Derived corridor risk tier; ordering is Low < Medium < High so ties
/// resolve upward with max()
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk summary attached to every plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub corridor_risk: RiskTier,

    /// Tally of planned actions per category label
    pub action_counts: BTreeMap<String, usize>,

    /// Verbatim ordered action identifiers from the upstream
    /// recommendation, preserved for traceability audits
    pub source_action_ids: Vec<String>,
}

/// The triage pipeline's output artifact
///
/// Immutable after construction; dispatch results live in a separate
/// ExecutionRecord keyed by plan_id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: String,
    pub summary: PlanSummary,
    pub recommended_actions: Vec<PlannedAction>,
    pub approvals_required: bool,
    pub needs_human_review: bool,
}
