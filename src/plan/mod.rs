//! Plan builder: turn a validated screening result plus the upstream
//! action recommendation into a risk-ranked remediation plan
//!
//! Plan construction always succeeds once the screening result has
//! validated - a malformed recommendation degrades to an empty plan
//! flagged for manual routing, never an error. Blocking triage entirely
//! on a bad recommendation would be worse than flagging it.

pub mod risk;
mod types;

pub use types::{
    ActionCategory, ActionRecommendation, ActionSource, Plan, PlanSummary, PlannedAction,
    RiskTier, UpstreamAction, UpstreamActionPayload,
};

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::logger::{self, LogTag};
use crate::validation::ScreeningResult;

/// Extract the recommendation envelope from a normalized payload
///
/// A recommendation that does not deserialize is treated as absent (the
/// plan will carry needs_human_review) rather than failing the request.
pub fn extract_recommendation(normalized: &Value) -> UpstreamActionPayload {
    match serde_json::from_value::<UpstreamActionPayload>(normalized.clone()) {
        Ok(payload) => payload,
        Err(e) => {
            logger::warning(
                LogTag::Plan,
                &format!("Malformed action recommendation, routing to manual review: {}", e),
            );
            UpstreamActionPayload::default()
        }
    }
}

/// Build a plan from a validated screening result and the upstream
/// action recommendation
///
/// Canonical ordering: `[primary] + alternatives` when a primary action
/// is present, otherwise the ranked list verbatim (it is trusted as
/// already risk-ranked). `approvals_required` is a logical OR across the
/// ordered actions - one high-risk action forces sign-off regardless of
/// how many low-risk alternatives exist.
pub fn build_plan(screening: &ScreeningResult, payload: UpstreamActionPayload) -> Plan {
    if payload.has_conflicting_shapes() {
        logger::warning(
            LogTag::Plan,
            "Recommendation carries both primary_action and ranked_actions; using primary",
        );
    }

    let ordered: Vec<(UpstreamAction, ActionSource)> = match payload.resolve() {
        ActionRecommendation::PrimaryWithAlternatives {
            primary,
            alternatives,
        } => {
            let mut actions = vec![(primary, ActionSource::Primary)];
            actions.extend(
                alternatives
                    .into_iter()
                    .map(|a| (a, ActionSource::Alternative)),
            );
            actions
        }
        ActionRecommendation::Ranked(ranked) => ranked
            .into_iter()
            .map(|a| (a, ActionSource::Ranked))
            .collect(),
        ActionRecommendation::Missing => Vec::new(),
    };

    let recommended_actions: Vec<PlannedAction> = ordered
        .into_iter()
        .map(|(action, source)| snapshot_action(action, source))
        .collect();

    let approvals_required = recommended_actions.iter().any(|a| a.requires_approval);
    let needs_human_review = recommended_actions.is_empty();

    let corridor_risk = risk::classify(screening.decision, &screening.corridor);

    let mut action_counts: BTreeMap<String, usize> = BTreeMap::new();
    for action in &recommended_actions {
        *action_counts
            .entry(action.category.as_str().to_string())
            .or_insert(0) += 1;
    }

    let source_action_ids: Vec<String> = recommended_actions
        .iter()
        .map(|a| a.action_id.clone())
        .collect();

    let plan = Plan {
        plan_id: Uuid::new_v4().to_string(),
        created_at: chrono::Utc::now(),
        schema_version: screening.schema_version.clone(),
        summary: PlanSummary {
            corridor_risk,
            action_counts,
            source_action_ids,
        },
        recommended_actions,
        approvals_required,
        needs_human_review,
    };

    logger::info(
        LogTag::Plan,
        &format!(
            "plan_id={} actions={} corridor_risk={} approvals_required={} needs_human_review={}",
            plan.plan_id,
            plan.recommended_actions.len(),
            plan.summary.corridor_risk,
            plan.approvals_required,
            plan.needs_human_review
        ),
    );

    plan
}

/// Snapshot one upstream action into the plan's owned form
///
/// Confidence outside [0,1] is clamped rather than rejected; the
/// screening result already validated, so a producer bug here should
/// degrade, not block triage.
fn snapshot_action(action: UpstreamAction, source: ActionSource) -> PlannedAction {
    let confidence = if action.confidence.is_finite() {
        action.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if confidence != action.confidence {
        logger::warning(
            LogTag::Plan,
            &format!(
                "action_id={} confidence={} out of range, clamped to {}",
                action.action_id, action.confidence, confidence
            ),
        );
    }

    let category = action
        .category
        .unwrap_or_else(|| ActionCategory::from_action_id(&action.action_id));

    PlannedAction {
        action_id: action.action_id,
        category,
        confidence,
        requires_approval: action.requires_approval,
        parameters: action.parameters,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Corridor, Decision};
    use serde_json::json;

    fn test_screening(decision: Decision) -> ScreeningResult {
        ScreeningResult {
            schema_version: "v2".to_string(),
            decision,
            rule_codes: vec!["AML.R1".to_string(), "SANCTIONS.HIT".to_string()],
            corridor: Corridor {
                origin_country: "USA".to_string(),
                destination_country: "PHL".to_string(),
                channel: "WIRE".to_string(),
                currency: Some("USD".to_string()),
            },
            amount: 9800.0,
        }
    }

    fn action(id: &str, requires_approval: bool) -> UpstreamAction {
        UpstreamAction {
            action_id: id.to_string(),
            category: None,
            confidence: 0.8,
            requires_approval,
            parameters: json!({ "reason": "test" }),
        }
    }

    #[test]
    fn ranked_order_is_preserved_verbatim() {
        let payload = UpstreamActionPayload {
            primary_action: None,
            alternatives: vec![],
            ranked_actions: Some(vec![
                action("PLACE_SOFT_HOLD", false),
                action("CREATE_CASE", false),
                action("ASSIGN_TEAM", false),
            ]),
        };

        let plan = build_plan(&test_screening(Decision::Review), payload);

        let ids: Vec<&str> = plan
            .recommended_actions
            .iter()
            .map(|a| a.action_id.as_str())
            .collect();
        assert_eq!(ids, vec!["PLACE_SOFT_HOLD", "CREATE_CASE", "ASSIGN_TEAM"]);
        assert_eq!(
            plan.summary.source_action_ids,
            vec!["PLACE_SOFT_HOLD", "CREATE_CASE", "ASSIGN_TEAM"]
        );
        assert!(plan
            .recommended_actions
            .iter()
            .all(|a| a.source == ActionSource::Ranked));
    }

    #[test]
    fn primary_action_leads_and_alternatives_keep_their_order() {
        let payload = UpstreamActionPayload {
            primary_action: Some(action("CREATE_CASE", false)),
            alternatives: vec![action("NOTIFY_CUSTOMER", false), action("ASSIGN_TEAM", false)],
            ranked_actions: None,
        };

        let plan = build_plan(&test_screening(Decision::Review), payload);

        let ids: Vec<&str> = plan
            .recommended_actions
            .iter()
            .map(|a| a.action_id.as_str())
            .collect();
        assert_eq!(ids, vec!["CREATE_CASE", "NOTIFY_CUSTOMER", "ASSIGN_TEAM"]);
        assert_eq!(plan.recommended_actions[0].source, ActionSource::Primary);
        assert_eq!(
            plan.recommended_actions[1].source,
            ActionSource::Alternative
        );
    }

    #[test]
    fn one_approval_required_action_forces_the_flag() {
        for position in 0..3 {
            let mut actions = vec![
                action("CREATE_CASE", false),
                action("NOTIFY_CUSTOMER", false),
                action("ASSIGN_TEAM", false),
            ];
            actions[position].requires_approval = true;

            let payload = UpstreamActionPayload {
                primary_action: None,
                alternatives: vec![],
                ranked_actions: Some(actions),
            };
            let plan = build_plan(&test_screening(Decision::Review), payload);
            assert!(
                plan.approvals_required,
                "approval at position {} must set the flag",
                position
            );
        }
    }

    #[test]
    fn no_approvals_means_flag_stays_false() {
        let payload = UpstreamActionPayload {
            primary_action: None,
            alternatives: vec![],
            ranked_actions: Some(vec![action("CREATE_CASE", false)]),
        };
        let plan = build_plan(&test_screening(Decision::Pass), payload);
        assert!(!plan.approvals_required);
    }

    #[test]
    fn missing_recommendation_flags_manual_review_instead_of_failing() {
        let plan = build_plan(
            &test_screening(Decision::Review),
            UpstreamActionPayload::default(),
        );
        assert!(plan.needs_human_review);
        assert!(plan.recommended_actions.is_empty());
        assert!(plan.summary.source_action_ids.is_empty());
        assert!(!plan.approvals_required);
    }

    #[test]
    fn action_counts_tally_by_category() {
        let payload = UpstreamActionPayload {
            primary_action: None,
            alternatives: vec![],
            ranked_actions: Some(vec![
                action("PLACE_SOFT_HOLD", false),
                action("PLACE_HARD_HOLD", false),
                action("CREATE_CASE", false),
            ]),
        };
        let plan = build_plan(&test_screening(Decision::Review), payload);

        assert_eq!(plan.summary.action_counts.get("place_hold"), Some(&2));
        assert_eq!(plan.summary.action_counts.get("create_case"), Some(&1));
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        let mut over = action("CREATE_CASE", false);
        over.confidence = 3.5;
        let mut under = action("ASSIGN_TEAM", false);
        under.confidence = -0.2;

        let payload = UpstreamActionPayload {
            primary_action: None,
            alternatives: vec![],
            ranked_actions: Some(vec![over, under]),
        };
        let plan = build_plan(&test_screening(Decision::Pass), payload);

        assert_eq!(plan.recommended_actions[0].confidence, 1.0);
        assert_eq!(plan.recommended_actions[1].confidence, 0.0);
    }

    #[test]
    fn explicit_category_wins_over_inference() {
        let mut explicit = action("MISC_STEP", false);
        explicit.category = Some(ActionCategory::FileReport);

        let payload = UpstreamActionPayload {
            primary_action: Some(explicit),
            alternatives: vec![],
            ranked_actions: None,
        };
        let plan = build_plan(&test_screening(Decision::Review), payload);
        assert_eq!(
            plan.recommended_actions[0].category,
            ActionCategory::FileReport
        );
    }

    #[test]
    fn malformed_recommendation_extracts_as_missing() {
        // action entries missing action_id fail deserialization
        let normalized = json!({
            "decision": "REVIEW",
            "ranked_actions": [{ "confidence": "not a number" }]
        });
        let payload = extract_recommendation(&normalized);
        assert!(matches!(payload.resolve(), ActionRecommendation::Missing));
    }

    #[test]
    fn plans_get_unique_identifiers() {
        let a = build_plan(
            &test_screening(Decision::Pass),
            UpstreamActionPayload::default(),
        );
        let b = build_plan(
            &test_screening(Decision::Pass),
            UpstreamActionPayload::default(),
        );
        assert_ne!(a.plan_id, b.plan_id);
    }
}
