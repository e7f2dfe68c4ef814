//! Action dispatcher: execute a plan's recommended actions exactly once
//! per idempotency key against the adapter registry
//!
//! Adapter failures are captured per-action and never fail the plan:
//! a downstream outage degrades to a partial execution record, and the
//! caller decides whether to retry individual actions. Actions are
//! issued in canonical plan order with bounded look-ahead concurrency,
//! so adapters that impose ordering (a hold before case creation) see
//! the intended sequence.

mod adapters;
mod http;
mod types;

pub use adapters::{AdapterRegistry, DownstreamAdapter, StubAdapter};
pub use http::WebhookAdapter;
pub use types::{
    ActionExecution, ActionStatus, AdapterError, AdapterRequest, AdapterResponse, DispatchOptions,
    ExecutionRecord, IdempotencyKey,
};

use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::config::with_config;
use crate::logger::{self, LogTag};
use crate::plan::{Plan, PlannedAction};

/// Dispatch every recommended action of a plan
///
/// Cancellation note: if the caller is cancelled mid-dispatch, already
/// issued adapter calls are not retracted - the idempotency keys make a
/// subsequent retry safe, they do not undo in-flight effects.
pub async fn dispatch(
    plan: &Plan,
    registry: &AdapterRegistry,
    options: &DispatchOptions,
) -> ExecutionRecord {
    let started_at = Utc::now();
    let timeout_ms = with_config(|cfg| cfg.dispatch.action_timeout_ms);
    let concurrency = with_config(|cfg| cfg.dispatch.concurrency).max(1);

    let mut futures = Vec::with_capacity(plan.recommended_actions.len());
    for action in plan.recommended_actions.iter() {
        futures.push(execute_action(plan, action, registry, options, timeout_ms));
    }
    let actions: Vec<ActionExecution> = stream::iter(futures)
        .buffered(concurrency)
        .collect()
        .await;

    let record = ExecutionRecord {
        plan_id: plan.plan_id.clone(),
        started_at,
        completed_at: Utc::now(),
        actions,
    };

    logger::info(
        LogTag::Dispatch,
        &format!(
            "plan_id={} queued={} failed={} skipped={}",
            record.plan_id,
            record.queued_count(),
            record.failed_count(),
            record.skipped_count()
        ),
    );

    record
}

/// Execute (or skip) a single planned action
async fn execute_action(
    plan: &Plan,
    action: &PlannedAction,
    registry: &AdapterRegistry,
    options: &DispatchOptions,
    timeout_ms: u64,
) -> ActionExecution {
    let key = IdempotencyKey::derive(&plan.plan_id, &action.action_id);
    let start = Instant::now();

    if options.dry_run {
        return skipped(action, key, start, "dry run");
    }

    if action.requires_approval && !options.approvals_granted {
        return skipped(action, key, start, "awaiting approval");
    }

    let adapter = match registry.get(action.category) {
        Some(adapter) => adapter,
        None => return skipped(action, key, start, "no adapter for category"),
    };

    let request = AdapterRequest {
        idempotency_key: key.clone(),
        action_id: action.action_id.clone(),
        parameters: action.parameters.clone(),
    };

    let outcome = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        adapter.execute(&request),
    )
    .await;

    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok(response)) => {
            logger::debug(
                LogTag::Dispatch,
                &format!(
                    "action_id={} adapter={} status={} reference={}",
                    action.action_id,
                    adapter.name(),
                    response.status,
                    response.reference_id
                ),
            );
            ActionExecution {
                action_id: action.action_id.clone(),
                category: action.category,
                idempotency_key: key,
                status: ActionStatus::Queued,
                reference_id: Some(response.reference_id),
                error: None,
                skipped_reason: None,
                duration_ms,
            }
        }
        Ok(Err(err)) => {
            logger::warning(
                LogTag::Dispatch,
                &format!(
                    "action_id={} adapter={} failed: {}",
                    action.action_id,
                    adapter.name(),
                    err
                ),
            );
            ActionExecution {
                action_id: action.action_id.clone(),
                category: action.category,
                idempotency_key: key,
                status: ActionStatus::Failed,
                reference_id: None,
                error: Some(err.to_string()),
                skipped_reason: None,
                duration_ms,
            }
        }
        Err(_) => {
            let err = AdapterError::Timeout { timeout_ms };
            logger::warning(
                LogTag::Dispatch,
                &format!("action_id={} {}", action.action_id, err),
            );
            ActionExecution {
                action_id: action.action_id.clone(),
                category: action.category,
                idempotency_key: key,
                status: ActionStatus::Failed,
                reference_id: None,
                error: Some(err.to_string()),
                skipped_reason: None,
                duration_ms,
            }
        }
    }
}

fn skipped(
    action: &PlannedAction,
    key: IdempotencyKey,
    start: Instant,
    reason: &str,
) -> ActionExecution {
    logger::debug(
        LogTag::Dispatch,
        &format!("action_id={} skipped: {}", action.action_id, reason),
    );
    ActionExecution {
        action_id: action.action_id.clone(),
        category: action.category,
        idempotency_key: key,
        status: ActionStatus::Skipped,
        reference_id: None,
        error: None,
        skipped_reason: Some(reason.to_string()),
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{build_plan, ActionCategory, UpstreamAction, UpstreamActionPayload};
    use crate::validation::{Corridor, Decision, ScreeningResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    fn test_screening() -> ScreeningResult {
        ScreeningResult {
            schema_version: "v2".to_string(),
            decision: Decision::Review,
            rule_codes: vec!["AML.R1".to_string()],
            corridor: Corridor {
                origin_country: "USA".to_string(),
                destination_country: "PHL".to_string(),
                channel: "WIRE".to_string(),
                currency: Some("USD".to_string()),
            },
            amount: 4200.0,
        }
    }

    fn action(id: &str, requires_approval: bool) -> UpstreamAction {
        UpstreamAction {
            action_id: id.to_string(),
            category: None,
            confidence: 0.7,
            requires_approval,
            parameters: json!({ "note": "test" }),
        }
    }

    fn ranked_plan(actions: Vec<UpstreamAction>) -> crate::plan::Plan {
        build_plan(
            &test_screening(),
            UpstreamActionPayload {
                primary_action: None,
                alternatives: vec![],
                ranked_actions: Some(actions),
            },
        )
    }

    #[tokio::test]
    async fn repeated_dispatch_reuses_keys_and_skips_duplicate_transitions() {
        let plan = ranked_plan(vec![
            action("PLACE_SOFT_HOLD", false),
            action("CREATE_CASE", false),
        ]);
        let registry = AdapterRegistry::stub_registry();
        let options = DispatchOptions::default();

        let first = dispatch(&plan, &registry, &options).await;
        let second = dispatch(&plan, &registry, &options).await;

        assert_eq!(first.queued_count(), 2);
        assert_eq!(second.queued_count(), 2);
        for (a, b) in first.actions.iter().zip(second.actions.iter()) {
            assert_eq!(a.idempotency_key, b.idempotency_key);
            // The stub replayed its stored response: same downstream reference
            assert_eq!(a.reference_id, b.reference_id);
        }
    }

    #[tokio::test]
    async fn record_preserves_canonical_plan_order() {
        let plan = ranked_plan(vec![
            action("PLACE_SOFT_HOLD", false),
            action("CREATE_CASE", false),
            action("ASSIGN_TEAM", false),
        ]);
        let registry = AdapterRegistry::stub_registry();

        let record = dispatch(&plan, &registry, &DispatchOptions::default()).await;
        let ids: Vec<&str> = record.actions.iter().map(|a| a.action_id.as_str()).collect();
        assert_eq!(ids, vec!["PLACE_SOFT_HOLD", "CREATE_CASE", "ASSIGN_TEAM"]);
    }

    #[tokio::test]
    async fn approval_required_actions_wait_for_sign_off() {
        let plan = ranked_plan(vec![
            action("FILE_STR", true),
            action("ASSIGN_TEAM", false),
        ]);
        let registry = AdapterRegistry::stub_registry();

        let record = dispatch(&plan, &registry, &DispatchOptions::default()).await;
        assert_eq!(record.actions[0].status, ActionStatus::Skipped);
        assert_eq!(
            record.actions[0].skipped_reason.as_deref(),
            Some("awaiting approval")
        );
        assert_eq!(record.actions[1].status, ActionStatus::Queued);

        // After sign-off the same action executes under the same key
        let granted = DispatchOptions {
            approvals_granted: true,
            ..Default::default()
        };
        let retry = dispatch(&plan, &registry, &granted).await;
        assert_eq!(retry.actions[0].status, ActionStatus::Queued);
        assert_eq!(
            retry.actions[0].idempotency_key,
            record.actions[0].idempotency_key
        );

        let merged = ExecutionRecord::merge(&record, &retry);
        assert_eq!(merged.queued_count(), 2);
    }

    #[tokio::test]
    async fn unmapped_category_is_skipped_not_failed() {
        let plan = ranked_plan(vec![action("DO_SOMETHING_ELSE", false)]);
        let registry = AdapterRegistry::stub_registry();

        let record = dispatch(&plan, &registry, &DispatchOptions::default()).await;
        assert_eq!(record.actions[0].status, ActionStatus::Skipped);
        assert_eq!(
            record.actions[0].skipped_reason.as_deref(),
            Some("no adapter for category")
        );
    }

    #[tokio::test]
    async fn dry_run_touches_no_adapter() {
        let plan = ranked_plan(vec![action("CREATE_CASE", false)]);
        let registry = AdapterRegistry::stub_registry();
        let options = DispatchOptions {
            dry_run: true,
            ..Default::default()
        };

        let record = dispatch(&plan, &registry, &options).await;
        assert_eq!(record.skipped_count(), 1);

        // The real dispatch afterwards is the first transition the stub sees
        let record = dispatch(&plan, &registry, &DispatchOptions::default()).await;
        assert_eq!(record.actions[0].reference_id.as_deref(), Some("case-0001"));
    }

    struct OutageAdapter;

    #[async_trait]
    impl DownstreamAdapter for OutageAdapter {
        fn capability(&self) -> ActionCategory {
            ActionCategory::CreateCase
        }

        fn name(&self) -> &str {
            "outage-create-case"
        }

        async fn execute(
            &self,
            _request: &AdapterRequest,
        ) -> Result<AdapterResponse, AdapterError> {
            Err(AdapterError::Unavailable {
                reason: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn one_failing_adapter_degrades_to_a_partial_record() {
        let plan = ranked_plan(vec![
            action("CREATE_CASE", false),
            action("PLACE_SOFT_HOLD", false),
        ]);

        let mut registry = AdapterRegistry::stub_registry();
        registry.register(Arc::new(OutageAdapter));

        let record = dispatch(&plan, &registry, &DispatchOptions::default()).await;

        assert_eq!(record.actions[0].status, ActionStatus::Failed);
        assert!(record.actions[0]
            .error
            .as_deref()
            .is_some_and(|e| e.contains("unavailable")));
        assert_eq!(record.actions[1].status, ActionStatus::Queued);
    }
}
