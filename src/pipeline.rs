//! The per-request unit of work: validate -> build plan -> dispatch
//!
//! Each triage request runs independently; the only shared state is the
//! read-only contract registry cache. Retries re-enter through
//! [`redispatch`], which applies the explicit execution-record merge
//! instead of accumulating results implicitly.

use serde_json::Value;

use crate::dispatch::{self, AdapterRegistry, DispatchOptions, ExecutionRecord};
use crate::errors::TriageError;
use crate::logger::{self, LogTag};
use crate::plan::{self, Plan};
use crate::validation;

/// Output of one triage request: the issued plan plus its dispatch record
#[derive(Debug, Clone, serde::Serialize)]
pub struct TriageOutcome {
    pub plan: Plan,
    pub execution: ExecutionRecord,
}

/// Run the full triage pipeline on a raw upstream payload
///
/// Validation failures surface as structured errors; everything after a
/// successful validation degrades (manual-review flags, per-action
/// failure records) rather than failing the request.
pub async fn run_triage(
    raw: &Value,
    registry: &AdapterRegistry,
    options: &DispatchOptions,
) -> Result<TriageOutcome, TriageError> {
    let validated = validation::validate(raw)?;

    logger::debug(
        LogTag::System,
        &format!(
            "triage start version={} decision={} rules={}",
            validated.schema_version,
            validated.result.decision,
            validated.result.rule_codes.len()
        ),
    );

    let recommendation = plan::extract_recommendation(&validated.normalized);
    let plan = plan::build_plan(&validated.result, recommendation);
    let execution = dispatch::dispatch(&plan, registry, options).await;

    Ok(TriageOutcome { plan, execution })
}

/// Build a plan without dispatching (tooling and previews)
pub fn preview_plan(raw: &Value) -> Result<Plan, TriageError> {
    let validated = validation::validate(raw)?;
    let recommendation = plan::extract_recommendation(&validated.normalized);
    Ok(plan::build_plan(&validated.result, recommendation))
}

/// Re-dispatch an issued plan and merge the outcome into a previous record
///
/// Used after approvals are granted or a downstream outage clears. The
/// idempotency keys are identical to the first pass, so downstream
/// systems deduplicate anything that already took effect.
pub async fn redispatch(
    plan: &Plan,
    previous: &ExecutionRecord,
    registry: &AdapterRegistry,
    options: &DispatchOptions,
) -> ExecutionRecord {
    let delta = dispatch::dispatch(plan, registry, options).await;
    ExecutionRecord::merge(previous, &delta)
}
