/// Triage route: run the full pipeline on a raw upstream payload
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::dispatch::DispatchOptions;
use crate::logger::{self, LogTag};
use crate::pipeline;
use crate::webserver::state::AppState;
use crate::webserver::utils::{success_response, triage_error_response};

pub fn routes() -> Router<AppState> {
    Router::new().route("/triage/plan", post(create_plan))
}

#[derive(Debug, Deserialize, Default)]
struct TriageQuery {
    /// Execute approval-required actions (set by the approval workflow
    /// when re-submitting after sign-off)
    #[serde(default)]
    approvals_granted: bool,

    /// Build the plan and record every action as skipped
    #[serde(default)]
    dry_run: bool,
}

/// POST /triage/plan
///
/// Body: raw upstream payload (screening result + action recommendation).
/// 200: the issued plan with its execution record.
/// 4xx: structured field-level error array.
async fn create_plan(
    State(state): State<AppState>,
    Query(query): Query<TriageQuery>,
    Json(payload): Json<Value>,
) -> Response {
    let options = DispatchOptions {
        approvals_granted: query.approvals_granted,
        dry_run: query.dry_run || crate::arguments::is_dry_run_enabled(),
    };

    match pipeline::run_triage(&payload, &state.registry, &options).await {
        Ok(outcome) => {
            logger::info(
                LogTag::Webserver,
                &format!(
                    "POST /triage/plan plan_id={} actions={}",
                    outcome.plan.plan_id,
                    outcome.plan.recommended_actions.len()
                ),
            );
            success_response(outcome)
        }
        Err(err) => {
            logger::warning(
                LogTag::Webserver,
                &format!("POST /triage/plan rejected: {}", err),
            );
            triage_error_response(&err)
        }
    }
}
