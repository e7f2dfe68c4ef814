/// Feedback route: accept reviewer feedback on an issued plan
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use crate::feedback::{accept_feedback, Feedback};
use crate::logger::{self, LogTag};
use crate::webserver::state::AppState;
use crate::webserver::utils::{success_response, triage_error_response};

pub fn routes() -> Router<AppState> {
    Router::new().route("/feedback", post(submit_feedback))
}

/// POST /feedback
///
/// Body: {plan_id, label, action_fit, reviewer_id_hash}.
/// 200: {status: "accepted", feedback_id}.
/// 4xx: invalid label, score, or reviewer hash.
async fn submit_feedback(State(state): State<AppState>, Json(feedback): Json<Feedback>) -> Response {
    match accept_feedback(feedback, state.feedback_sink.as_ref()).await {
        Ok(receipt) => success_response(json!({
            "status": "accepted",
            "feedback_id": receipt.feedback_id,
            "forwarded": receipt.forwarded,
        })),
        Err(err) => {
            logger::warning(
                LogTag::Webserver,
                &format!("POST /feedback rejected: {}", err),
            );
            triage_error_response(&err)
        }
    }
}
