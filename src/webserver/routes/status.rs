/// Health route
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::json;

use crate::contracts;
use crate::webserver::state::AppState;
use crate::webserver::utils::success_response;

pub fn routes() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// GET /healthz
///
/// Reports the active default contract version so producers can confirm
/// which contract a deployment speaks.
async fn healthz(State(state): State<AppState>) -> Response {
    success_response(json!({
        "schema_version": contracts::default_schema_version(),
        "supported_versions": contracts::registered_versions(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}
