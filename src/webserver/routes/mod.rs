use axum::Router;

use crate::webserver::state::AppState;

pub mod feedback;
pub mod status;
pub mod triage;

/// Assemble the full route table
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(triage::routes())
        .merge(feedback::routes())
        .merge(status::routes())
        .with_state(state)
}
