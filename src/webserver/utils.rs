/// Response helpers shared by all route modules
///
/// Success responses wrap the payload as-is; error responses carry a
/// stable code, a message, and a field-level violation array so clients
/// can render the complete correction list.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::errors::{FieldViolation, TriageError};

/// 200 with the payload serialized as JSON
pub fn success_response<T: Serialize>(payload: T) -> Response {
    (StatusCode::OK, Json(payload)).into_response()
}

/// Structured error with code, message, and field violations
pub fn error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    violations: Vec<FieldViolation>,
) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": code,
                "message": message,
                "violations": violations,
            }
        })),
    )
        .into_response()
}

/// Map a pipeline error onto its HTTP shape
pub fn triage_error_response(err: &TriageError) -> Response {
    let status = if err.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_response(status, err.code(), &err.to_string(), err.violations())
}
