/// Structured error taxonomy for the triage pipeline
///
/// Every per-request failure is represented here so callers can render
/// field-level detail instead of a single opaque message. Only startup
/// configuration or schema-loading failures are treated as fatal.
use std::fmt;

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Clone)]
pub enum TriageError {
    /// Requested contract version has no registered schema or alias map
    UnknownSchemaVersion { version: String },

    /// Strict-mode normalization hit a field with no alias or canonical match
    UnknownField { version: String, path: String },

    /// Structural/semantic validation failed; carries every violated field
    SchemaValidation(SchemaValidationError),

    /// Malformed feedback payload
    InvalidFeedback { field: String, reason: String },

    /// Configuration problem (fatal at startup, never per-request)
    Configuration { message: String },
}

impl fmt::Display for TriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriageError::UnknownSchemaVersion { version } => {
                write!(f, "Unknown schema version '{}'", version)
            }
            TriageError::UnknownField { version, path } => {
                write!(
                    f,
                    "Field '{}' is not a known alias or canonical name for schema version '{}'",
                    path, version
                )
            }
            TriageError::SchemaValidation(e) => write!(f, "Schema validation failed: {}", e),
            TriageError::InvalidFeedback { field, reason } => {
                write!(f, "Invalid feedback field '{}': {}", field, reason)
            }
            TriageError::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for TriageError {}

impl TriageError {
    /// Whether this error is the caller's fault (4xx-equivalent)
    ///
    /// Everything except configuration failures maps to a client error:
    /// the request specified an unsupported contract, a stale field name,
    /// an invalid payload, or malformed feedback.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, TriageError::Configuration { .. })
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TriageError::UnknownSchemaVersion { .. } => "UNKNOWN_SCHEMA_VERSION",
            TriageError::UnknownField { .. } => "UNKNOWN_FIELD",
            TriageError::SchemaValidation(_) => "SCHEMA_VALIDATION_FAILED",
            TriageError::InvalidFeedback { .. } => "INVALID_FEEDBACK",
            TriageError::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// Field-level violation list for API error rendering
    ///
    /// Validation errors expose their full list; single-field errors are
    /// wrapped so the response shape is uniform.
    pub fn violations(&self) -> Vec<FieldViolation> {
        match self {
            TriageError::SchemaValidation(e) => e.violations.clone(),
            TriageError::UnknownField { path, .. } => vec![FieldViolation {
                path: path.clone(),
                reason: "unknown field".to_string(),
            }],
            TriageError::UnknownSchemaVersion { version } => vec![FieldViolation {
                path: "schema_version".to_string(),
                reason: format!("unsupported version '{}'", version),
            }],
            TriageError::InvalidFeedback { field, reason } => vec![FieldViolation {
                path: field.clone(),
                reason: reason.clone(),
            }],
            TriageError::Configuration { .. } => vec![],
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        TriageError::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid feedback error
    pub fn invalid_feedback(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TriageError::InvalidFeedback {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// VALIDATION ERROR DETAIL
// =============================================================================

/// One violated field: canonical path plus the reason it failed
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldViolation {
    pub path: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Validation failure carrying every violated field, never just the first
#[derive(Debug, Clone)]
pub struct SchemaValidationError {
    pub schema_version: String,
    pub violations: Vec<FieldViolation>,
}

impl SchemaValidationError {
    pub fn new(schema_version: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        Self {
            schema_version: schema_version.into(),
            violations,
        }
    }
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(
            f,
            "{} violation(s) against schema '{}': {}",
            self.violations.len(),
            self.schema_version,
            summary
        )
    }
}

impl From<SchemaValidationError> for TriageError {
    fn from(err: SchemaValidationError) -> Self {
        TriageError::SchemaValidation(err)
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        TriageError::Configuration {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_lists_every_violation() {
        let err = SchemaValidationError::new(
            "v2",
            vec![
                FieldViolation::new("decision", "must be one of PASS, REVIEW, FAIL"),
                FieldViolation::new("amount", "must be >= 0"),
            ],
        );
        let rendered = err.to_string();
        assert!(rendered.contains("decision"));
        assert!(rendered.contains("amount"));
        assert!(rendered.contains("2 violation(s)"));
    }

    #[test]
    fn client_error_classification() {
        assert!(TriageError::UnknownSchemaVersion {
            version: "v9".to_string()
        }
        .is_client_error());
        assert!(!TriageError::configuration("schema table empty").is_client_error());
    }

    #[test]
    fn single_field_errors_render_as_violation_arrays() {
        let err = TriageError::UnknownField {
            version: "v1".to_string(),
            path: "corridor.lane_code".to_string(),
        };
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "corridor.lane_code");
    }
}
