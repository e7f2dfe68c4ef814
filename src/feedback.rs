//! Feedback intake: validate reviewer feedback on an issued plan and
//! forward it to an external sink
//!
//! Feedback references plan identity only - it is accepted even if the
//! originating plan object is long gone, because audit and calibration
//! consumption happens asynchronously and out of process. The sink is an
//! external collaborator behind a trait; intake is not transactional
//! with it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

use crate::errors::TriageError;
use crate::logger::{self, LogTag};

/// Reviewer ids arrive pre-hashed; accept 16-64 hex chars
static REVIEWER_HASH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[a-f0-9]{16,64}$").expect("reviewer hash pattern is valid")
});

// =============================================================================
// TYPES
// =============================================================================

/// Outcome judgment a reviewer attaches to a delivered plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackLabel {
    /// The plan's actions were right as recommended
    #[serde(rename = "CONFIRMED")]
    Confirmed,

    /// The reviewer replaced the recommended actions
    #[serde(rename = "OVERRIDDEN")]
    Overridden,

    /// The case was escalated beyond the recommended handling
    #[serde(rename = "ESCALATED")]
    Escalated,

    /// No action was ultimately taken
    #[serde(rename = "NO_ACTION")]
    NoAction,
}

impl FeedbackLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackLabel::Confirmed => "CONFIRMED",
            FeedbackLabel::Overridden => "OVERRIDDEN",
            FeedbackLabel::Escalated => "ESCALATED",
            FeedbackLabel::NoAction => "NO_ACTION",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "CONFIRMED" => Some(FeedbackLabel::Confirmed),
            "OVERRIDDEN" => Some(FeedbackLabel::Overridden),
            "ESCALATED" => Some(FeedbackLabel::Escalated),
            "NO_ACTION" => Some(FeedbackLabel::NoAction),
            _ => None,
        }
    }
}

/// One piece of reviewer feedback keyed by plan identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub plan_id: String,
    pub label: String,
    pub action_fit: f64,
    pub reviewer_id_hash: String,
}

/// Receipt returned to the caller once feedback is accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    pub feedback_id: String,
    pub plan_id: String,
    pub label: FeedbackLabel,
    pub accepted_at: DateTime<Utc>,

    /// False when the external sink rejected the record; the feedback is
    /// still accepted at the API level and the failure is logged
    pub forwarded: bool,
}

// =============================================================================
// SINK BOUNDARY
// =============================================================================

/// External collaborator that persists validated feedback
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn record(&self, feedback: &Feedback, receipt: &FeedbackReceipt) -> Result<(), String>;
}

/// Default sink: forward to the logger (persistence is out of process)
pub struct LogFeedbackSink;

#[async_trait]
impl FeedbackSink for LogFeedbackSink {
    async fn record(&self, feedback: &Feedback, receipt: &FeedbackReceipt) -> Result<(), String> {
        logger::info(
            LogTag::Feedback,
            &format!(
                "feedback_id={} plan_id={} label={} action_fit={:.2}",
                receipt.feedback_id, feedback.plan_id, feedback.label, feedback.action_fit
            ),
        );
        Ok(())
    }
}

/// In-memory sink for tests and tooling
#[derive(Default)]
pub struct MemoryFeedbackSink {
    records: Mutex<Vec<Feedback>>,
}

impl MemoryFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Feedback> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FeedbackSink for MemoryFeedbackSink {
    async fn record(&self, feedback: &Feedback, _receipt: &FeedbackReceipt) -> Result<(), String> {
        self.records
            .lock()
            .map_err(|e| format!("feedback store poisoned: {}", e))?
            .push(feedback.clone());
        Ok(())
    }
}

// =============================================================================
// INTAKE
// =============================================================================

/// Validate and forward one piece of reviewer feedback
///
/// Fails with InvalidFeedbackError on an unknown label, an action_fit
/// outside [0,1], a malformed reviewer hash, or an empty plan id. Sink
/// failures degrade to a receipt with forwarded=false.
pub async fn accept_feedback(
    feedback: Feedback,
    sink: &dyn FeedbackSink,
) -> Result<FeedbackReceipt, TriageError> {
    if feedback.plan_id.trim().is_empty() {
        return Err(TriageError::invalid_feedback("plan_id", "must not be empty"));
    }

    let label = FeedbackLabel::parse(&feedback.label).ok_or_else(|| {
        TriageError::invalid_feedback(
            "label",
            "must be one of CONFIRMED, OVERRIDDEN, ESCALATED, NO_ACTION",
        )
    })?;

    if !feedback.action_fit.is_finite() || !(0.0..=1.0).contains(&feedback.action_fit) {
        return Err(TriageError::invalid_feedback(
            "action_fit",
            "must be within [0, 1]",
        ));
    }

    if !REVIEWER_HASH_PATTERN.is_match(&feedback.reviewer_id_hash) {
        return Err(TriageError::invalid_feedback(
            "reviewer_id_hash",
            "must be 16-64 lowercase hex characters",
        ));
    }

    let receipt = FeedbackReceipt {
        feedback_id: Uuid::new_v4().to_string(),
        plan_id: feedback.plan_id.clone(),
        label,
        accepted_at: Utc::now(),
        forwarded: true,
    };

    match sink.record(&feedback, &receipt).await {
        Ok(()) => Ok(receipt),
        Err(e) => {
            logger::warning(
                LogTag::Feedback,
                &format!(
                    "feedback_id={} sink rejected the record: {}",
                    receipt.feedback_id, e
                ),
            );
            Ok(FeedbackReceipt {
                forwarded: false,
                ..receipt
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_feedback() -> Feedback {
        Feedback {
            plan_id: "3f0c9f24-8a94-4c7e-9b34-7a2a4af0e21d".to_string(),
            label: "CONFIRMED".to_string(),
            action_fit: 0.85,
            reviewer_id_hash: "9b34f0c98a944c7e".to_string(),
        }
    }

    #[tokio::test]
    async fn valid_feedback_is_accepted_and_forwarded() {
        let sink = MemoryFeedbackSink::new();
        let receipt = accept_feedback(test_feedback(), &sink)
            .await
            .expect("valid feedback");

        assert_eq!(receipt.label, FeedbackLabel::Confirmed);
        assert!(receipt.forwarded);
        assert_eq!(sink.recorded().len(), 1);
        assert_eq!(sink.recorded()[0].plan_id, receipt.plan_id);
    }

    #[tokio::test]
    async fn unknown_label_is_rejected() {
        let mut feedback = test_feedback();
        feedback.label = "MAYBE".to_string();

        let err = accept_feedback(feedback, &MemoryFeedbackSink::new())
            .await
            .expect_err("unknown label");
        assert!(matches!(
            err,
            TriageError::InvalidFeedback { ref field, .. } if field == "label"
        ));
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        for bad in [-0.1, 1.5, f64::NAN] {
            let mut feedback = test_feedback();
            feedback.action_fit = bad;

            let err = accept_feedback(feedback, &MemoryFeedbackSink::new())
                .await
                .expect_err("score outside [0,1]");
            assert!(matches!(
                err,
                TriageError::InvalidFeedback { ref field, .. } if field == "action_fit"
            ));
        }
    }

    #[tokio::test]
    async fn malformed_reviewer_hash_is_rejected() {
        let mut feedback = test_feedback();
        feedback.reviewer_id_hash = "Reviewer Seven".to_string();

        let err = accept_feedback(feedback, &MemoryFeedbackSink::new())
            .await
            .expect_err("not a hash");
        assert!(matches!(
            err,
            TriageError::InvalidFeedback { ref field, .. } if field == "reviewer_id_hash"
        ));
    }

    #[tokio::test]
    async fn feedback_outlives_the_plan_object() {
        // No plan registry is consulted: an id for a long-discarded plan
        // is still accepted
        let mut feedback = test_feedback();
        feedback.plan_id = "plan-discarded-months-ago".to_string();

        let receipt = accept_feedback(feedback, &MemoryFeedbackSink::new())
            .await
            .expect("accepted without plan residency");
        assert_eq!(receipt.plan_id, "plan-discarded-months-ago");
    }

    struct RejectingSink;

    #[async_trait]
    impl FeedbackSink for RejectingSink {
        async fn record(&self, _: &Feedback, _: &FeedbackReceipt) -> Result<(), String> {
            Err("store offline".to_string())
        }
    }

    #[tokio::test]
    async fn sink_failure_degrades_to_unforwarded_receipt() {
        let receipt = accept_feedback(test_feedback(), &RejectingSink)
            .await
            .expect("intake still succeeds");
        assert!(!receipt.forwarded);
    }
}
