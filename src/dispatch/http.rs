/// Webhook adapter: executes a capability against a configured HTTP
/// endpoint
///
/// The live-integration counterpart of the stub adapter. Posts the
/// uniform (idempotency_key, action_id, parameters) request body and
/// expects the uniform {status, reference_id, echoed_payload} response;
/// downstream services own their idempotency handling keyed by the
/// request's key.
use async_trait::async_trait;
use reqwest::Client;

use crate::logger::{self, LogTag};
use crate::plan::ActionCategory;

use super::adapters::DownstreamAdapter;
use super::types::{AdapterError, AdapterRequest, AdapterResponse};

pub struct WebhookAdapter {
    capability: ActionCategory,
    name: String,
    endpoint: String,
    client: Client,
}

impl WebhookAdapter {
    pub fn new(capability: ActionCategory, endpoint: String) -> Self {
        Self {
            capability,
            name: format!("webhook-{}", capability.as_str()),
            endpoint,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DownstreamAdapter for WebhookAdapter {
    fn capability(&self) -> ActionCategory {
        self.capability
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, request: &AdapterRequest) -> Result<AdapterResponse, AdapterError> {
        logger::debug(
            LogTag::Adapter,
            &format!(
                "adapter={} endpoint={} action_id={} key={}",
                self.name, self.endpoint, request.action_id, request.idempotency_key
            ),
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AdapterError::Unavailable {
                reason: format!("{}: {}", self.endpoint, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Rejected {
                reason: format!("HTTP {} from {}: {}", status.as_u16(), self.endpoint, body),
            });
        }

        response
            .json::<AdapterResponse>()
            .await
            .map_err(|e| AdapterError::Rejected {
                reason: format!("malformed adapter response from {}: {}", self.endpoint, e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::types::IdempotencyKey;
    use serde_json::json;

    #[test]
    fn request_body_carries_the_uniform_shape() {
        let request = AdapterRequest {
            idempotency_key: IdempotencyKey::derive("plan-1", "FILE_STR"),
            action_id: "FILE_STR".to_string(),
            parameters: json!({ "jurisdiction": "SGP" }),
        };

        let body = serde_json::to_value(&request).expect("serializable");
        assert!(body["idempotency_key"].is_string());
        assert_eq!(body["action_id"], json!("FILE_STR"));
        assert_eq!(body["parameters"]["jurisdiction"], json!("SGP"));
    }

    #[test]
    fn response_parses_from_the_uniform_shape() {
        let raw = json!({
            "status": "accepted",
            "reference_id": "CASE-2024-0042",
            "echoed_payload": { "jurisdiction": "SGP" }
        });
        let parsed: AdapterResponse = serde_json::from_value(raw).expect("parseable");
        assert_eq!(parsed.status, "accepted");
        assert_eq!(parsed.reference_id, "CASE-2024-0042");
    }
}
