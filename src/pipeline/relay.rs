//! HTTP client for the LLM relay.
//!
//! The relay is a small service that forwards `{"prompt": …}` to a hosted
//! model and answers `{"response": …}` (200) or `{"error": …}` (non-200).
//! One request per call, no retries; the per-request timeout is the only
//! bound on how long a generator-loop item can take.

use crate::config::PipelineConfig;
use crate::error::{RelayError, S2vError};
use crate::pipeline::generate::TextGenerator;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const UNKNOWN_RELAY_ERROR: &str = "Unknown error from relay server.";

#[derive(Serialize)]
struct RelayRequest<'a> {
    prompt: &'a str,
}

/// Client for one relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    url: String,
    timeout_secs: u64,
}

impl RelayClient {
    /// Create a client posting to `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, S2vError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| S2vError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            timeout_secs,
        })
    }

    /// Create a client from `config.relay_url` and `config.relay_timeout_secs`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, S2vError> {
        let url = config.relay_url.as_deref().ok_or_else(|| {
            S2vError::InvalidConfig(
                "no relay URL configured\n  Set --relay-url or S2V_RELAY_URL".to_string(),
            )
        })?;
        Self::new(url, config.relay_timeout_secs)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one prompt and return the model's text, or the typed failure.
    pub async fn try_generate(&self, prompt: &str) -> Result<String, RelayError> {
        debug!(
            "POST {} ({} prompt chars, timeout {}s)",
            self.url,
            prompt.chars().count(),
            self.timeout_secs
        );

        let response = self
            .client
            .post(&self.url)
            .json(&RelayRequest { prompt })
            .send()
            .await
            .map_err(|e| RelayError::Unreachable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RelayError::Unreachable {
            reason: e.to_string(),
        })?;
        let json: Option<Value> = serde_json::from_str(&body).ok();

        if status == StatusCode::OK {
            json.as_ref()
                .and_then(|v| v.get("response"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(RelayError::MalformedBody)
        } else {
            let details = json
                .as_ref()
                .and_then(|v| v.get("error"))
                .map(|e| match e {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| UNKNOWN_RELAY_ERROR.to_string());
            Err(RelayError::Status {
                status: status.as_u16(),
                details,
            })
        }
    }
}

#[async_trait]
impl TextGenerator for RelayClient {
    async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(e) => e.to_sentinel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> RelayClient {
        RelayClient::new(format!("{}/generate", server.uri()), 5).unwrap()
    }

    #[test]
    fn from_config_requires_url() {
        let err = RelayClient::from_config(&PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, S2vError::InvalidConfig(_)));

        let config = PipelineConfig::builder()
            .relay_url("http://127.0.0.1:8000/generate")
            .build()
            .unwrap();
        let client = RelayClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8000/generate");
    }

    #[tokio::test]
    async fn returns_response_field_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(body_json(serde_json::json!({ "prompt": "hello" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": "PANEL 001" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.generate("hello").await, "PANEL 001");
    }

    #[tokio::test]
    async fn missing_response_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": "x" })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.try_generate("p").await, Err(RelayError::MalformedBody));
        assert_eq!(client.generate("p").await, "Error: Response JSON was malformed.");
    }

    #[tokio::test]
    async fn non_200_carries_status_and_error_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(serde_json::json!({ "error": "quota exhausted" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(
            client.generate("p").await,
            "Error: Relay server responded with status 503. Details: quota exhausted"
        );
    }

    #[tokio::test]
    async fn non_200_without_json_uses_generic_details() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(
            client.try_generate("p").await,
            Err(RelayError::Status {
                status: 500,
                details: UNKNOWN_RELAY_ERROR.to_string()
            })
        );
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_sentinel_not_a_panic() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = RelayClient::new("http://127.0.0.1:9/generate", 2).unwrap();
        let out = client.generate("p").await;
        assert!(
            out.starts_with("Error: Could not connect to the relay server. Reason:"),
            "got: {out}"
        );
    }

    #[tokio::test]
    async fn slow_relay_times_out_as_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "response": "late" }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = RelayClient::new(format!("{}/generate", server.uri()), 1).unwrap();
        assert!(matches!(
            client.try_generate("p").await,
            Err(RelayError::Unreachable { .. })
        ));
    }
}
