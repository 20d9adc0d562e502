use crate::config::EngineConfig;
use crate::engine::api::{EngineErrorBody, GenerateRequest, GenerateResponse, ListModelsResponse};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Engine failure, split by how much structure the engine gave us
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine reported the fault itself (HTTP 4xx with an error body),
    /// e.g. an unknown model name. Maps to a client error upstream.
    #[error("{0}")]
    Classified(String),

    /// Transport failure, malformed reply, or an engine-side 5xx
    #[error("{0}")]
    Unclassified(String),
}

/// HTTP client for a local Ollama instance
#[derive(Clone)]
pub struct EngineClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl EngineClient {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    /// List the models installed on the engine
    pub async fn list_models(&self) -> Result<Vec<String>, EngineError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await?;

        let tags: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Unclassified(format!("invalid engine response: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.model).collect())
    }

    /// Run a single-shot (non-streaming) generation
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, EngineError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Unclassified(format!("invalid engine response: {}", e)))?;

        Ok(body.response)
    }
}

fn transport_error(err: reqwest::Error) -> EngineError {
    if err.is_timeout() {
        EngineError::Unclassified(format!("engine request timed out: {}", err))
    } else {
        EngineError::Unclassified(err.to_string())
    }
}

/// Classify non-success responses: a 4xx with an engine error body is a
/// classified fault, everything else is not.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, EngineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<EngineErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    if status.is_client_error() {
        Err(EngineError::Classified(message))
    } else {
        Err(EngineError::Unclassified(format!(
            "engine returned HTTP {}: {}",
            status.as_u16(),
            message
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn create_test_client(base_url: &str) -> EngineClient {
        EngineClient::new(&EngineConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        })
    }

    #[tokio::test]
    async fn test_list_models() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(200)
                    .json_body(json!({"models": [{"model": "llama2"}, {"model": "mistral"}]}));
            })
            .await;

        let client = create_test_client(&server.base_url());
        let models = client.list_models().await.unwrap();

        assert_eq!(models, vec!["llama2", "mistral"]);
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body(json!({"model": "llama2", "prompt": "hi", "stream": false}));
                then.status(200)
                    .json_body(json!({"model": "llama2", "response": "Hello!", "done": true}));
            })
            .await;

        let client = create_test_client(&server.base_url());
        let text = client.generate("llama2", "hi").await.unwrap();

        assert_eq!(text, "Hello!");
    }

    #[tokio::test]
    async fn test_generate_unknown_model_is_classified() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(404)
                    .json_body(json!({"error": "model 'missing' not found"}));
            })
            .await;

        let client = create_test_client(&server.base_url());
        let err = client.generate("missing", "hi").await.unwrap_err();

        match err {
            EngineError::Classified(msg) => assert_eq!(msg, "model 'missing' not found"),
            EngineError::Unclassified(msg) => panic!("expected classified error, got: {}", msg),
        }
    }

    #[tokio::test]
    async fn test_engine_5xx_is_unclassified() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(500).body("engine exploded");
            })
            .await;

        let client = create_test_client(&server.base_url());
        let err = client.list_models().await.unwrap_err();

        match err {
            EngineError::Unclassified(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("engine exploded"));
            }
            EngineError::Classified(msg) => panic!("expected unclassified error, got: {}", msg),
        }
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_unclassified() {
        // Port 1 is never listening
        let client = create_test_client("http://127.0.0.1:1");
        let err = client.list_models().await.unwrap_err();

        assert!(matches!(err, EngineError::Unclassified(_)));
    }
}
