//! Client for the remote completion service.
//!
//! Speaks the Gemini `generateContent` wire format: a prompt goes out as
//! `{"contents":[{"parts":[{"text":...}]}]}` and the generated text comes
//! back as the first part of the first candidate. Each call is a stateless
//! single-turn request; no conversation history is forwarded.

use crate::config::Config;
use serde::{Deserialize, Serialize};

/// Request body for a `generateContent` call.
#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

/// A content block: an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

/// A single text part.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Response body for a `generateContent` call.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Client for a Gemini-style `generateContent` endpoint.
///
/// Cheap to clone; clones share the underlying connection pool, so the
/// event loop can hand a copy to each spawned request task.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    config: Config,
}

impl CompletionClient {
    /// Create a client from an explicit configuration.
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Model identifier this client sends requests to.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a single-turn prompt and return the generated text.
    ///
    /// Transport failure, a non-success status, an undecodable body, and a
    /// body with no candidate text all come back as [`CompletionError`].
    /// No retry and no timeout beyond the transport default.
    pub async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(model = %self.config.model, "sending completion request");

        let response = self
            .client
            .post(self.config.generate_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Status(status));
        }

        let decoded: GenerateResponse = response.json().await.map_err(CompletionError::Decode)?;

        decoded
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or(CompletionError::NoCandidates)
    }
}

/// Errors that can occur when calling the completion service.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Transport-level failure (connection, DNS, request build).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("service returned {0}")]
    Status(reqwest::StatusCode),

    /// Response body did not decode as the expected shape.
    #[error("undecodable response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// Response decoded but carried no candidate text.
    #[error("response contained no candidate text")]
    NoCandidates,

    /// The in-flight request stopped without reporting a result.
    #[error("request ended without a result")]
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> CompletionClient {
        CompletionClient::new(Config {
            endpoint: server.uri(),
            model: "gemini-pro".into(),
            api_key: "test-key".into(),
        })
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_json(serde_json::json!({
                "contents": [{ "parts": [{ "text": "hello" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "hi there" }] } }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let text = client.generate("hello").await.unwrap();
        assert_eq!(text, "hi there");
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_generate_missing_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "unexpected": true })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::NoCandidates));
    }

    #[tokio::test]
    async fn test_generate_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)));
    }

    #[tokio::test]
    async fn test_generate_empty_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "" }] } }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::NoCandidates));
    }

    #[tokio::test]
    async fn test_generate_transport_failure() {
        // Nothing is listening on this port.
        let client = CompletionClient::new(Config {
            endpoint: "http://127.0.0.1:9".into(),
            model: "gemini-pro".into(),
            api_key: "test-key".into(),
        });
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
    }
}
