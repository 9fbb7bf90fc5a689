use std::time::Duration;

use reqwest::Client;

use super::error::OracleError;
use super::types::{ChatRequest, ChatResponse};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Seam for the repair-oracle call, mockable in tests.
pub trait RepairOracle {
    fn complete(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, OracleError>>;
}

/// Client for the OpenAI chat-completions endpoint.
pub struct OracleClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl OracleClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self { api_key, client, base_url }
    }
}

impl RepairOracle for OracleClient {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, OracleError> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(OracleError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(OracleError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<ChatResponse>().await?;
        if body.choices.is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::types::ChatMessage;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-3.5-turbo-16k".into(),
            temperature: 1.0,
            messages: vec![ChatMessage::user("fix this")],
        }
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "message": {"role": "assistant", "content": "repaired"},
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let client = OracleClient::with_base_url("sk-test".into(), server.uri());
        let resp = client.complete(&request()).await.unwrap();
        assert_eq!(resp.first_content(), Some("repaired"));
    }

    #[tokio::test]
    async fn rate_limit_reads_retry_after_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = OracleClient::with_base_url("sk-test".into(), server.uri());
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, OracleError::RateLimited { retry_after_ms: 7000 }));
    }

    #[tokio::test]
    async fn api_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let client = OracleClient::with_base_url("sk-bad".into(), server.uri());
        let err = client.complete(&request()).await.unwrap_err();
        match err {
            OracleError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid key");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-2",
                "choices": []
            })))
            .mount(&server)
            .await;

        let client = OracleClient::with_base_url("sk-test".into(), server.uri());
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, OracleError::EmptyResponse));
    }
}
