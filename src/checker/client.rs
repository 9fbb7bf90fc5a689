use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::error::CheckError;
use super::types::CheckResponse;
use crate::state_machine::CheckVerdict;

const FACADE_URL: &str =
    "https://pine-facade.tradingview.com/pine-facade/save/new_draft/?allow_use_existing_draft=true";
const ORIGIN: &str = "https://www.tradingview.com";

/// Seam for the compile-check call, so the reconciler can be driven by a
/// stub in tests.
pub trait CompileCheck {
    fn check(
        &self,
        source: &str,
        session_token: &str,
    ) -> impl Future<Output = Result<CheckVerdict, CheckError>>;
}

/// Client for the pine-facade draft endpoint.
///
/// Submitting a draft validates the source against the account's current
/// editing session without saving it; the reply carries the compiler's
/// pass/fail and first error. The shared session is why callers must stay
/// strictly sequential.
pub struct CheckClient {
    client: Client,
    base_url: String,
}

impl CheckClient {
    pub fn new() -> Self {
        Self::with_base_url(FACADE_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");
        Self { client, base_url }
    }
}

impl Default for CheckClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CompileCheck for CheckClient {
    async fn check(&self, source: &str, session_token: &str) -> Result<CheckVerdict, CheckError> {
        let user_agent = format!("TWAPI/3.0 ({})", std::env::consts::OS);
        let response = self
            .client
            .post(&self.base_url)
            .header("cookie", format!("sessionid={session_token}"))
            .header("origin", ORIGIN)
            .header("referer", ORIGIN)
            .header("User-Agent", user_agent)
            .form(&[("source", source)])
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CheckError::AuthRejected {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(CheckError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let body: CheckResponse =
            serde_json::from_str(&text).map_err(|_| CheckError::Malformed(text))?;
        Ok(body.into_verdict())
    }
}
