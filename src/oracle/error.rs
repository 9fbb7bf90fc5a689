//! Error types for the repair-oracle client.
//!
//! All variants are transport-level: the oracle produced no usable response,
//! so the failing item must be left untouched and retried on a later run.

use thiserror::Error;

/// Failures talking to the chat-completions endpoint.
#[derive(Debug, Error)]
pub enum OracleError {
    /// HTTP 429 — quota or rate limit. `retry_after_ms` comes from the
    /// `retry-after` header when present.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Any other non-success HTTP status (invalid key, server error).
    #[error("oracle returned status {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Underlying network failure (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 200 reply that carried no choices to read a completion from.
    #[error("oracle response contained no choices")]
    EmptyResponse,
}
