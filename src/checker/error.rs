//! Error types for the compile-check client.
//!
//! Every variant here is a transport failure in the loop's taxonomy: the
//! checker never confirmed a pass or a fail, so the caller must leave the
//! in-flight item exactly as found. A checker-confirmed rejection is not an
//! error — it comes back as [`CheckVerdict::Fail`](crate::state_machine::CheckVerdict).

use thiserror::Error;

/// Failures talking to the compile-check endpoint.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The session credential was rejected (HTTP 401/403). Requires
    /// re-authentication via the session provider before further checks.
    #[error("session rejected by checker (status {status})")]
    AuthRejected { status: u16 },

    /// Any other non-success HTTP status from the endpoint.
    #[error("checker returned status {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Underlying network failure (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered 200 but the body was not the expected JSON.
    #[error("unrecognized checker response: {0}")]
    Malformed(String),
}
