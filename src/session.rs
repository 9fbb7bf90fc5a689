//! Credential provider seam for the checker session.
//!
//! The signin bootstrap that mints session ids lives outside this crate; the
//! loop only needs a current token and a way to ask for a fresh one after
//! the checker rejects it. [`StaticSession`] is the in-crate implementation:
//! a token taken from the store (or the `TV_SESSIONID` environment variable)
//! that cannot be refreshed from inside the process.

use anyhow::{Result, bail};

/// Source of the checker session credential.
pub trait SessionProvider {
    /// The token to attach to the next check.
    fn token(&self) -> &str;

    /// Obtain a fresh token after an auth rejection. Returns the new token
    /// on success so the caller can persist it into the store.
    fn refresh(&mut self) -> impl Future<Output = Result<String>>;
}

/// A fixed token with no refresh capability.
pub struct StaticSession {
    token: String,
}

impl StaticSession {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    /// Prefer the `TV_SESSIONID` environment variable over the stored token.
    pub fn from_store_or_env(stored: &str) -> Self {
        let token = std::env::var("TV_SESSIONID")
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| stored.to_string());
        Self::new(token)
    }
}

impl SessionProvider for StaticSession {
    fn token(&self) -> &str {
        &self.token
    }

    async fn refresh(&mut self) -> Result<String> {
        bail!("session rejected and no signin bootstrap is available; set TV_SESSIONID and re-run")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_session_exposes_token_and_refuses_refresh() {
        let mut session = StaticSession::new("sess-1".into());
        assert_eq!(session.token(), "sess-1");
        assert!(session.refresh().await.is_err());
    }

    #[test]
    fn falls_back_to_stored_token() {
        // TV_SESSIONID is unset in the test environment.
        let session = StaticSession::from_store_or_env("stored-tok");
        assert_eq!(session.token(), "stored-tok");
    }
}
