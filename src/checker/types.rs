//! Wire types for the pine-facade draft endpoint.

use serde::{Deserialize, Serialize};

use crate::state_machine::CheckVerdict;

/// JSON body returned by the checker for one submitted source string.
///
/// On failure the facade reports only the first error it encountered;
/// `reason` may therefore understate how broken the candidate is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub success: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CheckResponse {
    /// Collapse the wire shape into the loop's verdict. A failure with no
    /// reason still needs text to feed the next repair prompt.
    pub fn into_verdict(self) -> CheckVerdict {
        if self.success {
            CheckVerdict::Pass
        } else {
            CheckVerdict::Fail {
                reason: self
                    .reason
                    .unwrap_or_else(|| "checker reported failure without a reason".to_string()),
            }
        }
    }
}
