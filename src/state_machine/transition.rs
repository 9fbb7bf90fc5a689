use std::fmt;

use serde::{Deserialize, Serialize};

use super::item::{RetryPolicy, WorkItem};

/// What the external checker said about one code candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckVerdict {
    Pass,
    Fail { reason: String },
}

/// The next list for an item after a check, per the retry policy.
///
/// `Promote` and `Park` are terminal; `Retry` keeps the item in Failed with
/// one more attempt consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Candidate passed — move to Successful.
    Promote,
    /// Candidate failed but attempts remain — stay in Failed, retry later.
    Retry { reason: String },
    /// Candidate failed and the budget is spent — move to Unfixable.
    Park { reason: String },
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Promote => write!(f, "PROMOTE"),
            Transition::Retry { reason } => write!(f, "RETRY: {reason}"),
            Transition::Park { reason } => write!(f, "PARK: {reason}"),
        }
    }
}

impl RetryPolicy {
    /// Decide where an item goes after a repair-and-recheck cycle.
    ///
    /// The budget is inspected before any increment, so an item parked as
    /// Unfixable always shows `retry_count == max_retries` — never less.
    pub fn decide(&self, item: &WorkItem, verdict: CheckVerdict) -> Transition {
        match verdict {
            CheckVerdict::Pass => Transition::Promote,
            CheckVerdict::Fail { reason } => {
                if item.retry_count >= self.max_retries {
                    Transition::Park { reason }
                } else {
                    Transition::Retry { reason }
                }
            }
        }
    }
}
