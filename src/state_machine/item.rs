use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One instruction/completion pair tracked through the reconciliation loop.
///
/// Items are identified by a surrogate `id` assigned at creation. The
/// `instruction` text is carried as a plain field; duplicate instructions do
/// not collide in list bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(default = "new_id")]
    pub id: String,
    /// Natural-language task description. Immutable for the item's lifetime.
    pub instruction: String,
    /// Current candidate code. Replaced on each repair attempt.
    pub completion: String,
    /// Last reason reported by the checker. Present only while Failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Repair attempts already consumed. Monotonically non-decreasing.
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl WorkItem {
    pub fn new(instruction: String, completion: String) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            instruction,
            completion,
            error: None,
            retry_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a checker rejection: store the reason and clear stale state.
    /// Does not touch `retry_count` — triage failures are attempt zero.
    pub fn mark_failed(&mut self, reason: String) {
        self.error = Some(reason);
        self.updated_at = Utc::now();
    }

    /// Record a repair attempt that failed again: new candidate, new reason,
    /// one more consumed attempt.
    pub fn record_attempt(&mut self, completion: String, reason: String) {
        self.completion = completion;
        self.error = Some(reason);
        self.retry_count += 1;
        self.updated_at = Utc::now();
    }

    /// Produce the terminal Successful record carrying the passing candidate.
    pub fn into_successful(mut self, completion: String) -> Self {
        self.completion = completion;
        self.error = None;
        self.updated_at = Utc::now();
        self
    }
}

/// Retry budget for the repair pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Repair attempts allowed beyond the first (2 ⇒ 3 total attempts).
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_item_creation_defaults() {
        let item = WorkItem::new("add two numbers".into(), "plot(1 + 2)".into());
        assert_eq!(item.retry_count, 0);
        assert!(item.error.is_none());
        assert!(!item.id.is_empty());
    }

    #[test]
    fn mark_failed_sets_reason_without_consuming_attempt() {
        let mut item = WorkItem::new("task".into(), "code".into());
        item.mark_failed("line 2: unexpected token".into());
        assert_eq!(item.error.as_deref(), Some("line 2: unexpected token"));
        assert_eq!(item.retry_count, 0);
    }

    #[test]
    fn record_attempt_increments_retry_count() {
        let mut item = WorkItem::new("task".into(), "v1".into());
        item.record_attempt("v2".into(), "still broken".into());
        item.record_attempt("v3".into(), "broken differently".into());
        assert_eq!(item.completion, "v3");
        assert_eq!(item.error.as_deref(), Some("broken differently"));
        assert_eq!(item.retry_count, 2);
    }

    #[test]
    fn into_successful_clears_error() {
        let mut item = WorkItem::new("task".into(), "v1".into());
        item.mark_failed("bad".into());
        let done = item.into_successful("v2".into());
        assert_eq!(done.completion, "v2");
        assert!(done.error.is_none());
    }

    #[test]
    fn serialization_roundtrip() {
        let item = WorkItem::new("serialize me".into(), "indicator('x')".into());
        let json = serde_json::to_string(&item).unwrap();
        let back: WorkItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn deserializes_legacy_record_without_id() {
        // Records written before surrogate ids existed carry only the
        // instruction/completion/error/retry fields.
        let json = r#"{"instruction":"i","completion":"c","error":"e","retry_count":1}"#;
        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.instruction, "i");
        assert_eq!(item.retry_count, 1);
        assert!(!item.id.is_empty());
    }

    #[test]
    fn none_error_is_omitted_from_json() {
        let item = WorkItem::new("i".into(), "c".into());
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("\"error\""));
    }
}
