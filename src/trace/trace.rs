use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::wire::wire_model::ChangeSet;

/// One dispatch cycle as a trace record, written as a JSONL line.
#[derive(Debug, Serialize)]
pub struct DispatchTrace {
    pub timestamp_ms: u128,

    pub context: String,
    pub action: String,
    pub method: String,

    /// "auto_diff", "explicit" or "error"
    pub outcome: Option<String>,

    pub entries: usize,
    pub removed: usize,

    pub before_digest: Option<String>,
    pub after_digest: Option<String>,

    pub error: Option<String>,
}

impl DispatchTrace {
    pub fn now(context: &str, action: &str, method: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_millis(),
            context: context.to_string(),
            action: action.to_string(),
            method: method.to_string(),
            outcome: None,
            entries: 0,
            removed: 0,
            before_digest: None,
            after_digest: None,
            error: None,
        }
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_changes(mut self, changes: &ChangeSet) -> Self {
        self.entries = changes.len();
        self.removed = changes.removed_count();
        self
    }

    pub fn with_digests(mut self, before: Option<String>, after: Option<String>) -> Self {
        self.before_digest = before;
        self.after_digest = after;
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
