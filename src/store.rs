//! The durable work-queue document (`db.json`).
//!
//! A single versioned JSON file holds the four work-item lists and the
//! checker session token. Callers always load the whole document, mutate in
//! memory, and save the whole document; saves are atomic (temp file + rename)
//! so a crash mid-write never corrupts previously committed state.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state_machine::WorkItem;

const STORE_VERSION: u32 = 1;

/// Process-wide persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default = "current_version")]
    pub version: u32,
    /// Checker session credential. Empty until bootstrap provides one.
    #[serde(default)]
    pub session_token: String,
    /// Items not yet checked this run.
    #[serde(default, rename = "Pending")]
    pub pending: Vec<WorkItem>,
    /// Items awaiting or undergoing repair. Carry `error` and `retry_count`.
    #[serde(default, rename = "Failed")]
    pub failed: Vec<WorkItem>,
    /// Terminal: candidates that passed the checker.
    #[serde(default, rename = "Successful")]
    pub successful: Vec<WorkItem>,
    /// Terminal: items that exhausted the retry budget.
    #[serde(default, rename = "Unfixable")]
    pub unfixable: Vec<WorkItem>,
}

fn current_version() -> u32 {
    STORE_VERSION
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            session_token: String::new(),
            pending: Vec::new(),
            failed: Vec::new(),
            successful: Vec::new(),
            unfixable: Vec::new(),
        }
    }
}

impl Store {
    /// Load the store from disk. A missing file is an empty store, never an
    /// error; an unreadable or unparsable file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read store {}", path.display()))?;
        let store: Store = serde_json::from_str(&contents)
            .with_context(|| format!("parse store {}", path.display()))?;
        Ok(store)
    }

    /// Atomically rewrite the whole store. Write to `<path>.tmp`, then rename
    /// over the target; the rename is the commit point.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buf = serde_json::to_string_pretty(self)?;
        buf.push('\n');

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create store directory {}", parent.display()))?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &buf).with_context(|| format!("write temp store {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replace store {}", path.display()))?;
        Ok(())
    }

    /// Total items across all four lists.
    pub fn len(&self) -> usize {
        self.pending.len() + self.failed.len() + self.successful.len() + self.unfixable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
