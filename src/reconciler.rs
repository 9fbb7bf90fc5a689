//! The check-repair reconciliation loop.
//!
//! Drives every pending candidate through the external checker, hands
//! rejections to the repair oracle, re-checks the corrected code, and moves
//! items between the store's four lists. The store is rewritten after every
//! single item transition — a crash loses at most the in-flight item's
//! transition, never the batch.
//!
//! Transport failures (network, auth, quota) never change an item: the item
//! is skipped where it sits and picked up again by the next invocation.
//! There is deliberately no in-process backoff for them.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;

use crate::checker::{CheckError, CompileCheck};
use crate::extract::extract;
use crate::oracle::{ChatRequest, OracleError, RepairOracle};
use crate::prompt::build_messages;
use crate::session::SessionProvider;
use crate::state_machine::{CheckVerdict, RetryPolicy, Transition};
use crate::store::Store;

/// Oracle request parameters carried by the reconciler.
#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub model: String,
    pub temperature: f32,
    pub max_prompt_chars: usize,
}

/// Counts accumulated over one run, for the operator summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Pending items that passed triage outright.
    pub passed: usize,
    /// Pending items the checker rejected into Failed.
    pub failed: usize,
    /// Failed items whose repaired candidate passed.
    pub repaired: usize,
    /// Failed items parked as Unfixable.
    pub parked: usize,
    /// Items left untouched because of a transport failure.
    pub skipped: usize,
}

/// Drives the pending and failed queues through check and repair.
///
/// Strictly sequential: the checker mutates one shared remote editing
/// session, so one item's full cycle completes before the next begins.
pub struct Reconciler<C, O, S> {
    checker: C,
    oracle: O,
    session: S,
    policy: RetryPolicy,
    settings: OracleSettings,
    store_path: PathBuf,
}

impl<C, O, S> Reconciler<C, O, S>
where
    C: CompileCheck,
    O: RepairOracle,
    S: SessionProvider,
{
    pub fn new(
        checker: C,
        oracle: O,
        session: S,
        policy: RetryPolicy,
        settings: OracleSettings,
        store_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            checker,
            oracle,
            session,
            policy,
            settings,
            store_path: store_path.into(),
        }
    }

    /// One full run: triage Pending, reconcile Successful against Failed,
    /// then drain Failed through the repair cycle.
    pub async fn run(&mut self, store: &mut Store) -> Result<RunReport> {
        let mut report = RunReport::default();
        self.triage(store, &mut report).await?;
        self.repair_pass(store, &mut report).await?;
        Ok(report)
    }

    /// Pass 1: check every pending item once. Pass ⇒ Successful, fail ⇒
    /// Failed with the reported reason, transport failure ⇒ left in Pending.
    pub async fn triage(&mut self, store: &mut Store, report: &mut RunReport) -> Result<()> {
        let mut idx = 0;
        while idx < store.pending.len() {
            let code = store.pending[idx].completion.clone();
            let Some(verdict) = self.checked(store, &code).await? else {
                report.skipped += 1;
                idx += 1;
                continue;
            };

            let mut item = store.pending.remove(idx);
            match verdict {
                CheckVerdict::Pass => {
                    let completion = item.completion.clone();
                    store.successful.push(item.into_successful(completion));
                    report.passed += 1;
                }
                CheckVerdict::Fail { reason } => {
                    item.mark_failed(reason);
                    store.failed.push(item);
                    report.failed += 1;
                }
            }
            store.save(&self.store_path)?;
        }
        Ok(())
    }

    /// Drop Failed entries whose instruction already appears in Successful —
    /// a later successful repair supersedes an earlier failure record.
    /// Returns the number of entries removed.
    pub fn supersede(store: &mut Store) -> usize {
        let done: HashSet<&str> = store
            .successful
            .iter()
            .map(|s| s.instruction.as_str())
            .collect();
        let before = store.failed.len();
        store.failed.retain(|item| !done.contains(item.instruction.as_str()));
        before - store.failed.len()
    }

    /// Pass 2: FIFO over Failed. Each item gets a repair request, extraction,
    /// and re-check; the retry policy then promotes, requeues, or parks it.
    /// Requeued items go to the tail and are reprocessed within this run.
    /// Superseded Failed records are dropped up front so they never reach
    /// the oracle.
    pub async fn repair_pass(&mut self, store: &mut Store, report: &mut RunReport) -> Result<()> {
        if Self::supersede(store) > 0 {
            store.save(&self.store_path)?;
        }
        let mut cursor = 0;
        while cursor < store.failed.len() {
            let item = &store.failed[cursor];
            let messages = build_messages(
                &item.instruction,
                &item.completion,
                item.error.as_deref().unwrap_or(""),
                self.settings.max_prompt_chars,
            );
            let request = ChatRequest {
                model: self.settings.model.clone(),
                temperature: self.settings.temperature,
                messages,
            };

            let raw = match self.oracle.complete(&request).await {
                Ok(response) => response
                    .first_content()
                    .unwrap_or_default()
                    .to_string(),
                Err(err) => {
                    log_transport_skip("repair request", &item.instruction, &err);
                    report.skipped += 1;
                    cursor += 1;
                    continue;
                }
            };

            // A response without the expected envelope is still checked: the
            // rejection it earns becomes the error context for the next try.
            let extraction = extract(&raw);
            if extraction.is_unparsed() {
                eprintln!(
                    "  ! response for '{}' missing completion envelope, checking raw text",
                    item.instruction
                );
            }
            let corrected = extraction.code().to_string();

            let Some(verdict) = self.checked(store, &corrected).await? else {
                report.skipped += 1;
                cursor += 1;
                continue;
            };

            let mut item = store.failed.remove(cursor);
            match self.policy.decide(&item, verdict) {
                Transition::Promote => {
                    store.successful.push(item.into_successful(corrected));
                    report.repaired += 1;
                }
                Transition::Retry { reason } => {
                    item.record_attempt(corrected, reason);
                    store.failed.push(item);
                }
                Transition::Park { reason } => {
                    item.completion = corrected;
                    item.error = Some(reason);
                    store.unfixable.push(item);
                    report.parked += 1;
                }
            }
            store.save(&self.store_path)?;
        }
        Ok(())
    }

    /// Run one check under the current session. `Ok(None)` means a transport
    /// failure: the caller must leave the in-flight item untouched. An auth
    /// rejection additionally asks the session provider for a fresh token and
    /// persists it into the store when one is produced.
    async fn checked(&mut self, store: &mut Store, code: &str) -> Result<Option<CheckVerdict>> {
        match self.checker.check(code, self.session.token()).await {
            Ok(verdict) => Ok(Some(verdict)),
            Err(CheckError::AuthRejected { status }) => {
                eprintln!("  ! checker rejected session (status {status}), refreshing");
                match self.session.refresh().await {
                    Ok(token) => {
                        store.session_token = token;
                        store.save(&self.store_path)?;
                    }
                    Err(err) => eprintln!("  ! session refresh unavailable: {err}"),
                }
                Ok(None)
            }
            Err(err) => {
                eprintln!("  ! compile check skipped: {err}");
                Ok(None)
            }
        }
    }
}

fn log_transport_skip(what: &str, instruction: &str, err: &OracleError) {
    eprintln!("  ! {what} skipped for '{instruction}': {err}");
}
