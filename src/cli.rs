//! Command-line interface, built on clap.
//!
//! Subcommands map onto the loop's passes: `triage` and `repair` run one
//! pass each, `run` does both, `status` reports list sizes. The Pending
//! queue is filled by an external producer; there is no command to create
//! work items.

use clap::{Parser, Subcommand};

/// pinefix — reconciles generated Pine Script candidates against the checker.
#[derive(Debug, Parser)]
#[command(name = "pinefix", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path of the work-queue document (overrides config).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Repair attempts allowed beyond the first (overrides config).
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Enable verbose output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run triage and repair over the whole queue.
    Run,

    /// Check pending items only; route them to Successful or Failed.
    Triage,

    /// Repair failed items only.
    Repair,

    /// Show per-list counts from the work-queue document.
    Status,
}
