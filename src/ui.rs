//! Terminal output — spinner and colored summaries.
//!
//! Uses `indicatif` for the run spinner and `console` for styling. The
//! spinner runs while the loop works the queue; the summary and status
//! views print the outcome counts.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::reconciler::RunReport;
use crate::store::Store;

/// Visual progress for one reconciliation run.
pub struct RunProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl RunProgress {
    /// Start the spinner with the queue sizes about to be worked.
    pub fn start(pending: usize, failed: usize) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("reconciling {pending} pending, {failed} failed"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Finish the spinner and print the run summary.
    pub fn complete(&self, report: &RunReport) {
        self.pb.finish_and_clear();
        println!(
            "  {} {} passed, {} repaired",
            self.green.apply_to("✓"),
            report.passed,
            report.repaired
        );
        if report.failed > 0 || report.parked > 0 {
            println!(
                "  {} {} failed triage, {} parked as unfixable",
                self.red.apply_to("✗"),
                report.failed,
                report.parked
            );
        }
        if report.skipped > 0 {
            println!(
                "  {} {} skipped on transport failures (will retry next run)",
                self.yellow.apply_to("↻"),
                report.skipped
            );
        }
    }
}

/// Print per-list counts for the `status` subcommand.
pub fn print_status(store: &Store) {
    let bold = Style::new().bold();
    println!("{}", bold.apply_to("─── Queue Status ───"));
    println!("  Pending:    {}", store.pending.len());
    println!("  Failed:     {}", store.failed.len());
    println!("  Successful: {}", store.successful.len());
    println!("  Unfixable:  {}", store.unfixable.len());
    println!("  Total:      {}", store.len());
    let session = if store.session_token.is_empty() {
        "absent"
    } else {
        "present"
    };
    println!("  Session token: {session}");
}

/// Verbose view: list unfixable items with their last reported error so an
/// operator can intervene.
pub fn print_unfixable(store: &Store) {
    if store.unfixable.is_empty() {
        return;
    }
    let red = Style::new().red().bold();
    println!("{}", red.apply_to("─── Unfixable ───"));
    for item in &store.unfixable {
        println!(
            "  [{} tries] {}: {}",
            item.retry_count + 1,
            item.instruction,
            item.error.as_deref().unwrap_or("(no reason recorded)")
        );
    }
}
