mod checker;
mod cli;
mod config;
mod extract;
mod oracle;
mod prompt;
mod reconciler;
mod session;
mod state_machine;
mod store;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use checker::CheckClient;
use cli::{Cli, Command};
use config::PinefixConfig;
use oracle::OracleClient;
use reconciler::{OracleSettings, Reconciler, RunReport};
use session::StaticSession;
use state_machine::RetryPolicy;
use store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PinefixConfig::load().context("failed to load pinefix.toml")?;

    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path.clone());
    let db_path = Path::new(&db_path);
    let mut store = Store::load(db_path)?;

    match cli.command {
        Command::Status => {
            ui::print_status(&store);
            if cli.verbose {
                ui::print_unfixable(&store);
            }
            return Ok(());
        }
        Command::Run | Command::Triage | Command::Repair => {}
    }

    let policy = RetryPolicy {
        max_retries: cli.max_retries.unwrap_or(config.max_retries),
    };
    let settings = OracleSettings {
        model: config.model.clone(),
        temperature: config.temperature,
        max_prompt_chars: config.max_prompt_chars,
    };
    let session = StaticSession::from_store_or_env(&store.session_token);
    let mut reconciler = Reconciler::new(
        CheckClient::new(),
        OracleClient::new(config.api_key.clone()),
        session,
        policy,
        settings,
        db_path,
    );

    let progress = ui::RunProgress::start(store.pending.len(), store.failed.len());
    let report = match cli.command {
        Command::Run => reconciler.run(&mut store).await?,
        Command::Triage => {
            let mut report = RunReport::default();
            reconciler.triage(&mut store, &mut report).await?;
            report
        }
        Command::Repair => {
            let mut report = RunReport::default();
            reconciler.repair_pass(&mut store, &mut report).await?;
            report
        }
        Command::Status => unreachable!("handled above"),
    };
    progress.complete(&report);

    if cli.verbose {
        ui::print_unfixable(&store);
    }

    Ok(())
}
