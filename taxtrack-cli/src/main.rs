use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use taxtrack_core::calculations::{PolicyChoice, TaxCalculator, income_by_type};
use taxtrack_core::{
    IncomeDraft, IncomeId, LedgerConfig, LedgerError, LedgerRegistry, LedgerStore,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use taxtrack_cli::output::{breakdown_table, incomes_table, summary_table};
use taxtrack_cli::client_backends;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Record income and estimate the tax owed on it.
///
/// Works directly on a local ledger, or against a running taxtrack server
/// when `--url` is given.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Ledger backend: `sqlite`, `memory` or `http`.
    #[arg(long, env = "TAXTRACK_BACKEND", default_value = "sqlite")]
    backend: String,

    /// Where the backend keeps the ledger: a SQLite file path, `:memory:`,
    /// or a server URL for the `http` backend.
    #[arg(long, env = "TAXTRACK_DB", default_value = "taxtrack.db")]
    db: String,

    /// Ledger location whose form names the backend, e.g. a server URL or a
    /// `sqlite:` URL. Overrides `--backend` and `--db`.
    #[arg(long, env = "TAXTRACK_URL")]
    url: Option<String>,

    /// Tax estimate policy for local backends.
    #[arg(long, env = "TAXTRACK_POLICY", default_value = "brackets-2024")]
    policy: PolicyChoice,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every recorded income.
    List,
    /// Record an income.
    Add {
        /// Employer or client name.
        #[arg(long)]
        job: String,
        /// Gross amount.
        #[arg(long)]
        amount: f64,
        /// Federal tax withheld.
        #[arg(long, default_value_t = 0.0)]
        federal: f64,
        /// Date received, YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// Income type: W2, 1099 or Other.
        #[arg(long = "type", default_value = "W2")]
        income_type: String,
    },
    /// Delete an income by id.
    Remove { id: IncomeId },
    /// Show the tax summary and income per type.
    Summary,
}

impl Cli {
    fn ledger_config(
        &self,
        registry: &LedgerRegistry,
    ) -> Result<LedgerConfig, LedgerError> {
        match &self.url {
            Some(url) => registry.locate(url),
            None => Ok(LedgerConfig::new(&self.backend, &self.db)),
        }
    }
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Quiet by default so command output stays readable; `RUST_LOG` overrides.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ─── commands ────────────────────────────────────────────────────────────────

async fn run(cli: Cli) -> anyhow::Result<()> {
    let registry = client_backends();
    let ledger_config = cli.ledger_config(&registry)?;
    debug!("connecting to {} backend", ledger_config.backend);
    let ledger = registry.open(&ledger_config).await?;

    match cli.command {
        Command::Summary => {
            let calculator = TaxCalculator::new(cli.policy.build());
            let summary = ledger.summarize(&calculator).await?;
            let totals = income_by_type(&ledger.list().await?)?;
            // A server estimates under its own policy
            if ledger_config.backend == "http" {
                println!("Tax summary\n{}", summary_table(&summary));
            } else {
                println!("Tax summary ({})\n{}", cli.policy, summary_table(&summary));
            }
            println!("Income by type\n{}", breakdown_table(&totals));
        }
        Command::List => {
            let records = ledger.list().await?;
            println!("Incomes\n{}", incomes_table(&records));
        }
        Command::Add {
            job,
            amount,
            federal,
            date,
            income_type,
        } => {
            let draft = IncomeDraft {
                job_name: Some(job),
                amount: Some(amount),
                federal_amount: Some(federal),
                date: Some(date),
                income_type: Some(income_type),
            };
            let record = ledger.add(draft).await.context("could not add income")?;
            println!("Added income #{}: {}", record.id, record.job_name);
        }
        Command::Remove { id } => {
            ledger.remove(id).await.context("could not remove income")?;
            println!("Removed income #{id}");
        }
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
