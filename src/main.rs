use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payment_method_updater::application::page::UpdatePaymentMethodPage;
use payment_method_updater::application::workflow::WorkflowConfig;
use payment_method_updater::domain::ports::SubscriptionStoreBox;
use payment_method_updater::domain::state::Phase;
use payment_method_updater::infrastructure::backend::LocalSubscriptionBackend;
use payment_method_updater::infrastructure::in_memory::InMemorySubscriptionStore;
#[cfg(feature = "storage-rocksdb")]
use payment_method_updater::infrastructure::rocksdb::RocksDBSubscriptionStore;
use payment_method_updater::infrastructure::tokenizer::LocalTokenizer;
use payment_method_updater::interfaces::json::report_writer::{Report, ReportWriter};
use payment_method_updater::interfaces::json::scenario_reader::ScenarioReader;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario JSON file describing the visit to simulate
    scenario: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PMU_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, env = "PMU_LOG_LEVEL", default_value = "warn")]
    log_level: Level,

    /// Timeout applied to each tokenizer and backend call, in milliseconds
    #[arg(long, env = "PMU_CALL_TIMEOUT_MS")]
    call_timeout_ms: Option<u64>,
}

fn open_store(db_path: Option<PathBuf>) -> Result<SubscriptionStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(
            RocksDBSubscriptionStore::open(path).into_diagnostic()?,
        )),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemorySubscriptionStore::new()))
        }
        None => Ok(Box::new(InMemorySubscriptionStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_level.to_string()))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let scenario = ScenarioReader::new(File::open(&cli.scenario).into_diagnostic()?)
        .read()
        .into_diagnostic()?;
    let context = scenario.context().into_diagnostic()?;
    let config = WorkflowConfig {
        call_timeout: cli.call_timeout_ms.map(Duration::from_millis),
    };

    let backend = Arc::new(LocalSubscriptionBackend::new(
        open_store(cli.db_path)?,
        scenario.processor.clone(),
    ));
    for subscription in scenario.subscriptions {
        backend.seed(subscription).await.into_diagnostic()?;
    }

    let page = UpdatePaymentMethodPage::open(&scenario.collective_slug, context, backend, config)
        .await
        .into_diagnostic()?;
    let workflow = &page.workflow;

    if scenario.tokenizer_ready {
        workflow
            .on_tokenizer_ready(Arc::new(LocalTokenizer::new(scenario.challenge)))
            .await;
    }

    workflow.on_card_change(scenario.card).await;
    let mut outcome = workflow.submit().await;
    let mut attempts = 1;

    for card in scenario.retries {
        if outcome.state().phase() != Phase::Failed {
            break;
        }
        workflow.on_card_change(card).await;
        outcome = workflow.submit().await;
        attempts += 1;
    }

    let state = workflow.state().await;
    let report = Report {
        view: workflow.view().await,
        state,
        attempts,
        subscriptions: page.subscriptions.names().await,
    };

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_report(&report).into_diagnostic()?;

    Ok(())
}
