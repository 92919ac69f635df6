//! # Matchsync Main Entry Point
//!
//! Thin CLI over the reconciliation engine: run migrations, sync a window
//! of fixtures from a provider, sweep duplicates, or print store counts.
//! Scheduling is left to the environment (cron or similar).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};

use matchsync::config::{AppConfig, ConfigLoader};
use matchsync::providers::{FootballDataProvider, Provider};
use matchsync::repositories::{FixtureStore, SeaOrmFixtureStore};
use matchsync::schema_probe;
use matchsync::sources::SourceRanking;
use matchsync::sweep::DuplicateSweep;
use matchsync::sync_executor::{ExecutorConfig, UpsertExecutor};
use matchsync::{db, telemetry};

#[derive(Parser)]
#[command(name = "matchsync", about = "Match record reconciliation engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending database migrations.
    Migrate,
    /// Fetch a window of fixtures from the provider and reconcile them
    /// into the store.
    Sync {
        /// First kickoff date of the window (defaults to today - days-back).
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last kickoff date of the window (defaults to today + days-ahead).
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = 7)]
        days_back: i64,
        #[arg(long, default_value_t = 7)]
        days_ahead: i64,
    },
    /// Collapse duplicate fixtures sharing a canonical key.
    Sweep,
    /// Print store counts.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new().load()?;
    telemetry::init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "effective configuration");
    }

    let db = db::init_pool(&config).await?;

    match cli.command {
        Command::Migrate => {
            Migrator::up(&db, None).await.context("migration failed")?;
            println!("migrations applied");
        }
        Command::Sync {
            from,
            to,
            days_back,
            days_ahead,
        } => {
            let today = Utc::now().date_naive();
            let from = from.unwrap_or(today - ChronoDuration::days(days_back));
            let to = to.unwrap_or(today + ChronoDuration::days(days_ahead));
            if from > to {
                bail!("sync window start {from} is after end {to}");
            }

            let outcome = run_sync(&config, db, from, to).await?;
            println!(
                "sync complete: {} inserted, {} updated, {} skipped",
                outcome.inserted, outcome.updated, outcome.skipped
            );
            for error in &outcome.errors {
                eprintln!("  - {error}");
            }
        }
        Command::Sweep => {
            let store = Arc::new(SeaOrmFixtureStore::new(db));
            let ranking = SourceRanking::new(config.source_priority.clone());
            let sweep = DuplicateSweep::new(store, ranking);
            let outcome = sweep.run().await?;
            println!("sweep complete: {} duplicates removed", outcome.removed);
            for error in &outcome.errors {
                eprintln!("  - {error}");
            }
        }
        Command::Status => {
            let store = SeaOrmFixtureStore::new(db);
            let columns = schema_probe::detect(&store).await;
            let total = store.count_total().await?;
            let live = store.count_live().await?;
            let published = store.count_published(&columns).await?;
            let analyzed = store.count_analyzed(&columns).await?;
            println!("fixtures: {total} total, {live} live, {published} published, {analyzed} analyzed");
            println!(
                "writable columns: {}/{}",
                columns.len(),
                schema_probe::CORE_COLUMNS.len() + schema_probe::OPTIONAL_COLUMNS.len()
            );
        }
    }

    Ok(())
}

async fn run_sync(
    config: &AppConfig,
    db: sea_orm::DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<matchsync::sync_executor::BatchOutcome> {
    let Some(token) = config.football_data_api_token.clone() else {
        bail!("no provider API token configured; set MATCHSYNC_FOOTBALL_DATA_API_TOKEN");
    };

    let provider = FootballDataProvider::new(
        &config.football_data_api_base,
        token,
        Duration::from_secs(config.provider_timeout_secs),
    )?;

    tracing::info!(provider = provider.source_tag(), %from, %to, "fetching fixture window");
    let records = provider.fetch_window(from, to).await?;
    tracing::info!(fetched = records.len(), "provider fetch complete");

    let store = Arc::new(SeaOrmFixtureStore::new(db));
    let ranking = SourceRanking::new(config.source_priority.clone());
    let executor = UpsertExecutor::new(
        store,
        ranking,
        ExecutorConfig {
            per_record_delay_ms: config.upsert_delay_ms,
            error_cap: config.upsert_error_cap,
        },
    );

    Ok(executor.upsert_batch(&records).await)
}
