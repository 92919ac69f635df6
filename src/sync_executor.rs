//! Upsert Executor
//!
//! Sequences probe → resolve → merge → write for each incoming fixture,
//! with per-record error isolation and batch statistics. One bad record
//! never aborts the batch: validation and storage failures are counted as
//! skipped and reported as bounded, human-readable error strings.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::error::UpsertError;
use crate::merge;
use crate::models::incoming::IncomingFixture;
use crate::repositories::fixture::FixtureStore;
use crate::resolver;
use crate::schema_probe::{self, ColumnSet};
use crate::sources::SourceRanking;

/// Configuration for the upsert executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Milliseconds to pause between records, a throughput control for
    /// storage write load, not a correctness requirement.
    pub per_record_delay_ms: u64,
    /// Maximum number of error strings retained in a batch outcome.
    pub error_cap: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            per_record_delay_ms: 50,
            error_cap: 100,
        }
    }
}

/// Summary statistics for one upsert batch.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct BatchOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

enum UpsertAction {
    Inserted,
    Updated,
}

/// Orchestrates batched fixture ingestion against an injected store.
pub struct UpsertExecutor {
    store: Arc<dyn FixtureStore>,
    ranking: SourceRanking,
    config: ExecutorConfig,
}

impl UpsertExecutor {
    pub fn new(store: Arc<dyn FixtureStore>, ranking: SourceRanking, config: ExecutorConfig) -> Self {
        Self {
            store,
            ranking,
            config,
        }
    }

    /// Process a batch of incoming fixtures in input order.
    ///
    /// The writable column set is probed once per batch. Per-record failures
    /// are contained here and never propagate to the caller.
    #[instrument(skip(self, records), fields(batch_size = records.len()))]
    pub async fn upsert_batch(&self, records: &[IncomingFixture]) -> BatchOutcome {
        let columns = schema_probe::detect(self.store.as_ref()).await;
        info!(
            records = records.len(),
            writable_columns = columns.len(),
            "starting fixture upsert batch"
        );

        let mut outcome = BatchOutcome::default();
        let mut suppressed = 0usize;

        for (index, incoming) in records.iter().enumerate() {
            if index > 0 && self.config.per_record_delay_ms > 0 {
                sleep(Duration::from_millis(self.config.per_record_delay_ms)).await;
            }

            match self.upsert_one(&columns, incoming).await {
                Ok(UpsertAction::Inserted) => {
                    outcome.inserted += 1;
                    counter!("matchsync_fixtures_inserted_total").increment(1);
                    debug!(fixture = %incoming.label(), "inserted fixture");
                }
                Ok(UpsertAction::Updated) => {
                    outcome.updated += 1;
                    counter!("matchsync_fixtures_updated_total").increment(1);
                    debug!(fixture = %incoming.label(), "updated fixture");
                }
                Err(err) => {
                    outcome.skipped += 1;
                    counter!("matchsync_fixtures_skipped_total").increment(1);
                    warn!(fixture = %incoming.label(), error = %err, "skipping fixture");
                    if outcome.errors.len() < self.config.error_cap {
                        outcome.errors.push(format!("{}: {}", incoming.label(), err));
                    } else {
                        suppressed += 1;
                    }
                }
            }
        }

        if suppressed > 0 {
            outcome
                .errors
                .push(format!("{suppressed} additional errors suppressed"));
        }

        info!(
            inserted = outcome.inserted,
            updated = outcome.updated,
            skipped = outcome.skipped,
            "fixture upsert batch finished"
        );
        outcome
    }

    async fn upsert_one(
        &self,
        columns: &ColumnSet,
        incoming: &IncomingFixture,
    ) -> Result<UpsertAction, UpsertError> {
        let kickoff_utc = incoming.validate()?;

        // Resolution reads current storage immediately before the write;
        // overlapping batches converge instead of reverting each other.
        let existing = resolver::find_existing(self.store.as_ref(), columns, incoming, kickoff_utc)
            .await?;

        let merged = merge::merge(existing.as_ref(), incoming, kickoff_utc, &self.ranking);

        match existing {
            None => {
                self.store.insert(columns, &merged).await?;
                Ok(UpsertAction::Inserted)
            }
            Some(previous) => {
                self.store.update(columns, &previous, &merged).await?;
                Ok(UpsertAction::Updated)
            }
        }
    }
}
