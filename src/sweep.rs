//! Reconciliation sweep
//!
//! Offline batch pass that collapses duplicate stored fixtures sharing a
//! canonical key down to one survivor. The survivor is the best whole
//! record — most trusted source, then most recently created — not a
//! field-by-field merge: recurring ingestion merges have already propagated
//! the best fields into the highest-priority record by the time duplicates
//! exist.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::identity::{self, CanonicalKey};
use crate::models::fixture;
use crate::repositories::fixture::FixtureStore;
use crate::schema_probe;
use crate::sources::SourceRanking;

/// Summary of one sweep run.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct SweepOutcome {
    pub removed: usize,
    pub errors: Vec<String>,
}

/// Collapses duplicate fixtures directly against storage; providers are
/// never re-contacted.
pub struct DuplicateSweep {
    store: Arc<dyn FixtureStore>,
    ranking: SourceRanking,
}

impl DuplicateSweep {
    pub fn new(store: Arc<dyn FixtureStore>, ranking: SourceRanking) -> Self {
        Self { store, ranking }
    }

    /// Run one sweep over the whole store.
    ///
    /// Individual deletion failures are collected and do not stop the
    /// sweep; an unreadable store propagates as an error.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<SweepOutcome, StoreError> {
        let columns = schema_probe::detect(self.store.as_ref()).await;
        let fixtures = self.store.all(&columns).await?;
        let total = fixtures.len();

        let mut groups: HashMap<CanonicalKey, Vec<fixture::Model>> = HashMap::new();
        for fixture in fixtures {
            groups
                .entry(identity::fixture_key(&fixture))
                .or_default()
                .push(fixture);
        }

        let mut outcome = SweepOutcome::default();

        for (key, mut members) in groups {
            if members.len() < 2 {
                continue;
            }

            members.sort_by(|a, b| {
                self.ranking
                    .rank(a.source_tag.as_deref())
                    .cmp(&self.ranking.rank(b.source_tag.as_deref()))
                    .then(b.created_at.cmp(&a.created_at))
            });

            let survivor = &members[0];
            debug!(
                key = %key,
                survivor = %survivor.id,
                duplicates = members.len() - 1,
                "collapsing duplicate fixtures"
            );

            for duplicate in &members[1..] {
                match self.store.delete(duplicate.id).await {
                    Ok(()) => {
                        outcome.removed += 1;
                        counter!("matchsync_duplicates_removed_total").increment(1);
                        info!(
                            fixture = %duplicate.id,
                            "removed duplicate: {} vs {}",
                            duplicate.home_team_name, duplicate.away_team_name
                        );
                    }
                    Err(err) => {
                        warn!(fixture = %duplicate.id, error = %err, "failed to remove duplicate");
                        outcome
                            .errors
                            .push(format!("failed to remove duplicate {}: {}", duplicate.id, err));
                    }
                }
            }
        }

        info!(
            scanned = total,
            removed = outcome.removed,
            errors = outcome.errors.len(),
            "reconciliation sweep finished"
        );
        Ok(outcome)
    }
}
