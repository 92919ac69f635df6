//! Schema capability probe
//!
//! Deployments drift: the optional identity, score, and workflow columns of
//! the fixtures table arrive in a later migration, so an environment may
//! expose only the core set. Rather than failing a whole batch on the first
//! missing column, the probe discovers which columns are currently present
//! and writers project their rows onto that allow-list. The probe runs once
//! per batch, not per record.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::repositories::fixture::FixtureStore;

/// Columns every fixtures table exposes regardless of migration state.
pub const CORE_COLUMNS: &[&str] = &[
    "id",
    "competition_name",
    "home_team_name",
    "away_team_name",
    "kickoff_utc",
    "lifecycle_status",
];

/// Columns that may be absent on deployments lagging behind the detail
/// migration. Each is probed individually.
pub const OPTIONAL_COLUMNS: &[&str] = &[
    "external_id",
    "source_tag",
    "home_score",
    "away_score",
    "current_minute",
    "venue",
    "referee",
    "home_team_logo_url",
    "away_team_logo_url",
    "competition_logo_url",
    "competition_id",
    "season",
    "matchday",
    "stage",
    "group_name",
    "was_ingested",
    "was_analyzed",
    "is_published",
    "analysis_status",
    "analysis_priority",
    "created_at",
    "updated_at",
];

/// The set of fixture columns currently writable in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet(BTreeSet<&'static str>);

impl ColumnSet {
    /// The guaranteed minimal set, used when probing is unavailable.
    pub fn core_only() -> Self {
        Self(CORE_COLUMNS.iter().copied().collect())
    }

    /// Every known column; useful where the schema is known to be current.
    pub fn full() -> Self {
        Self(
            CORE_COLUMNS
                .iter()
                .chain(OPTIONAL_COLUMNS.iter())
                .copied()
                .collect(),
        )
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, column: &'static str) {
        self.0.insert(column);
    }
}

/// Discover the writable column set by probing each optional column.
///
/// A probe failure that is not a missing-column error (e.g. transient
/// connectivity) counts conservatively as "column absent" for this run; a
/// degraded write beats an aborted batch.
pub async fn detect(store: &dyn FixtureStore) -> ColumnSet {
    let mut columns = ColumnSet::core_only();

    for column in OPTIONAL_COLUMNS {
        match store.probe_column(column).await {
            Ok(true) => columns.insert(column),
            Ok(false) => debug!(column, "fixture column not present in storage"),
            Err(err) => {
                warn!(column, error = %err, "column probe failed; treating as absent for this run");
            }
        }
    }

    debug!(
        available = columns.len(),
        known = CORE_COLUMNS.len() + OPTIONAL_COLUMNS.len(),
        "resolved fixture column capabilities"
    );
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_set_contains_required_columns() {
        let core = ColumnSet::core_only();
        for column in CORE_COLUMNS {
            assert!(core.contains(column), "missing core column {column}");
        }
        assert!(!core.contains("venue"));
        assert_eq!(core.len(), CORE_COLUMNS.len());
    }

    #[test]
    fn full_set_covers_the_superset() {
        let full = ColumnSet::full();
        assert_eq!(full.len(), CORE_COLUMNS.len() + OPTIONAL_COLUMNS.len());
        assert!(full.contains("is_published"));
        assert!(full.contains("kickoff_utc"));
    }

    #[test]
    fn known_columns_are_unique() {
        let mut seen = BTreeSet::new();
        for column in CORE_COLUMNS.iter().chain(OPTIONAL_COLUMNS.iter()) {
            assert!(seen.insert(*column), "duplicate column {column}");
        }
    }
}
