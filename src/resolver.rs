//! Candidate resolver
//!
//! Finds the zero-or-one stored record representing the same real-world
//! fixture as an incoming observation. Two strategies apply in order, first
//! hit wins:
//!
//! 1. exact `(external_id, source_tag)` identity match — the strongest
//!    signal, attempted first
//! 2. heuristic match on the same team pair (either orientation) within the
//!    same UTC calendar day, disambiguated by competition id when both
//!    sides carry one
//!
//! Ambiguity is never surfaced as an error; the first candidate in
//! deterministic storage order is accepted.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::error::StoreError;
use crate::models::fixture;
use crate::models::incoming::IncomingFixture;
use crate::repositories::fixture::FixtureStore;
use crate::schema_probe::ColumnSet;

/// Resolve the existing stored record for `incoming`, if any.
///
/// `kickoff_utc` is the validated kickoff instant. Reads go straight to the
/// store on every call; nothing is cached across a batch, so overlapping
/// ingestion runs converge on current state.
pub async fn find_existing(
    store: &dyn FixtureStore,
    columns: &ColumnSet,
    incoming: &IncomingFixture,
    kickoff_utc: DateTime<Utc>,
) -> Result<Option<fixture::Model>, StoreError> {
    if let Some(external_id) = incoming.external_id.as_deref()
        && columns.contains("external_id")
        && columns.contains("source_tag")
        && let Some(found) = store
            .find_by_external(columns, external_id, &incoming.source_tag)
            .await?
    {
        return Ok(Some(found));
    }

    let day_start = kickoff_utc
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();
    let day_end = day_start + Duration::days(1);

    let candidates = store
        .find_same_day(
            columns,
            &incoming.home_team_name,
            &incoming.away_team_name,
            day_start,
            day_end,
        )
        .await?;

    if let Some(competition_id) = incoming.competition_id.as_deref() {
        // A candidate that names a different competition is a different
        // fixture; one that names none is accepted as the same.
        if let Some(exact) = candidates
            .iter()
            .find(|candidate| candidate.competition_id.as_deref() == Some(competition_id))
        {
            return Ok(Some(exact.clone()));
        }
        return Ok(candidates
            .into_iter()
            .find(|candidate| candidate.competition_id.is_none()));
    }

    Ok(candidates.into_iter().next())
}
