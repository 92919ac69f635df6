//! Merge engine
//!
//! Produces the record to persist from an existing stored fixture (or none)
//! and an incoming provider observation. Three rule families apply:
//!
//! - lifecycle fields (`lifecycle_status`, scores, `current_minute`) adopt
//!   the incoming value whenever one is provided, regardless of source trust
//! - descriptive fields adopt non-null incoming values only when the
//!   incoming source ranks equal to or better than the recorded source
//! - workflow fields only widen: booleans OR together, `analysis_status`
//!   advances along NONE → PENDING → COMPLETED/FAILED and never regresses

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::fixture::{self, AnalysisStatus};
use crate::models::incoming::IncomingFixture;
use crate::sources::SourceRanking;

/// Merge an incoming observation into the existing record, or construct a
/// fresh record when no existing fixture matched.
///
/// `kickoff_utc` is the already-validated kickoff instant of `incoming`.
/// Validation of the incoming shape happens before resolution, so this
/// function never sees a record with blank team names or an unparseable
/// timestamp.
pub fn merge(
    existing: Option<&fixture::Model>,
    incoming: &IncomingFixture,
    kickoff_utc: DateTime<Utc>,
    ranking: &SourceRanking,
) -> fixture::Model {
    match existing {
        None => create(incoming, kickoff_utc),
        Some(existing) => merge_into(existing, incoming, ranking),
    }
}

fn create(incoming: &IncomingFixture, kickoff_utc: DateTime<Utc>) -> fixture::Model {
    let now = Utc::now();
    fixture::Model {
        id: Uuid::new_v4(),
        external_id: incoming.external_id.clone(),
        source_tag: Some(incoming.source_tag.clone()),
        competition_name: incoming.competition_name.clone(),
        home_team_name: incoming.home_team_name.clone(),
        away_team_name: incoming.away_team_name.clone(),
        kickoff_utc: kickoff_utc.into(),
        lifecycle_status: incoming.lifecycle_status,
        home_score: incoming.home_score,
        away_score: incoming.away_score,
        current_minute: incoming.current_minute,
        venue: incoming.venue.clone(),
        referee: incoming.referee.clone(),
        home_team_logo_url: incoming.home_team_logo_url.clone(),
        away_team_logo_url: incoming.away_team_logo_url.clone(),
        competition_logo_url: incoming.competition_logo_url.clone(),
        competition_id: incoming.competition_id.clone(),
        season: incoming.season.clone(),
        matchday: incoming.matchday,
        stage: incoming.stage.clone(),
        group_name: incoming.group_name.clone(),
        was_ingested: true,
        was_analyzed: incoming.was_analyzed,
        is_published: incoming.is_published,
        analysis_status: incoming.analysis_status.unwrap_or_default(),
        analysis_priority: incoming.analysis_priority.unwrap_or_default(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn merge_into(
    existing: &fixture::Model,
    incoming: &IncomingFixture,
    ranking: &SourceRanking,
) -> fixture::Model {
    let dominant = ranking.dominates(Some(incoming.source_tag.as_str()), existing.source_tag.as_deref());

    let mut merged = existing.clone();

    // Freshness beats trust for live facts. An absent value means the
    // provider did not report one, not a reset.
    merged.lifecycle_status = incoming.lifecycle_status;
    if incoming.home_score.is_some() {
        merged.home_score = incoming.home_score;
    }
    if incoming.away_score.is_some() {
        merged.away_score = incoming.away_score;
    }
    if incoming.current_minute.is_some() {
        merged.current_minute = incoming.current_minute;
    }

    // Trust beats recency for descriptive facts, and null never overwrites.
    // The kickoff instant recorded at first sighting is kept; identity
    // matching already treats same-day reports as the same fixture.
    if dominant {
        merged.source_tag = Some(incoming.source_tag.clone());
        if incoming.external_id.is_some() {
            merged.external_id = incoming.external_id.clone();
        }
        if !incoming.competition_name.trim().is_empty() {
            merged.competition_name = incoming.competition_name.clone();
        }
        if !incoming.home_team_name.trim().is_empty() {
            merged.home_team_name = incoming.home_team_name.clone();
        }
        if !incoming.away_team_name.trim().is_empty() {
            merged.away_team_name = incoming.away_team_name.clone();
        }
        overwrite_if_some(&mut merged.venue, &incoming.venue);
        overwrite_if_some(&mut merged.referee, &incoming.referee);
        overwrite_if_some(&mut merged.home_team_logo_url, &incoming.home_team_logo_url);
        overwrite_if_some(&mut merged.away_team_logo_url, &incoming.away_team_logo_url);
        overwrite_if_some(
            &mut merged.competition_logo_url,
            &incoming.competition_logo_url,
        );
        overwrite_if_some(&mut merged.competition_id, &incoming.competition_id);
        overwrite_if_some(&mut merged.season, &incoming.season);
        if incoming.matchday.is_some() {
            merged.matchday = incoming.matchday;
        }
        overwrite_if_some(&mut merged.stage, &incoming.stage);
        overwrite_if_some(&mut merged.group_name, &incoming.group_name);
    }

    // Workflow state only widens.
    merged.was_ingested = existing.was_ingested || incoming.was_ingested;
    merged.was_analyzed = existing.was_analyzed || incoming.was_analyzed;
    merged.is_published = existing.is_published || incoming.is_published;
    merged.analysis_status = advance_analysis(existing.analysis_status, incoming.analysis_status);

    merged.updated_at = Utc::now().into();
    merged
}

fn overwrite_if_some(target: &mut Option<String>, incoming: &Option<String>) {
    if incoming.is_some() {
        target.clone_from(incoming);
    }
}

fn advance_analysis(existing: AnalysisStatus, incoming: Option<AnalysisStatus>) -> AnalysisStatus {
    match incoming {
        Some(next) if next.stage() > existing.stage() => next,
        _ => existing,
    }
}
