//! Canonical fixture identity derivation.
//!
//! Providers assign their own external ids to the same real-world fixture,
//! so identity is derived from provider-agnostic attributes instead: the
//! kickoff calendar date, the (order-independent) team pair, and the
//! competition when known.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::fixture;

/// Placeholder token used when no competition identifier is known.
const UNKNOWN_COMPETITION: &str = "unknown";

/// Deterministic, order-independent identity for a real-world fixture.
///
/// Two records with equal canonical keys are considered the same fixture
/// regardless of which provider supplied them or how team order was listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the canonical key for a fixture.
///
/// The key uses the UTC calendar date (day granularity, not time-of-day) so
/// the same fixture reported with slightly different kickoff times still
/// collides, and sorts the team names so "A vs B" and "B vs A" collide too.
pub fn canonical_key(
    home_team: &str,
    away_team: &str,
    kickoff_utc: DateTime<Utc>,
    competition_id: Option<&str>,
) -> CanonicalKey {
    let date = kickoff_utc.date_naive().format("%Y-%m-%d").to_string();

    let mut teams = [normalize_team(home_team), normalize_team(away_team)];
    teams.sort();

    let competition = competition_id
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_COMPETITION);

    let raw = format!("{}_{}_{}_{}", date, teams[0], teams[1], competition);
    CanonicalKey(
        raw.to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect(),
    )
}

/// Derive the canonical key for a stored fixture row.
pub fn fixture_key(fixture: &fixture::Model) -> CanonicalKey {
    canonical_key(
        &fixture.home_team_name,
        &fixture.away_team_name,
        fixture.kickoff_utc.with_timezone(&Utc),
        fixture.competition_id.as_deref(),
    )
}

fn normalize_team(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
