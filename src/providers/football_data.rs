//! football-data.org provider client
//!
//! Fetches fixtures from the football-data.org v4 API and normalizes them
//! to the engine's incoming shape: upstream status strings are translated
//! to lifecycle statuses, team crests become logo urls, and the season is
//! reduced to its starting year.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ProviderError, body_snippet};
use crate::models::fixture::LifecycleStatus;
use crate::models::incoming::IncomingFixture;
use crate::providers::Provider;

/// Source tag contributed by this provider, rank 0 in the default order.
pub const SOURCE_TAG: &str = "football-data";

/// Client for the football-data.org v4 API.
pub struct FootballDataProvider {
    client: Client,
    api_base: Url,
    api_token: String,
}

impl FootballDataProvider {
    pub fn new(
        api_base: &str,
        api_token: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_base = Url::parse(api_base).map_err(|err| ProviderError::Configuration {
            details: format!("invalid API base url '{api_base}': {err}"),
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base,
            api_token,
        })
    }
}

#[async_trait]
impl Provider for FootballDataProvider {
    fn source_tag(&self) -> &'static str {
        SOURCE_TAG
    }

    #[instrument(skip(self))]
    async fn fetch_window(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<IncomingFixture>, ProviderError> {
        let mut url =
            self.api_base
                .join("/v4/matches")
                .map_err(|err| ProviderError::Configuration {
                    details: format!("invalid matches endpoint: {err}"),
                })?;
        url.query_pairs_mut()
            .append_pair("dateFrom", &from.format("%Y-%m-%d").to_string())
            .append_pair("dateTo", &to.format("%Y-%m-%d").to_string());

        let response = self
            .client
            .get(url)
            .header("X-Auth-Token", &self.api_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                provider: SOURCE_TAG,
                status: status.as_u16(),
                body_snippet: Some(body_snippet(body)),
            });
        }

        let payload: MatchesResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::MalformedResponse {
                    details: err.to_string(),
                })?;

        debug!(matches = payload.matches.len(), "fetched fixture window");
        Ok(payload.matches.into_iter().map(IncomingFixture::from).collect())
    }
}

/// Translate a football-data.org status string to a lifecycle status.
/// Unrecognized statuses fall back to SCHEDULED.
fn map_status(raw: &str) -> LifecycleStatus {
    match raw {
        "IN_PLAY" => LifecycleStatus::Live,
        "PAUSED" => LifecycleStatus::Halftime,
        "FINISHED" => LifecycleStatus::Finished,
        "POSTPONED" | "SUSPENDED" => LifecycleStatus::Postponed,
        "CANCELLED" => LifecycleStatus::Cancelled,
        _ => LifecycleStatus::Scheduled,
    }
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    matches: Vec<ApiMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMatch {
    id: i64,
    utc_date: String,
    status: String,
    #[serde(default)]
    matchday: Option<i32>,
    #[serde(default)]
    stage: Option<String>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    venue: Option<String>,
    home_team: ApiTeam,
    away_team: ApiTeam,
    #[serde(default)]
    score: Option<ApiScore>,
    #[serde(default)]
    referees: Vec<ApiReferee>,
    competition: ApiCompetition,
    #[serde(default)]
    season: Option<ApiSeason>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    name: String,
    #[serde(default)]
    crest: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiScore {
    #[serde(default)]
    full_time: Option<ApiScorePair>,
}

#[derive(Debug, Deserialize)]
struct ApiScorePair {
    #[serde(default)]
    home: Option<i32>,
    #[serde(default)]
    away: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ApiReferee {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiCompetition {
    id: i64,
    name: String,
    #[serde(default)]
    emblem: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSeason {
    #[serde(default)]
    start_date: Option<String>,
}

impl From<ApiMatch> for IncomingFixture {
    fn from(api: ApiMatch) -> Self {
        let full_time = api.score.and_then(|score| score.full_time);
        let season = api
            .season
            .and_then(|season| season.start_date)
            .and_then(|start| start.split('-').next().map(str::to_string));

        IncomingFixture {
            external_id: Some(api.id.to_string()),
            source_tag: SOURCE_TAG.to_string(),
            competition_name: api.competition.name,
            home_team_name: api.home_team.name,
            away_team_name: api.away_team.name,
            kickoff_utc: api.utc_date,
            lifecycle_status: map_status(&api.status),
            home_score: full_time.as_ref().and_then(|pair| pair.home),
            away_score: full_time.as_ref().and_then(|pair| pair.away),
            current_minute: None,
            venue: api.venue,
            referee: api.referees.into_iter().next().map(|referee| referee.name),
            home_team_logo_url: api.home_team.crest,
            away_team_logo_url: api.away_team.crest,
            competition_logo_url: api.competition.emblem,
            competition_id: Some(api.competition.id.to_string()),
            season,
            matchday: api.matchday,
            stage: api.stage,
            group_name: api.group,
            was_ingested: true,
            was_analyzed: false,
            is_published: false,
            analysis_status: None,
            analysis_priority: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_live_states() {
        assert_eq!(map_status("SCHEDULED"), LifecycleStatus::Scheduled);
        assert_eq!(map_status("TIMED"), LifecycleStatus::Scheduled);
        assert_eq!(map_status("IN_PLAY"), LifecycleStatus::Live);
        assert_eq!(map_status("PAUSED"), LifecycleStatus::Halftime);
        assert_eq!(map_status("FINISHED"), LifecycleStatus::Finished);
        assert_eq!(map_status("POSTPONED"), LifecycleStatus::Postponed);
        assert_eq!(map_status("SUSPENDED"), LifecycleStatus::Postponed);
        assert_eq!(map_status("CANCELLED"), LifecycleStatus::Cancelled);
        assert_eq!(map_status("SOMETHING_NEW"), LifecycleStatus::Scheduled);
    }

    #[test]
    fn api_match_maps_to_incoming_fixture() {
        let api: ApiMatch = serde_json::from_value(serde_json::json!({
            "id": 552433,
            "utcDate": "2025-09-06T19:30:00Z",
            "status": "FINISHED",
            "matchday": 3,
            "venue": "Emirates Stadium",
            "homeTeam": { "name": "Arsenal", "crest": "https://crests.example/57.png" },
            "awayTeam": { "name": "Chelsea", "crest": "https://crests.example/61.png" },
            "score": { "fullTime": { "home": 0, "away": 2 } },
            "referees": [{ "name": "M. Oliver" }],
            "competition": { "id": 2021, "name": "Premier League", "emblem": "https://crests.example/PL.png" },
            "season": { "startDate": "2025-08-01" }
        }))
        .expect("payload should deserialize");

        let incoming = IncomingFixture::from(api);

        assert_eq!(incoming.external_id.as_deref(), Some("552433"));
        assert_eq!(incoming.source_tag, SOURCE_TAG);
        assert_eq!(incoming.lifecycle_status, LifecycleStatus::Finished);
        // A zero score is a score, not a missing value.
        assert_eq!(incoming.home_score, Some(0));
        assert_eq!(incoming.away_score, Some(2));
        assert_eq!(incoming.referee.as_deref(), Some("M. Oliver"));
        assert_eq!(incoming.competition_id.as_deref(), Some("2021"));
        assert_eq!(incoming.season.as_deref(), Some("2025"));
        assert!(incoming.was_ingested);
        assert!(!incoming.is_published);
    }
}
