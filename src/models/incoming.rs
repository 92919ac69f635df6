//! Incoming fixture payload
//!
//! The normalized shape handed to the engine by provider fetch clients.
//! Field mapping and status-string translation are the fetch client's
//! responsibility; the engine only validates the minimum shape here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::fixture::{AnalysisPriority, AnalysisStatus, LifecycleStatus};

/// One fixture observation from an upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingFixture {
    /// Provider-assigned identifier; absent for manual entries.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Tag of the originating provider, ranked by the source trust order.
    pub source_tag: String,

    pub competition_name: String,
    pub home_team_name: String,
    pub away_team_name: String,
    /// RFC 3339 timestamp; parsed (and rejected if unparseable) during
    /// validation rather than at deserialization so a bad record is counted
    /// and skipped instead of poisoning the whole payload.
    pub kickoff_utc: String,
    pub lifecycle_status: LifecycleStatus,

    #[serde(default)]
    pub home_score: Option<i32>,
    #[serde(default)]
    pub away_score: Option<i32>,
    #[serde(default)]
    pub current_minute: Option<i32>,

    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub referee: Option<String>,
    #[serde(default)]
    pub home_team_logo_url: Option<String>,
    #[serde(default)]
    pub away_team_logo_url: Option<String>,
    #[serde(default)]
    pub competition_logo_url: Option<String>,

    #[serde(default)]
    pub competition_id: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub matchday: Option<i32>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,

    /// Workflow flags. Ingestion never sets these true in practice; the
    /// merge engine only ever widens them.
    #[serde(default)]
    pub was_ingested: bool,
    #[serde(default)]
    pub was_analyzed: bool,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub analysis_status: Option<AnalysisStatus>,
    #[serde(default)]
    pub analysis_priority: Option<AnalysisPriority>,
}

impl IncomingFixture {
    /// Check the minimum shape required for reconciliation and return the
    /// parsed kickoff instant.
    pub fn validate(&self) -> Result<DateTime<Utc>, ValidationError> {
        if self.home_team_name.trim().is_empty() {
            return Err(ValidationError::MissingHomeTeam);
        }
        if self.away_team_name.trim().is_empty() {
            return Err(ValidationError::MissingAwayTeam);
        }
        if self.competition_name.trim().is_empty() {
            return Err(ValidationError::MissingCompetition);
        }
        DateTime::parse_from_rfc3339(&self.kickoff_utc)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ValidationError::UnparseableKickoff {
                value: self.kickoff_utc.clone(),
            })
    }

    /// Short human-readable label used in batch error reporting.
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team_name, self.away_team_name)
    }
}
