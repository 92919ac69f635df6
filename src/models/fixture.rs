//! Fixture entity model
//!
//! This module contains the SeaORM entity model for the fixtures table,
//! the canonical store of reconciled match records.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a fixture as reported by providers.
///
/// These fields always track the freshest observation regardless of source
/// trust; a provider reporting LIVE is believed even if a more trusted
/// provider last said SCHEDULED.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStatus {
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
    #[sea_orm(string_value = "LIVE")]
    Live,
    #[sea_orm(string_value = "HALFTIME")]
    Halftime,
    #[sea_orm(string_value = "FINISHED")]
    Finished,
    #[sea_orm(string_value = "POSTPONED")]
    Postponed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Editorial analysis progress. Advances NONE → PENDING → COMPLETED/FAILED
/// and never regresses across merges.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    #[sea_orm(string_value = "NONE")]
    None,
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

impl AnalysisStatus {
    /// Position along the workflow; later stages never give way to earlier
    /// ones, and COMPLETED/FAILED are terminal peers.
    pub fn stage(self) -> u8 {
        match self {
            AnalysisStatus::None => 0,
            AnalysisStatus::Pending => 1,
            AnalysisStatus::Completed | AnalysisStatus::Failed => 2,
        }
    }
}

impl Default for AnalysisStatus {
    fn default() -> Self {
        AnalysisStatus::None
    }
}

/// Editorial analysis priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisPriority {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "NORMAL")]
    Normal,
    #[sea_orm(string_value = "HIGH")]
    High,
}

impl Default for AnalysisPriority {
    fn default() -> Self {
        AnalysisPriority::Normal
    }
}

/// Fixture entity representing one canonical match record.
///
/// `external_id`/`source_tag` identify the provider that last contributed
/// the primary field set; they are nullable because a record may exist with
/// no known external identity (e.g. manual entry).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fixtures")]
pub struct Model {
    /// Unique identifier, assigned at first insertion (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub external_id: Option<String>,
    pub source_tag: Option<String>,

    pub competition_name: String,
    pub home_team_name: String,
    pub away_team_name: String,
    pub kickoff_utc: DateTimeWithTimeZone,
    pub lifecycle_status: LifecycleStatus,

    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub current_minute: Option<i32>,

    pub venue: Option<String>,
    pub referee: Option<String>,
    pub home_team_logo_url: Option<String>,
    pub away_team_logo_url: Option<String>,
    pub competition_logo_url: Option<String>,

    pub competition_id: Option<String>,
    pub season: Option<String>,
    pub matchday: Option<i32>,
    pub stage: Option<String>,
    pub group_name: Option<String>,

    /// Workflow state: may only widen across merges, never regress.
    pub was_ingested: bool,
    pub was_analyzed: bool,
    pub is_published: bool,
    pub analysis_status: AnalysisStatus,
    pub analysis_priority: AnalysisPriority,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
