//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, and builders for incoming fixture payloads.

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use matchsync::models::fixture::LifecycleStatus;
use matchsync::models::incoming::IncomingFixture;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Sets up an in-memory SQLite database with only the baseline migration
/// applied, so none of the optional detail columns exist. This is the
/// degraded schema the capability probe must tolerate.
#[allow(dead_code)]
pub async fn setup_core_schema_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, Some(1)).await?;
    Ok(db)
}

/// Builds a minimal valid incoming fixture; tests override fields as needed.
#[allow(dead_code)]
pub fn incoming_fixture(
    home_team: &str,
    away_team: &str,
    kickoff_utc: &str,
    source_tag: &str,
) -> IncomingFixture {
    IncomingFixture {
        external_id: None,
        source_tag: source_tag.to_string(),
        competition_name: "Premier League".to_string(),
        home_team_name: home_team.to_string(),
        away_team_name: away_team.to_string(),
        kickoff_utc: kickoff_utc.to_string(),
        lifecycle_status: LifecycleStatus::Scheduled,
        home_score: None,
        away_score: None,
        current_minute: None,
        venue: None,
        referee: None,
        home_team_logo_url: None,
        away_team_logo_url: None,
        competition_logo_url: None,
        competition_id: Some("PL".to_string()),
        season: None,
        matchday: None,
        stage: None,
        group_name: None,
        was_ingested: true,
        was_analyzed: false,
        is_published: false,
        analysis_status: None,
        analysis_priority: None,
    }
}
