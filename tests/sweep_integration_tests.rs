//! Integration tests for the reconciliation sweep.

mod test_utils;

use std::sync::Arc;

use chrono::{Duration, Utc};
use matchsync::models::fixture::{AnalysisPriority, AnalysisStatus, LifecycleStatus, Model};
use matchsync::repositories::{FixtureStore, SeaOrmFixtureStore};
use matchsync::schema_probe::ColumnSet;
use matchsync::sources::SourceRanking;
use matchsync::sweep::DuplicateSweep;
use uuid::Uuid;

use test_utils::setup_test_db;

fn stored_fixture(source_tag: &str, age_hours: i64) -> Model {
    let now = Utc::now();
    Model {
        id: Uuid::new_v4(),
        external_id: None,
        source_tag: Some(source_tag.to_string()),
        competition_name: "Premier League".to_string(),
        home_team_name: "Arsenal".to_string(),
        away_team_name: "Chelsea".to_string(),
        kickoff_utc: now.into(),
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
        analysis_status: AnalysisStatus::None,
        analysis_priority: AnalysisPriority::Normal,
        created_at: (now - Duration::hours(age_hours)).into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn sweep_keeps_the_most_trusted_duplicate() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let store = Arc::new(SeaOrmFixtureStore::new(db));
    let columns = ColumnSet::full();

    // Trust ranks [1, 0, 3] in arbitrary creation order; the rank-0 record
    // must survive.
    for fixture in [
        stored_fixture("sports-db", 3),
        stored_fixture("football-data", 1),
        stored_fixture("manual", 2),
    ] {
        store.insert(&columns, &fixture).await?;
    }

    let sweep = DuplicateSweep::new(store.clone(), SourceRanking::default());
    let outcome = sweep.run().await?;

    assert_eq!(outcome.removed, 2);
    assert!(outcome.errors.is_empty());

    let remaining = store.all(&columns).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].source_tag.as_deref(), Some("football-data"));
    Ok(())
}

#[tokio::test]
async fn sweep_breaks_trust_ties_by_newest_creation() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let store = Arc::new(SeaOrmFixtureStore::new(db));
    let columns = ColumnSet::full();

    let older = stored_fixture("football-data", 10);
    let newer = stored_fixture("football-data", 1);
    let newer_id = newer.id;
    store.insert(&columns, &older).await?;
    store.insert(&columns, &newer).await?;

    let sweep = DuplicateSweep::new(store.clone(), SourceRanking::default());
    let outcome = sweep.run().await?;

    assert_eq!(outcome.removed, 1);
    let remaining = store.all(&columns).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, newer_id);
    Ok(())
}

#[tokio::test]
async fn sweep_ignores_fixtures_with_distinct_keys() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let store = Arc::new(SeaOrmFixtureStore::new(db));
    let columns = ColumnSet::full();

    let league = stored_fixture("football-data", 1);
    let mut cup = stored_fixture("sports-db", 1);
    cup.competition_id = Some("FAC".to_string());
    let mut other_teams = stored_fixture("manual", 1);
    other_teams.home_team_name = "Leeds".to_string();
    other_teams.away_team_name = "Everton".to_string();

    for fixture in [&league, &cup, &other_teams] {
        store.insert(&columns, fixture).await?;
    }

    let sweep = DuplicateSweep::new(store.clone(), SourceRanking::default());
    let outcome = sweep.run().await?;

    assert_eq!(outcome.removed, 0);
    assert_eq!(store.all(&columns).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn sweep_is_idempotent() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let store = Arc::new(SeaOrmFixtureStore::new(db));
    let columns = ColumnSet::full();

    store.insert(&columns, &stored_fixture("sports-db", 2)).await?;
    store
        .insert(&columns, &stored_fixture("football-data", 1))
        .await?;

    let sweep = DuplicateSweep::new(store.clone(), SourceRanking::default());
    assert_eq!(sweep.run().await?.removed, 1);
    assert_eq!(sweep.run().await?.removed, 0);
    Ok(())
}

#[tokio::test]
async fn sweep_treats_order_swapped_records_as_duplicates() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let store = Arc::new(SeaOrmFixtureStore::new(db));
    let columns = ColumnSet::full();

    let listed = stored_fixture("football-data", 1);
    let mut swapped = stored_fixture("sports-db", 2);
    swapped.home_team_name = "Chelsea".to_string();
    swapped.away_team_name = "Arsenal".to_string();

    store.insert(&columns, &listed).await?;
    store.insert(&columns, &swapped).await?;

    let sweep = DuplicateSweep::new(store.clone(), SourceRanking::default());
    let outcome = sweep.run().await?;

    assert_eq!(outcome.removed, 1);
    let remaining = store.all(&columns).await?;
    assert_eq!(remaining[0].source_tag.as_deref(), Some("football-data"));
    Ok(())
}
