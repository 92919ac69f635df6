//! Integration tests for the upsert executor against an in-memory store.
//!
//! These exercise the full probe → resolve → merge → write path, including
//! the degraded-schema case where only the baseline migration has run.

mod test_utils;

use std::sync::Arc;

use matchsync::models::fixture::LifecycleStatus;
use matchsync::repositories::{FixtureStore, SeaOrmFixtureStore};
use matchsync::schema_probe::{self, ColumnSet};
use matchsync::sources::SourceRanking;
use matchsync::sync_executor::{ExecutorConfig, UpsertExecutor};
use sea_orm::DatabaseConnection;

use test_utils::{incoming_fixture, setup_core_schema_db, setup_test_db};

fn executor(db: DatabaseConnection) -> (UpsertExecutor, Arc<SeaOrmFixtureStore>) {
    let store = Arc::new(SeaOrmFixtureStore::new(db));
    let executor = UpsertExecutor::new(
        store.clone(),
        SourceRanking::default(),
        ExecutorConfig {
            per_record_delay_ms: 0,
            error_cap: 100,
        },
    );
    (executor, store)
}

#[tokio::test]
async fn reingesting_the_same_fixture_updates_in_place() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let (executor, store) = executor(db);

    let mut incoming = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    incoming.external_id = Some("552433".to_string());

    let first = executor.upsert_batch(std::slice::from_ref(&incoming)).await;
    assert_eq!(first.inserted, 1);
    assert_eq!(first.updated, 0);
    assert!(first.errors.is_empty());

    let second = executor.upsert_batch(std::slice::from_ref(&incoming)).await;
    assert_eq!(second.inserted, 0);
    assert_eq!(second.updated, 1);
    assert!(second.errors.is_empty());

    let stored = store.all(&ColumnSet::full()).await?;
    assert_eq!(stored.len(), 1);
    Ok(())
}

#[tokio::test]
async fn stored_id_survives_reingestion() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let (executor, store) = executor(db);

    let incoming = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    executor.upsert_batch(std::slice::from_ref(&incoming)).await;
    let first_id = store.all(&ColumnSet::full()).await?[0].id;

    executor.upsert_batch(std::slice::from_ref(&incoming)).await;
    let stored = store.all(&ColumnSet::full()).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, first_id);
    Ok(())
}

#[tokio::test]
async fn swapped_team_order_on_the_same_day_updates_rather_than_inserts() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let (executor, store) = executor(db);

    let evening = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    let outcome = executor.upsert_batch(&[evening]).await;
    assert_eq!(outcome.inserted, 1);

    // Same calendar day, swapped team order, different time of day: the
    // canonical identity is the same fixture.
    let swapped = incoming_fixture("Chelsea", "Arsenal", "2025-09-06T21:00:00Z", "sports-db");
    let outcome = executor.upsert_batch(&[swapped]).await;
    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.updated, 1);

    assert_eq!(store.all(&ColumnSet::full()).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn published_flag_survives_reingestion_from_any_source() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let (executor, store) = executor(db);

    let incoming = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "sports-db");
    executor.upsert_batch(std::slice::from_ref(&incoming)).await;

    // Editorial action outside the engine publishes the fixture.
    let columns = ColumnSet::full();
    let stored = store.all(&columns).await?;
    let mut published = stored[0].clone();
    published.is_published = true;
    published.was_analyzed = true;
    store.update(&columns, &stored[0], &published).await?;

    // A re-sync from a more trusted provider must not unpublish it.
    let fresh = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    let outcome = executor.upsert_batch(&[fresh]).await;
    assert_eq!(outcome.updated, 1);

    let stored = store.all(&columns).await?;
    assert!(stored[0].is_published);
    assert!(stored[0].was_analyzed);
    Ok(())
}

#[tokio::test]
async fn descriptive_fields_follow_source_trust() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let (executor, store) = executor(db);

    let mut trusted = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    trusted.venue = Some("Emirates Stadium".to_string());
    executor.upsert_batch(&[trusted]).await;

    // A lower-trust provider re-syncs without a venue; nothing regresses.
    let lesser = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "sports-db");
    executor.upsert_batch(&[lesser]).await;

    let columns = ColumnSet::full();
    let stored = store.all(&columns).await?;
    assert_eq!(stored[0].venue.as_deref(), Some("Emirates Stadium"));
    assert_eq!(stored[0].source_tag.as_deref(), Some("football-data"));

    // An equal-trust provider with a differing non-null venue overwrites.
    let mut moved = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    moved.venue = Some("Wembley".to_string());
    executor.upsert_batch(&[moved]).await;

    let stored = store.all(&columns).await?;
    assert_eq!(stored[0].venue.as_deref(), Some("Wembley"));
    Ok(())
}

#[tokio::test]
async fn lifecycle_fields_adopt_freshest_observation_regardless_of_trust() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let (executor, store) = executor(db);

    let scheduled = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    executor.upsert_batch(&[scheduled]).await;

    let mut live = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "manual");
    live.lifecycle_status = LifecycleStatus::Live;
    live.home_score = Some(1);
    live.current_minute = Some(27);
    let outcome = executor.upsert_batch(&[live]).await;
    assert_eq!(outcome.updated, 1);

    let stored = store.all(&ColumnSet::full()).await?;
    assert_eq!(stored[0].lifecycle_status, LifecycleStatus::Live);
    assert_eq!(stored[0].home_score, Some(1));
    assert_eq!(stored[0].current_minute, Some(27));
    Ok(())
}

#[tokio::test]
async fn one_invalid_record_does_not_abort_the_batch() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let (executor, store) = executor(db);

    let invalid = incoming_fixture("", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    let mut unparseable =
        incoming_fixture("Leeds", "Everton", "2025-09-06T15:00:00Z", "football-data");
    unparseable.kickoff_utc = "next saturday".to_string();
    let valid = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");

    let outcome = executor.upsert_batch(&[invalid, unparseable, valid]).await;

    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(outcome.errors.len(), 2);
    assert_eq!(store.all(&ColumnSet::full()).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn distinct_competitions_on_the_same_day_stay_distinct() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let (executor, store) = executor(db);

    let league = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T15:00:00Z", "football-data");
    executor.upsert_batch(&[league]).await;

    // Cup tie between the same teams on the same day: different competition
    // id means a different fixture.
    let mut cup = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T20:00:00Z", "football-data");
    cup.competition_id = Some("FAC".to_string());
    cup.competition_name = "FA Cup".to_string();
    let outcome = executor.upsert_batch(&[cup]).await;
    assert_eq!(outcome.inserted, 1);

    assert_eq!(store.all(&ColumnSet::full()).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn degraded_schema_still_accepts_records_with_optional_fields() -> anyhow::Result<()> {
    let db = setup_core_schema_db().await?;
    let (executor, store) = executor(db);

    let columns = schema_probe::detect(store.as_ref()).await;
    assert!(!columns.contains("venue"));
    assert!(!columns.contains("is_published"));
    assert!(columns.contains("kickoff_utc"));

    let mut incoming = incoming_fixture("Arsenal", "Chelsea", "2025-09-06T19:30:00Z", "football-data");
    incoming.external_id = Some("552433".to_string());
    incoming.venue = Some("Emirates Stadium".to_string());
    incoming.home_score = Some(2);

    let outcome = executor.upsert_batch(std::slice::from_ref(&incoming)).await;
    assert_eq!(outcome.inserted, 1);
    assert!(outcome.errors.is_empty(), "optional fields must be projected away, not rejected: {:?}", outcome.errors);

    // Re-ingestion resolves through the heuristic (identity columns are
    // absent) and updates in place.
    let outcome = executor.upsert_batch(std::slice::from_ref(&incoming)).await;
    assert_eq!(outcome.updated, 1);
    assert!(outcome.errors.is_empty());

    let stored = store.all(&columns).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].competition_name, "Premier League");
    // Absent columns read back as their defaults.
    assert_eq!(stored[0].venue, None);
    assert!(!stored[0].is_published);
    Ok(())
}

#[tokio::test]
async fn probe_reports_the_full_schema_when_current() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let store = SeaOrmFixtureStore::new(db);

    let columns = schema_probe::detect(&store).await;
    assert_eq!(columns, ColumnSet::full());
    Ok(())
}
