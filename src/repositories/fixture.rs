//! # Fixture Repository
//!
//! The datastore client for canonical fixture records. The [`FixtureStore`]
//! trait is the seam the orchestrator and sweep are constructed against; the
//! SeaORM implementation degrades both reads and writes to the column set
//! reported by the capability probe, so a deployment lagging behind the
//! detail migration still syncs its core fields instead of failing.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, Statement,
};
use uuid::Uuid;

use crate::error::{StoreError, is_missing_column};
use crate::models::fixture::{self, LifecycleStatus};
use crate::schema_probe::{ColumnSet, CORE_COLUMNS, OPTIONAL_COLUMNS};

/// Generic read/upsert/delete interface over fixture records, plus the
/// per-column existence probe consumed by the capability probe.
///
/// Injected into the orchestrator and sweep at construction time; the
/// caller owns the connection lifecycle.
#[async_trait]
pub trait FixtureStore: Send + Sync {
    /// Exact identity lookup by `(external_id, source_tag)` pair.
    async fn find_by_external(
        &self,
        columns: &ColumnSet,
        external_id: &str,
        source_tag: &str,
    ) -> Result<Option<fixture::Model>, StoreError>;

    /// Heuristic lookup: the same team pair (either orientation) with
    /// kickoff inside `[day_start, day_end)`, in deterministic order.
    async fn find_same_day(
        &self,
        columns: &ColumnSet,
        home_team: &str,
        away_team: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<fixture::Model>, StoreError>;

    /// All stored fixtures; the reconciliation sweep's working set.
    async fn all(&self, columns: &ColumnSet) -> Result<Vec<fixture::Model>, StoreError>;

    async fn insert(
        &self,
        columns: &ColumnSet,
        fixture: &fixture::Model,
    ) -> Result<(), StoreError>;

    /// Write only the columns whose merged value differs from the freshly
    /// read row, so concurrent editorial flips are never clobbered back.
    async fn update(
        &self,
        columns: &ColumnSet,
        previous: &fixture::Model,
        merged: &fixture::Model,
    ) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Cheap existence probe for one column. `Ok(false)` means the column is
    /// definitively absent; other failures propagate for the caller to
    /// classify.
    async fn probe_column(&self, column: &str) -> Result<bool, StoreError>;

    async fn count_total(&self) -> Result<u64, StoreError>;
    async fn count_live(&self) -> Result<u64, StoreError>;
    async fn count_published(&self, columns: &ColumnSet) -> Result<u64, StoreError>;
    async fn count_analyzed(&self, columns: &ColumnSet) -> Result<u64, StoreError>;
}

/// SeaORM-backed fixture store.
pub struct SeaOrmFixtureStore {
    db: DatabaseConnection,
}

impl SeaOrmFixtureStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Build a select that reads present columns directly and synthesizes
    /// typed defaults for absent ones, so entity deserialization works
    /// against any migration state.
    fn degraded_select(&self, columns: &ColumnSet) -> Select<fixture::Entity> {
        let backend = self.db.get_database_backend();
        let mut query = fixture::Entity::find().select_only();
        for column in CORE_COLUMNS.iter().chain(OPTIONAL_COLUMNS.iter()) {
            if columns.contains(column) {
                if let Ok(col) = fixture::Column::from_str(column) {
                    query = query.column(col);
                }
            } else {
                query = query.expr_as(
                    Expr::cust(absent_column_expr(backend, column)),
                    *column,
                );
            }
        }
        query
    }
}

/// Select expression standing in for a column the schema does not have.
/// Values match the DB defaults the detail migration would install.
fn absent_column_expr(backend: DbBackend, column: &str) -> String {
    match column {
        "was_ingested" | "was_analyzed" | "is_published" => "FALSE".to_string(),
        "analysis_status" => "'NONE'".to_string(),
        "analysis_priority" => "'NORMAL'".to_string(),
        "home_score" | "away_score" | "current_minute" | "matchday" => {
            "CAST(NULL AS integer)".to_string()
        }
        "created_at" | "updated_at" => match backend {
            DbBackend::Postgres => "CAST('1970-01-01T00:00:00+00:00' AS timestamptz)".to_string(),
            _ => "'1970-01-01T00:00:00+00:00'".to_string(),
        },
        _ => "CAST(NULL AS text)".to_string(),
    }
}

/// Project a new fixture onto the writable column set.
fn project_insert(fixture: &fixture::Model, columns: &ColumnSet) -> fixture::ActiveModel {
    let mut row = fixture::ActiveModel {
        id: Set(fixture.id),
        competition_name: Set(fixture.competition_name.clone()),
        home_team_name: Set(fixture.home_team_name.clone()),
        away_team_name: Set(fixture.away_team_name.clone()),
        kickoff_utc: Set(fixture.kickoff_utc),
        lifecycle_status: Set(fixture.lifecycle_status),
        ..Default::default()
    };

    if columns.contains("external_id") {
        row.external_id = Set(fixture.external_id.clone());
    }
    if columns.contains("source_tag") {
        row.source_tag = Set(fixture.source_tag.clone());
    }
    if columns.contains("home_score") {
        row.home_score = Set(fixture.home_score);
    }
    if columns.contains("away_score") {
        row.away_score = Set(fixture.away_score);
    }
    if columns.contains("current_minute") {
        row.current_minute = Set(fixture.current_minute);
    }
    if columns.contains("venue") {
        row.venue = Set(fixture.venue.clone());
    }
    if columns.contains("referee") {
        row.referee = Set(fixture.referee.clone());
    }
    if columns.contains("home_team_logo_url") {
        row.home_team_logo_url = Set(fixture.home_team_logo_url.clone());
    }
    if columns.contains("away_team_logo_url") {
        row.away_team_logo_url = Set(fixture.away_team_logo_url.clone());
    }
    if columns.contains("competition_logo_url") {
        row.competition_logo_url = Set(fixture.competition_logo_url.clone());
    }
    if columns.contains("competition_id") {
        row.competition_id = Set(fixture.competition_id.clone());
    }
    if columns.contains("season") {
        row.season = Set(fixture.season.clone());
    }
    if columns.contains("matchday") {
        row.matchday = Set(fixture.matchday);
    }
    if columns.contains("stage") {
        row.stage = Set(fixture.stage.clone());
    }
    if columns.contains("group_name") {
        row.group_name = Set(fixture.group_name.clone());
    }
    if columns.contains("was_ingested") {
        row.was_ingested = Set(fixture.was_ingested);
    }
    if columns.contains("was_analyzed") {
        row.was_analyzed = Set(fixture.was_analyzed);
    }
    if columns.contains("is_published") {
        row.is_published = Set(fixture.is_published);
    }
    if columns.contains("analysis_status") {
        row.analysis_status = Set(fixture.analysis_status);
    }
    if columns.contains("analysis_priority") {
        row.analysis_priority = Set(fixture.analysis_priority);
    }
    if columns.contains("created_at") {
        row.created_at = Set(fixture.created_at);
    }
    if columns.contains("updated_at") {
        row.updated_at = Set(fixture.updated_at);
    }

    row
}

/// Project a merged fixture onto the writable column set, keeping only the
/// columns that actually changed against the freshly read row.
fn project_update(
    previous: &fixture::Model,
    merged: &fixture::Model,
    columns: &ColumnSet,
) -> fixture::ActiveModel {
    let mut row = fixture::ActiveModel {
        id: ActiveValue::Unchanged(previous.id),
        ..Default::default()
    };

    if merged.competition_name != previous.competition_name {
        row.competition_name = Set(merged.competition_name.clone());
    }
    if merged.home_team_name != previous.home_team_name {
        row.home_team_name = Set(merged.home_team_name.clone());
    }
    if merged.away_team_name != previous.away_team_name {
        row.away_team_name = Set(merged.away_team_name.clone());
    }
    if merged.kickoff_utc != previous.kickoff_utc {
        row.kickoff_utc = Set(merged.kickoff_utc);
    }
    if merged.lifecycle_status != previous.lifecycle_status {
        row.lifecycle_status = Set(merged.lifecycle_status);
    }

    if columns.contains("external_id") && merged.external_id != previous.external_id {
        row.external_id = Set(merged.external_id.clone());
    }
    if columns.contains("source_tag") && merged.source_tag != previous.source_tag {
        row.source_tag = Set(merged.source_tag.clone());
    }
    if columns.contains("home_score") && merged.home_score != previous.home_score {
        row.home_score = Set(merged.home_score);
    }
    if columns.contains("away_score") && merged.away_score != previous.away_score {
        row.away_score = Set(merged.away_score);
    }
    if columns.contains("current_minute") && merged.current_minute != previous.current_minute {
        row.current_minute = Set(merged.current_minute);
    }
    if columns.contains("venue") && merged.venue != previous.venue {
        row.venue = Set(merged.venue.clone());
    }
    if columns.contains("referee") && merged.referee != previous.referee {
        row.referee = Set(merged.referee.clone());
    }
    if columns.contains("home_team_logo_url")
        && merged.home_team_logo_url != previous.home_team_logo_url
    {
        row.home_team_logo_url = Set(merged.home_team_logo_url.clone());
    }
    if columns.contains("away_team_logo_url")
        && merged.away_team_logo_url != previous.away_team_logo_url
    {
        row.away_team_logo_url = Set(merged.away_team_logo_url.clone());
    }
    if columns.contains("competition_logo_url")
        && merged.competition_logo_url != previous.competition_logo_url
    {
        row.competition_logo_url = Set(merged.competition_logo_url.clone());
    }
    if columns.contains("competition_id") && merged.competition_id != previous.competition_id {
        row.competition_id = Set(merged.competition_id.clone());
    }
    if columns.contains("season") && merged.season != previous.season {
        row.season = Set(merged.season.clone());
    }
    if columns.contains("matchday") && merged.matchday != previous.matchday {
        row.matchday = Set(merged.matchday);
    }
    if columns.contains("stage") && merged.stage != previous.stage {
        row.stage = Set(merged.stage.clone());
    }
    if columns.contains("group_name") && merged.group_name != previous.group_name {
        row.group_name = Set(merged.group_name.clone());
    }
    if columns.contains("was_ingested") && merged.was_ingested != previous.was_ingested {
        row.was_ingested = Set(merged.was_ingested);
    }
    if columns.contains("was_analyzed") && merged.was_analyzed != previous.was_analyzed {
        row.was_analyzed = Set(merged.was_analyzed);
    }
    if columns.contains("is_published") && merged.is_published != previous.is_published {
        row.is_published = Set(merged.is_published);
    }
    if columns.contains("analysis_status") && merged.analysis_status != previous.analysis_status {
        row.analysis_status = Set(merged.analysis_status);
    }
    if columns.contains("analysis_priority")
        && merged.analysis_priority != previous.analysis_priority
    {
        row.analysis_priority = Set(merged.analysis_priority);
    }
    if columns.contains("updated_at") && merged.updated_at != previous.updated_at {
        row.updated_at = Set(merged.updated_at);
    }

    row
}

#[async_trait]
impl FixtureStore for SeaOrmFixtureStore {
    async fn find_by_external(
        &self,
        columns: &ColumnSet,
        external_id: &str,
        source_tag: &str,
    ) -> Result<Option<fixture::Model>, StoreError> {
        self.degraded_select(columns)
            .filter(fixture::Column::ExternalId.eq(external_id))
            .filter(fixture::Column::SourceTag.eq(source_tag))
            .into_model::<fixture::Model>()
            .one(&self.db)
            .await
            .map_err(StoreError::database_error)
    }

    async fn find_same_day(
        &self,
        columns: &ColumnSet,
        home_team: &str,
        away_team: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<fixture::Model>, StoreError> {
        // Canonical identity is order-independent, so "A vs B" must find a
        // stored "B vs A" on the same day.
        let team_pair = Condition::any()
            .add(
                Condition::all()
                    .add(fixture::Column::HomeTeamName.eq(home_team))
                    .add(fixture::Column::AwayTeamName.eq(away_team)),
            )
            .add(
                Condition::all()
                    .add(fixture::Column::HomeTeamName.eq(away_team))
                    .add(fixture::Column::AwayTeamName.eq(home_team)),
            );

        self.degraded_select(columns)
            .filter(team_pair)
            .filter(fixture::Column::KickoffUtc.gte(day_start))
            .filter(fixture::Column::KickoffUtc.lt(day_end))
            .order_by_asc(fixture::Column::KickoffUtc)
            .order_by_asc(fixture::Column::Id)
            .into_model::<fixture::Model>()
            .all(&self.db)
            .await
            .map_err(StoreError::database_error)
    }

    async fn all(&self, columns: &ColumnSet) -> Result<Vec<fixture::Model>, StoreError> {
        self.degraded_select(columns)
            .order_by_asc(fixture::Column::KickoffUtc)
            .order_by_asc(fixture::Column::Id)
            .into_model::<fixture::Model>()
            .all(&self.db)
            .await
            .map_err(StoreError::database_error)
    }

    async fn insert(
        &self,
        columns: &ColumnSet,
        fixture_row: &fixture::Model,
    ) -> Result<(), StoreError> {
        let row = project_insert(fixture_row, columns);
        fixture::Entity::insert(row)
            .exec(&self.db)
            .await
            .map_err(StoreError::database_error)?;
        Ok(())
    }

    async fn update(
        &self,
        columns: &ColumnSet,
        previous: &fixture::Model,
        merged: &fixture::Model,
    ) -> Result<(), StoreError> {
        use sea_orm::ActiveModelTrait;

        let row = project_update(previous, merged, columns);
        if !row.is_changed() {
            return Ok(());
        }

        let result = fixture::Entity::update_many()
            .set(row)
            .filter(fixture::Column::Id.eq(previous.id))
            .exec(&self.db)
            .await
            .map_err(StoreError::database_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound { id: previous.id });
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        fixture::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(StoreError::database_error)?;
        Ok(())
    }

    async fn probe_column(&self, column: &str) -> Result<bool, StoreError> {
        let probe = Statement::from_string(
            self.db.get_database_backend(),
            format!("SELECT {column} FROM fixtures LIMIT 1"),
        );
        match self.db.query_one(probe).await {
            Ok(_) => Ok(true),
            Err(err) if is_missing_column(&err) => Ok(false),
            Err(err) => Err(StoreError::database_error(err)),
        }
    }

    async fn count_total(&self) -> Result<u64, StoreError> {
        fixture::Entity::find()
            .select_only()
            .column(fixture::Column::Id)
            .count(&self.db)
            .await
            .map_err(StoreError::database_error)
    }

    async fn count_live(&self) -> Result<u64, StoreError> {
        fixture::Entity::find()
            .select_only()
            .column(fixture::Column::Id)
            .filter(fixture::Column::LifecycleStatus.eq(LifecycleStatus::Live))
            .count(&self.db)
            .await
            .map_err(StoreError::database_error)
    }

    async fn count_published(&self, columns: &ColumnSet) -> Result<u64, StoreError> {
        if !columns.contains("is_published") {
            return Ok(0);
        }
        fixture::Entity::find()
            .select_only()
            .column(fixture::Column::Id)
            .filter(fixture::Column::IsPublished.eq(true))
            .count(&self.db)
            .await
            .map_err(StoreError::database_error)
    }

    async fn count_analyzed(&self, columns: &ColumnSet) -> Result<u64, StoreError> {
        if !columns.contains("was_analyzed") {
            return Ok(0);
        }
        fixture::Entity::find()
            .select_only()
            .column(fixture::Column::Id)
            .filter(fixture::Column::WasAnalyzed.eq(true))
            .count(&self.db)
            .await
            .map_err(StoreError::database_error)
    }
}
