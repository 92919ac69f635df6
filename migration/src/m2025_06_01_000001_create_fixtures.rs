//! Migration to create the fixtures table.
//!
//! This migration creates the baseline fixtures table carrying only the
//! core columns every deployment is guaranteed to have. Optional identity,
//! score, and workflow columns arrive in a later migration, so environments
//! lag behind each other and writers must tolerate their absence.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fixtures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fixtures::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fixtures::CompetitionName).text().not_null())
                    .col(ColumnDef::new(Fixtures::HomeTeamName).text().not_null())
                    .col(ColumnDef::new(Fixtures::AwayTeamName).text().not_null())
                    .col(
                        ColumnDef::new(Fixtures::KickoffUtc)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Fixtures::LifecycleStatus)
                            .text()
                            .not_null()
                            .default("SCHEDULED"),
                    )
                    .col(
                        ColumnDef::new(Fixtures::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Fixtures::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Candidate resolution scans by team pair within a kickoff day.
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE INDEX IF NOT EXISTS idx_fixtures_teams_kickoff ON fixtures (home_team_name, away_team_name, kickoff_utc)".to_string(),
            ))
            .await?;

        // Listing and sweeps read in kickoff order.
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE INDEX IF NOT EXISTS idx_fixtures_kickoff ON fixtures (kickoff_utc)".to_string(),
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_fixtures_teams_kickoff").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_fixtures_kickoff").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Fixtures::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Fixtures {
    Table,
    Id,
    CompetitionName,
    HomeTeamName,
    AwayTeamName,
    KickoffUtc,
    LifecycleStatus,
    CreatedAt,
    UpdatedAt,
}
