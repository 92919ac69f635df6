//! Migration to add optional detail columns to the fixtures table.
//!
//! Adds provider identity, live score, descriptive, and editorial workflow
//! columns. Environments that have not applied this migration expose only
//! the core fixture columns; the capability probe detects that at runtime.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::ExternalId).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::SourceTag).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::HomeScore).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::AwayScore).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::CurrentMinute).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::Venue).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::Referee).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::HomeTeamLogoUrl).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::AwayTeamLogoUrl).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::CompetitionLogoUrl).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::CompetitionId).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::Season).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::Matchday).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::Stage).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(ColumnDef::new(Fixtures::GroupName).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(
                        ColumnDef::new(Fixtures::WasIngested)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(
                        ColumnDef::new(Fixtures::WasAnalyzed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(
                        ColumnDef::new(Fixtures::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(
                        ColumnDef::new(Fixtures::AnalysisStatus)
                            .text()
                            .not_null()
                            .default("NONE"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Fixtures::Table)
                    .add_column(
                        ColumnDef::new(Fixtures::AnalysisPriority)
                            .text()
                            .not_null()
                            .default("NORMAL"),
                    )
                    .to_owned(),
            )
            .await?;

        // Exact-identity resolution probes by provider pair.
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE INDEX IF NOT EXISTS idx_fixtures_external_source ON fixtures (external_id, source_tag)".to_string(),
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_fixtures_external_source")
                    .to_owned(),
            )
            .await?;

        for column in [
            Fixtures::ExternalId,
            Fixtures::SourceTag,
            Fixtures::HomeScore,
            Fixtures::AwayScore,
            Fixtures::CurrentMinute,
            Fixtures::Venue,
            Fixtures::Referee,
            Fixtures::HomeTeamLogoUrl,
            Fixtures::AwayTeamLogoUrl,
            Fixtures::CompetitionLogoUrl,
            Fixtures::CompetitionId,
            Fixtures::Season,
            Fixtures::Matchday,
            Fixtures::Stage,
            Fixtures::GroupName,
            Fixtures::WasIngested,
            Fixtures::WasAnalyzed,
            Fixtures::IsPublished,
            Fixtures::AnalysisStatus,
            Fixtures::AnalysisPriority,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Fixtures::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Fixtures {
    Table,
    ExternalId,
    SourceTag,
    HomeScore,
    AwayScore,
    CurrentMinute,
    Venue,
    Referee,
    HomeTeamLogoUrl,
    AwayTeamLogoUrl,
    CompetitionLogoUrl,
    CompetitionId,
    Season,
    Matchday,
    Stage,
    GroupName,
    WasIngested,
    WasAnalyzed,
    IsPublished,
    AnalysisStatus,
    AnalysisPriority,
}
