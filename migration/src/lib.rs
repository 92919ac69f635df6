//! Database migrations for the matchsync reconciliation engine.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_01_000001_create_fixtures;
mod m2025_06_15_000100_add_fixture_detail_columns;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_01_000001_create_fixtures::Migration),
            Box::new(m2025_06_15_000100_add_fixture_detail_columns::Migration),
        ]
    }
}
