//! Database migrations.
//!
//! Schema migrations for the database, applied at startup and
//! version-tracked by `sea-orm-migration`.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_user_table;
mod m20250301_000002_create_contribution_table;
mod m20250301_000003_create_investment_tables;
mod m20250301_000004_create_uploaded_file_table;
mod m20250301_000005_create_support_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_user_table::Migration),
            Box::new(m20250301_000002_create_contribution_table::Migration),
            Box::new(m20250301_000003_create_investment_tables::Migration),
            Box::new(m20250301_000004_create_uploaded_file_table::Migration),
            Box::new(m20250301_000005_create_support_tables::Migration),
        ]
    }
}
