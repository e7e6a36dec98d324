//! Test utilities for database operations.
//!
//! Provides an in-memory `SQLite` database with the full schema applied,
//! so repository and service tests can run without external services.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::migrations::Migrator;

/// A migrated, in-memory test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: DatabaseConnection,
}

impl TestDatabase {
    /// Create a fresh in-memory database and apply all migrations.
    ///
    /// The pool is capped at a single connection: every `SQLite`
    /// `:memory:` connection is its own database, so a larger pool
    /// would scatter tables across connections.
    pub async fn new() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);

        let conn = Database::connect(opt).await?;

        use sea_orm_migration::MigratorTrait;
        Migrator::up(&conn, None).await?;

        Ok(Self { conn })
    }

    /// Get the database connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}
