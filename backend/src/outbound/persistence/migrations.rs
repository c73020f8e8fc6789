//! Embedded database migrations.
//!
//! Migrations run on a blocking connection at startup, before the async pool
//! is built.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying migrations.
#[derive(thiserror::Error, Debug)]
pub enum MigrationError {
    /// Establishing the blocking connection failed.
    #[error("database connection failed: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("migration run failed: {0}")]
    Run(String),
}

/// Apply all pending migrations against `database_url`.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Run(err.to_string()))?;
    Ok(())
}
