use diesel::{Connection, ConnectionError, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;
use thiserror::Error;

use crate::config::CONFIG;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug, Error)]
pub enum DbSetupError {
    #[error("Error connecting to database: {0}")]
    ConnectionError(#[from] ConnectionError),
    #[error("Error configuring connection: {0}")]
    QueryError(#[from] diesel::result::Error),
}

/// opens a connection with foreign keys enforced
pub fn establish(database_url: &str) -> Result<SqliteConnection, DbSetupError> {
    let mut conn = SqliteConnection::establish(database_url)?;
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
    Ok(conn)
}

pub fn raw_diesel_cxn_from_env() -> Result<SqliteConnection, DbSetupError> {
    establish(&CONFIG.database_url)
}

pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for m in applied {
        info!("Applied migration {m}");
    }
    Ok(())
}
