use crate::models::team::TeamError;
use crate::tactics::SchemaError;
use thiserror::Error;

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod db;
pub mod echelons;
pub mod feeds;
pub mod models;
pub mod reconcile;
pub mod schema;
pub mod seed;
pub mod tactics;
pub mod team_edit;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

#[derive(Error, Debug)]
pub enum RmIntelError {
    #[error("Error connecting to database: {0}")]
    DbSetupError(#[from] db::DbSetupError),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Tactical schema error: {0}")]
    SchemaError(#[from] SchemaError),

    #[error("{0}")]
    TeamError(#[from] TeamError),
}
