use std::time::Duration;

use crate::validator::ValidationErrors;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationErrors),

    #[error("Edit conflict: record {id} is no longer at version {version}")]
    StaleVersion { id: i64, version: i32 },

    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),
}
