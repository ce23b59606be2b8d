//! Database error types

use thiserror::Error;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DbError {
    /// Name of the violated unique/check constraint, when the underlying
    /// driver reported one. Used to translate races past application-level
    /// checks into domain errors instead of raw database errors.
    pub fn constraint_name(&self) -> Option<&str> {
        match self {
            DbError::Query(sqlx::Error::Database(db_err)) => db_err.constraint(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::Serialization(e.to_string())
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
