//! Custom error types for the common library
//!
//! This module defines the storage-level error types shared by the
//! repositories of both services.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error returned by repository implementations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A unique constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store could not be reached or the query failed
    #[error("Store unavailable: {0}")]
    Unavailable(#[source] SqlxError),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        let conflict = err
            .as_database_error()
            .filter(|db_err| db_err.is_unique_violation())
            .map(|db_err| db_err.message().to_string());

        match conflict {
            Some(message) => RepositoryError::Conflict(message),
            None => RepositoryError::Unavailable(err),
        }
    }
}

/// Type alias for Result with RepositoryError
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_unavailable() {
        let err = RepositoryError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Unavailable(_)));
    }

    #[test]
    fn test_row_not_found_is_unavailable() {
        // Missing rows are modelled as Option/bool by repositories, never as errors
        let err = RepositoryError::from(SqlxError::RowNotFound);
        assert!(matches!(err, RepositoryError::Unavailable(_)));
    }
}
