//! Error types for the storage layer

use std::fmt;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for storage operations
#[derive(Debug, Clone)]
pub enum ModelError {
    /// Database connection or query error
    Database(String),
    /// Referenced record does not exist; carries the table name
    NotFound(String),
    /// Model attributes failed validation
    Validation(String),
    /// Connection pool error
    Connection(String),
    /// Schema migration error
    Migration(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Database(msg) => write!(f, "Database error: {}", msg),
            ModelError::NotFound(table) => write!(f, "Record not found in table '{}'", table),
            ModelError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ModelError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ModelError::Migration(msg) => write!(f, "Migration error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ModelError::Connection(err.to_string())
            }
            other => ModelError::Database(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for ModelError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        ModelError::Migration(err.to_string())
    }
}

impl From<postkit_validation::ValidationErrors> for ModelError {
    fn from(errors: postkit_validation::ValidationErrors) -> Self {
        ModelError::Validation(errors.messages().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ModelError::NotFound("posts".to_string()).to_string(),
            "Record not found in table 'posts'"
        );
        assert_eq!(
            ModelError::Database("boom".to_string()).to_string(),
            "Database error: boom"
        );
    }

    #[test]
    fn test_pool_errors_map_to_connection() {
        let err = ModelError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, ModelError::Connection(_)));

        let err = ModelError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ModelError::Database(_)));
    }

    #[test]
    fn test_validation_errors_conversion() {
        let mut errors = postkit_validation::ValidationErrors::new();
        errors.add_error("title", "Title Can't Be Blank!");
        errors.add_error("description", "Description Can't Be Blank!");

        match ModelError::from(errors) {
            ModelError::Validation(msg) => {
                assert_eq!(msg, "Title Can't Be Blank!, Description Can't Be Blank!")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
