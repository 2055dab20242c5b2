//! Graph store error types.

use thiserror::Error;

/// Errors raised by a graph store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach or authenticate against the store.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement failed.
    #[error("Database error: {0}")]
    Database(String),

    /// No backend handles the endpoint's scheme.
    #[error("Unsupported endpoint '{0}': expected bolt://, neo4j://, ws://, http:// or mem://")]
    UnsupportedEndpoint(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<neo4rs::Error> for StoreError {
    fn from(err: neo4rs::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}
