use thiserror::Error;

/// Errors raised by the storage providers.
///
/// Every failure coming out of a store is reported through this type, so the
/// recommendation engine and the HTTP layer only ever deal with one error shape
/// for data access.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage connection error: {0}")]
    Connection(String),
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("Failed to encode or decode a JSON column: {0}")]
    Json(#[from] serde_json::Error),
}
