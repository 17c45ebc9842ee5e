use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Another append to the same resource committed first. The caller is
    /// expected to re-read the latest entry and rebuild before retrying.
    #[error("Concurrent append conflict on resource '{resource_id}'")]
    ConcurrencyConflict { resource_id: String },

    /// An insert collided on `entry_hash`. Never swallowed: either the hash
    /// function is broken or an entry is being replayed.
    #[error("Duplicate entry hash: {0}")]
    DuplicateHash(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
