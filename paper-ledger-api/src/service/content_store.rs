use async_trait::async_trait;

use crate::domain::ledger_entry::HexDigest;

/// Receipt for one object persisted by a content store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Unique, traversal-safe name the object was stored under.
    pub stored_name: String,
    /// SHA-256 over the exact persisted bytes, hex-encoded.
    pub content_hash: HexDigest,
    pub size: u64,
}

/// Durable storage for uploaded binary objects.
///
/// The ledger core treats this as a collaborator: attachments are persisted
/// here first and only referenced from ledger metadata by `stored_name` and
/// content hash.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist `content` under a unique name derived from `suggested_name`.
    ///
    /// Implementations must guarantee the stored name is unique and free of
    /// path traversal, and that the save is atomic: a failed save leaves no
    /// partial object behind.
    async fn save(
        &self,
        content: &[u8],
        suggested_name: &str,
    ) -> Result<StoredObject, Box<dyn std::error::Error + Send + Sync>>;

    /// Read an object back; `None` if it does not exist.
    async fn load(
        &self,
        stored_name: &str,
    ) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>>;

    /// Remove an object. Removing a missing object is not an error.
    async fn remove(
        &self,
        stored_name: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
