use serde::{Deserialize, Serialize};

use crate::domain::ledger_entry::HexDigest;
use crate::error::{LedgerError, LedgerResult};

/// A file submitted alongside an append, before it is persisted.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    /// Form field the file arrived under.
    pub field: String,
    /// Client-supplied filename, untrusted.
    pub filename: String,
    pub content: Vec<u8>,
}

impl AttachmentUpload {
    pub fn new(field: impl Into<String>, filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            filename: filename.into(),
            content,
        }
    }
}

/// The record folded into `metadata.files` for one persisted attachment.
///
/// `sha256` is the attachment's own content hash, independent of any
/// `entry_hash`: it proves the stored bytes themselves, while the entry hash
/// proves the metadata that references them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAttachment {
    pub field: String,
    pub filename: String,
    pub stored_as: String,
    pub sha256: HexDigest,
}

impl StoredAttachment {
    pub fn to_metadata_value(&self) -> LedgerResult<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| LedgerError::Internal(format!("unserializable attachment record: {e}")))
    }
}
