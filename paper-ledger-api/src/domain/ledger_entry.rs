use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

/// Hex-encoded SHA-256 digest. All hash-shaped fields in the ledger are
/// exactly 64 hex characters (or empty, for a genesis `prev_hash`).
pub type HexDigest = HeaplessString<64>;

/// # Documentation
/// One record in the metadata ledger.
///
/// Entries for the same `resource_id` form a hash chain: each entry's
/// `prev_hash` is the `entry_hash` of the entry before it, and the first
/// entry's `prev_hash` is empty. An entry is created exactly once via append
/// and is never updated or deleted; removal would invalidate the audit
/// guarantee of everything recorded after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Store-assigned sequence number. 0 for entries not yet persisted.
    /// Only used as a tie-breaker when `created_at` collides.
    pub id: i64,

    /// Opaque identifier of the subject the metadata describes. Shared by
    /// every entry in the resource's chain.
    pub resource_id: String,

    /// The recorded payload: an arbitrary JSON object. Hashing always goes
    /// through the canonical serialization, so the stored document alone
    /// reproduces `entry_hash`.
    pub metadata: serde_json::Value,

    /// Free-text author/submitter identity.
    pub created_by: Option<String>,

    /// Creation time, truncated to whole seconds before hashing so the
    /// persisted value and the hashed value are the same instant.
    pub created_at: DateTime<Utc>,

    /// `entry_hash` of the previous entry for this resource; empty for the
    /// first entry.
    pub prev_hash: HexDigest,

    /// Content hash over (prev_hash, resource_id, canonical metadata,
    /// created_at, created_by). Globally unique; the entry's identity.
    pub entry_hash: HexDigest,

    /// Keyed authentication code over `entry_hash`; present only when a
    /// signing key was configured at append time.
    pub signature: Option<HexDigest>,

    /// External anchoring reference (e.g. a transaction id in an outside
    /// system). Stored if supplied, never computed here.
    pub anchor_tx: Option<String>,
}

impl LedgerEntry {
    /// Whether this is the first entry of its resource's chain.
    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }
}
