//! Construction of hash-chained ledger entries.

use chrono::{DateTime, Timelike, Utc};
use sha2::{Digest, Sha256};

use crate::domain::canonical::canonical_metadata_text;
use crate::domain::ledger_entry::{HexDigest, LedgerEntry};
use crate::domain::signer::IntegritySigner;
use crate::error::{LedgerError, LedgerResult};

/// Separator between the fields folded into `entry_hash`.
const HASH_FIELD_SEPARATOR: &str = "|";

/// Format a timestamp the way it is folded into the hash input:
/// ISO-8601 at second granularity with a `Z` suffix.
pub fn hash_timestamp(created_at: &DateTime<Utc>) -> String {
    created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Compute an entry's content hash from its constituent fields.
///
/// The timestamp must already be truncated to whole seconds; recomputation
/// from a stored entry then reproduces the stored hash exactly.
pub fn compute_entry_hash(
    prev_hash: &str,
    resource_id: &str,
    canonical_metadata: &str,
    created_at: &DateTime<Utc>,
    created_by: Option<&str>,
) -> HexDigest {
    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(HASH_FIELD_SEPARATOR.as_bytes());
    hasher.update(resource_id.as_bytes());
    hasher.update(HASH_FIELD_SEPARATOR.as_bytes());
    hasher.update(canonical_metadata.as_bytes());
    hasher.update(HASH_FIELD_SEPARATOR.as_bytes());
    hasher.update(hash_timestamp(created_at).as_bytes());
    hasher.update(HASH_FIELD_SEPARATOR.as_bytes());
    hasher.update(created_by.unwrap_or_default().as_bytes());
    to_hex_digest(hasher.finalize())
}

/// Hex-encode a 32-byte digest into the bounded string used across models.
pub(crate) fn to_hex_digest(digest: impl AsRef<[u8]>) -> HexDigest {
    let hex = hex::encode(digest);
    HexDigest::try_from(hex.as_str()).expect("a SHA-256 digest is always 64 hex chars")
}

/// Build the next entry of a resource's chain.
///
/// Pure apart from the clock read; the timestamp is truncated to seconds and
/// recorded on the entry itself, so the hash is reproducible from stored
/// fields alone. The store assigns the sequence id on append.
pub fn build_entry(
    resource_id: &str,
    metadata: serde_json::Value,
    created_by: Option<String>,
    anchor_tx: Option<String>,
    previous_entry: Option<&LedgerEntry>,
    signer: &IntegritySigner,
) -> LedgerResult<LedgerEntry> {
    if resource_id.is_empty() {
        return Err(LedgerError::InvalidInput(
            "resource_id must not be empty".to_string(),
        ));
    }

    let canonical = canonical_metadata_text(&metadata)?;
    let created_at = truncate_to_seconds(Utc::now());
    let prev_hash = previous_entry
        .map(|entry| entry.entry_hash.clone())
        .unwrap_or_default();
    let entry_hash = compute_entry_hash(
        &prev_hash,
        resource_id,
        &canonical,
        &created_at,
        created_by.as_deref(),
    );
    let signature = signer.sign(&entry_hash);

    Ok(LedgerEntry {
        id: 0,
        resource_id: resource_id.to_string(),
        metadata,
        created_by,
        created_at,
        prev_hash,
        entry_hash,
        signature,
        anchor_tx,
    })
}

fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(0)
        .expect("zero nanoseconds is always a valid instant")
}
