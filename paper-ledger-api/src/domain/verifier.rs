//! Tamper-evidence checks over a resource's full entry sequence.

use serde::{Deserialize, Serialize};

use crate::domain::canonical::canonical_metadata_text;
use crate::domain::chain::compute_entry_hash;
use crate::domain::ledger_entry::{HexDigest, LedgerEntry};
use crate::domain::signer::IntegritySigner;
use crate::error::LedgerResult;

/// Why a chain failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFault {
    /// The entry's stored hash does not match the hash recomputed from its
    /// stored fields: some hashed field was mutated after the fact.
    HashMismatch,
    /// The entry's `prev_hash` does not link to its predecessor.
    ChainBreak,
    /// The stored signature does not match the configured signing key.
    SignatureMismatch,
}

impl std::fmt::Display for VerificationFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationFault::HashMismatch => write!(f, "hash_mismatch"),
            VerificationFault::ChainBreak => write!(f, "chain_break"),
            VerificationFault::SignatureMismatch => write!(f, "signature_mismatch"),
        }
    }
}

/// Outcome of verifying one resource's chain.
///
/// A broken chain is an expected, reportable outcome — it is carried in the
/// result, never raised as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub valid: bool,
    /// `entry_hash` of the first offending entry, when invalid.
    pub broken_at: Option<HexDigest>,
    pub reason: Option<VerificationFault>,
}

impl VerificationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            broken_at: None,
            reason: None,
        }
    }

    pub fn broken(entry: &LedgerEntry, reason: VerificationFault) -> Self {
        Self {
            valid: false,
            broken_at: Some(entry.entry_hash.clone()),
            reason: Some(reason),
        }
    }
}

/// Walk a chain in order and confirm it is internally consistent.
///
/// `entries` must be the resource's full sequence in creation order, as
/// returned by the store. An empty chain is trivially valid. Signatures are
/// only checked when the signer carries a key.
pub fn verify_entries(
    entries: &[LedgerEntry],
    signer: &IntegritySigner,
) -> LedgerResult<VerificationResult> {
    let mut expected_prev = HexDigest::new();

    for entry in entries {
        let canonical = canonical_metadata_text(&entry.metadata)?;
        let recomputed = compute_entry_hash(
            &entry.prev_hash,
            &entry.resource_id,
            &canonical,
            &entry.created_at,
            entry.created_by.as_deref(),
        );
        if recomputed != entry.entry_hash {
            return Ok(VerificationResult::broken(
                entry,
                VerificationFault::HashMismatch,
            ));
        }

        if entry.prev_hash != expected_prev {
            return Ok(VerificationResult::broken(
                entry,
                VerificationFault::ChainBreak,
            ));
        }

        if signer.is_enabled()
            && !signer.verify(&entry.entry_hash, entry.signature.as_deref())
        {
            return Ok(VerificationResult::broken(
                entry,
                VerificationFault::SignatureMismatch,
            ));
        }

        expected_prev = entry.entry_hash.clone();
    }

    Ok(VerificationResult::valid())
}
