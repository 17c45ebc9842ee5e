//! Keyed integrity signatures over entry hashes.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::domain::chain::to_hex_digest;
use crate::domain::ledger_entry::HexDigest;

/// PBKDF2 iteration count for signatures. Fixed and documented: the cost is
/// a deliberate floor against brute-force recovery of the signing key from
/// leaked signatures, so it must not silently change between deployments —
/// doing so would also invalidate every previously recorded signature.
pub const SIGNING_ITERATIONS: u32 = 100_000;

/// Derives keyed authentication codes over entry hashes using a server-held
/// secret. Without a configured key the signer is a no-op: entries are
/// recorded unsigned and verification always passes.
#[derive(Debug, Clone, Default)]
pub struct IntegritySigner {
    signing_key: Option<String>,
}

impl IntegritySigner {
    pub fn new(signing_key: impl Into<String>) -> Self {
        Self {
            signing_key: Some(signing_key.into()),
        }
    }

    /// The default/dev configuration: no key, no signatures.
    pub fn disabled() -> Self {
        Self { signing_key: None }
    }

    pub fn from_key(signing_key: Option<String>) -> Self {
        Self { signing_key }
    }

    pub fn is_enabled(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Sign an entry hash. Returns `None` when no key is configured.
    pub fn sign(&self, entry_hash: &str) -> Option<HexDigest> {
        let key = self.signing_key.as_ref()?;
        let mut derived = [0u8; 32];
        pbkdf2_hmac::<Sha256>(
            entry_hash.as_bytes(),
            key.as_bytes(),
            SIGNING_ITERATIONS,
            &mut derived,
        );
        Some(to_hex_digest(derived))
    }

    /// Check a stored signature against the configured key.
    ///
    /// Without a key this is a no-op that accepts anything; with a key, a
    /// missing or non-matching signature fails.
    pub fn verify(&self, entry_hash: &str, signature: Option<&str>) -> bool {
        match self.sign(entry_hash) {
            None => true,
            Some(expected) => signature == Some(expected.as_str()),
        }
    }
}
