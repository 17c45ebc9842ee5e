//! One file per stored object, under a single flat directory.
//!
//! Writes are atomic: data goes to a temporary file first, then is renamed
//! into place, so a crashed save never leaves a partial object behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use heapless::String as HeaplessString;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use paper_ledger_api::domain::HexDigest;
use paper_ledger_api::service::{ContentStore, StoredObject};

use crate::error::ContentStoreError;

/// Filesystem content store rooted at one directory.
///
/// Stored names are `{uuid}-{sanitized original name}`: unique by
/// construction, safe by sanitization. The content hash returned from `save`
/// is SHA-256 over the exact bytes written to disk.
pub struct FileContentStore {
    base_dir: PathBuf,
}

impl FileContentStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, ContentStoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn object_path(&self, stored_name: &str) -> Result<PathBuf, ContentStoreError> {
        check_stored_name(stored_name)?;
        Ok(self.base_dir.join(stored_name))
    }
}

/// Reduce an untrusted filename to a safe single-component name.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`, and names that sanitize to
/// nothing but dots and underscores are rejected rather than guessed at.
fn sanitize_filename(filename: &str) -> Result<String, ContentStoreError> {
    let last_component = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let sanitized: String = last_component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().all(|c| c == '.' || c == '_') {
        return Err(ContentStoreError::InvalidName(filename.to_string()));
    }
    Ok(sanitized)
}

/// Stored names are produced by `save`; any separator or traversal sequence
/// in one presented back to us is an attack, not a typo.
fn check_stored_name(stored_name: &str) -> Result<(), ContentStoreError> {
    if stored_name.is_empty()
        || stored_name.contains('/')
        || stored_name.contains('\\')
        || stored_name.contains("..")
    {
        return Err(ContentStoreError::InvalidName(stored_name.to_string()));
    }
    Ok(())
}

fn sha256_hex(content: &[u8]) -> HexDigest {
    let digest = Sha256::digest(content);
    let hex = hex::encode(digest);
    HeaplessString::try_from(hex.as_str()).expect("a SHA-256 digest is always 64 hex chars")
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn save(
        &self,
        content: &[u8],
        suggested_name: &str,
    ) -> Result<StoredObject, Box<dyn std::error::Error + Send + Sync>> {
        let safe_name = sanitize_filename(suggested_name)?;
        let stored_name = format!("{}-{}", Uuid::new_v4().simple(), safe_name);
        let path = self.base_dir.join(&stored_name);

        // Atomic write: temp file in the same directory, then rename.
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, content).await.map_err(ContentStoreError::Io)?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(ContentStoreError::Io)?;

        let content_hash = sha256_hex(content);
        debug!(
            stored_name = %stored_name,
            size = content.len(),
            "stored attachment"
        );

        Ok(StoredObject {
            stored_name,
            content_hash,
            size: content.len() as u64,
        })
    }

    async fn load(
        &self,
        stored_name: &str,
    ) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>> {
        let path = self.object_path(stored_name)?;
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Box::new(ContentStoreError::Io(e))),
        }
    }

    async fn remove(
        &self,
        stored_name: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = self.object_path(stored_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(stored_name = %stored_name, "removed attachment");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(stored_name = %stored_name, "attachment already gone");
                Ok(())
            }
            Err(e) => Err(Box::new(ContentStoreError::Io(e))),
        }
    }
}
