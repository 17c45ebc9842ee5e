//! The metadata ledger service: append, read and verify operations over a
//! ledger store and a content store, both passed in explicitly.

use std::marker::PhantomData;
use std::sync::Arc;

use paper_ledger_api::config::LedgerConfig;
use paper_ledger_api::domain::{
    build_entry, verify_entries, AttachmentUpload, IntegritySigner, LedgerEntry,
    StoredAttachment, VerificationResult,
};
use paper_ledger_api::error::{LedgerError, LedgerResult};
use paper_ledger_api::service::{AppendRequest, ContentStore};
use serde_json::{Map, Value};
use sqlx::Database;
use validator::Validate;

use crate::repository::pagination::{Page, PageRequest};
use crate::repository::LedgerEntryRepository;

/// How many read-latest → build → insert cycles one append may run before a
/// persistent conflict is surfaced to the caller.
pub const MAX_APPEND_ATTEMPTS: u32 = 3;

/// Orchestrates the ledger operations against injected stores.
///
/// Appends to the same resource race only on the store's
/// `(resource_id, prev_hash)` uniqueness: the loser re-reads the chain head
/// and rebuilds, so concurrent appends serialize instead of forking the
/// chain. Appends to different resources are fully independent.
pub struct MetadataLedgerService<DB, R, C>
where
    DB: Database,
    R: LedgerEntryRepository<DB>,
    C: ContentStore,
{
    entries: Arc<R>,
    content: Arc<C>,
    signer: IntegritySigner,
    config: LedgerConfig,
    _db: PhantomData<DB>,
}

impl<DB, R, C> MetadataLedgerService<DB, R, C>
where
    DB: Database,
    R: LedgerEntryRepository<DB>,
    C: ContentStore,
{
    pub fn new(entries: Arc<R>, content: Arc<C>, config: LedgerConfig) -> Self {
        let signer = IntegritySigner::from_key(config.signing_key.clone());
        Self {
            entries,
            content,
            signer,
            config,
            _db: PhantomData,
        }
    }

    pub fn signer(&self) -> &IntegritySigner {
        &self.signer
    }

    /// Record one metadata entry, with any attachments persisted first.
    ///
    /// Attachments are durably saved before the entry referencing them is
    /// inserted; if the insert ultimately fails they are removed again, so
    /// no stored object stays referenced by a never-created entry.
    pub async fn append_metadata(&self, request: AppendRequest) -> LedgerResult<LedgerEntry> {
        request
            .validate()
            .map_err(|e| LedgerError::InvalidInput(e.to_string()))?;

        let mut metadata = match request.metadata {
            None => Value::Object(Map::new()),
            Some(value) if value.is_object() => value,
            Some(_) => {
                return Err(LedgerError::InvalidMetadata(
                    "metadata must be a JSON object".to_string(),
                ))
            }
        };

        let stored = self.save_attachments(&request.attachments).await?;
        if let Err(err) = fold_attachments(&mut metadata, &stored) {
            self.cleanup_attachments(&stored).await;
            return Err(err);
        }

        let mut attempt = 0;
        loop {
            attempt += 1;

            let previous = match self.entries.find_latest(&request.resource_id).await {
                Ok(previous) => previous,
                Err(err) => {
                    let err = into_ledger_error(err);
                    self.cleanup_attachments(&stored).await;
                    return Err(err);
                }
            };

            let entry = match build_entry(
                &request.resource_id,
                metadata.clone(),
                request.created_by.clone(),
                request.anchor_tx.clone(),
                previous.as_ref(),
                &self.signer,
            ) {
                Ok(entry) => entry,
                Err(err) => {
                    self.cleanup_attachments(&stored).await;
                    return Err(err);
                }
            };

            match self.entries.append(entry).await {
                Ok(saved) => {
                    tracing::debug!(
                        resource_id = %saved.resource_id,
                        entry_hash = %saved.entry_hash.as_str(),
                        "appended ledger entry"
                    );
                    return Ok(saved);
                }
                Err(err) => match into_ledger_error(err) {
                    LedgerError::ConcurrencyConflict { resource_id }
                        if attempt < MAX_APPEND_ATTEMPTS =>
                    {
                        tracing::debug!(
                            resource_id = %resource_id,
                            attempt,
                            "concurrent append detected, retrying"
                        );
                    }
                    err => {
                        self.cleanup_attachments(&stored).await;
                        return Err(err);
                    }
                },
            }
        }
    }

    /// A resource's full chain in creation order; empty if unknown.
    pub async fn get_chain(&self, resource_id: &str) -> LedgerResult<Vec<LedgerEntry>> {
        self.entries
            .load_chain(resource_id)
            .await
            .map_err(into_ledger_error)
    }

    /// One page of a resource's chain, oldest first.
    pub async fn get_chain_page(
        &self,
        resource_id: &str,
        page: PageRequest,
    ) -> LedgerResult<Page<LedgerEntry>> {
        self.entries
            .load_chain_page(resource_id, page)
            .await
            .map_err(into_ledger_error)
    }

    /// Point lookup by entry hash; `None` is the not-found indication.
    pub async fn get_entry(&self, entry_hash: &str) -> LedgerResult<Option<LedgerEntry>> {
        self.entries
            .find_by_entry_hash(entry_hash)
            .await
            .map_err(into_ledger_error)
    }

    /// Read an attachment back from the content store.
    pub async fn get_attachment(&self, stored_name: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.content
            .load(stored_name)
            .await
            .map_err(|e| LedgerError::StorageUnavailable(e.to_string()))
    }

    /// Walk a resource's chain and report whether it is internally
    /// consistent. A broken chain comes back as a result, not an error.
    pub async fn verify_chain(&self, resource_id: &str) -> LedgerResult<VerificationResult> {
        let entries = self.get_chain(resource_id).await?;
        verify_entries(&entries, &self.signer)
    }

    async fn save_attachments(
        &self,
        attachments: &[AttachmentUpload],
    ) -> LedgerResult<Vec<StoredAttachment>> {
        let mut stored: Vec<StoredAttachment> = Vec::new();

        for upload in attachments {
            if !self.config.allows_extension(&upload.filename) {
                tracing::warn!(
                    field = %upload.field,
                    filename = %upload.filename,
                    "skipping attachment with disallowed extension"
                );
                continue;
            }

            if upload.content.len() > self.config.max_attachment_bytes {
                self.cleanup_attachments(&stored).await;
                return Err(LedgerError::InvalidInput(format!(
                    "attachment '{}' exceeds the {} byte limit",
                    upload.filename, self.config.max_attachment_bytes
                )));
            }

            match self.content.save(&upload.content, &upload.filename).await {
                Ok(object) => stored.push(StoredAttachment {
                    field: upload.field.clone(),
                    filename: upload.filename.clone(),
                    stored_as: object.stored_name,
                    sha256: object.content_hash,
                }),
                Err(err) => {
                    self.cleanup_attachments(&stored).await;
                    return Err(LedgerError::StorageUnavailable(err.to_string()));
                }
            }
        }

        Ok(stored)
    }

    async fn cleanup_attachments(&self, stored: &[StoredAttachment]) {
        for attachment in stored {
            if let Err(err) = self.content.remove(&attachment.stored_as).await {
                tracing::warn!(
                    stored_as = %attachment.stored_as,
                    error = %err,
                    "failed to remove orphaned attachment"
                );
            }
        }
    }
}

/// Fold persisted attachment records into `metadata.files`.
fn fold_attachments(metadata: &mut Value, stored: &[StoredAttachment]) -> LedgerResult<()> {
    if stored.is_empty() {
        return Ok(());
    }

    let object = metadata
        .as_object_mut()
        .ok_or_else(|| LedgerError::InvalidMetadata("metadata must be a JSON object".to_string()))?;
    let files = object
        .entry("files")
        .or_insert_with(|| Value::Array(Vec::new()));

    match files.as_array_mut() {
        Some(array) => {
            for attachment in stored {
                array.push(attachment.to_metadata_value()?);
            }
            Ok(())
        }
        None => Err(LedgerError::InvalidMetadata(
            "metadata.files must be an array".to_string(),
        )),
    }
}

fn into_ledger_error(err: Box<dyn std::error::Error + Send + Sync>) -> LedgerError {
    match err.downcast::<LedgerError>() {
        Ok(ledger_err) => *ledger_err,
        Err(other) => LedgerError::Database(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paper_ledger_api::domain::{HexDigest, VerificationFault};
    use paper_ledger_api::service::StoredObject;
    use async_trait::async_trait;
    use serde_json::json;
    use sqlx::Postgres;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use crate::repository::append_entry::AppendEntry;
    use crate::repository::find_by_entry_hash::FindByEntryHash;
    use crate::repository::find_latest::FindLatest;
    use crate::repository::load_chain::LoadChain;

    type BoxError = Box<dyn std::error::Error + Send + Sync>;

    /// In-memory stand-in for the Postgres store, enforcing the same two
    /// unique constraints the real table carries.
    #[derive(Default)]
    struct InMemoryLedgerStore {
        entries: Mutex<Vec<LedgerEntry>>,
        conflicts_to_inject: AtomicU32,
    }

    impl InMemoryLedgerStore {
        fn with_injected_conflicts(conflicts: u32) -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
                conflicts_to_inject: AtomicU32::new(conflicts),
            }
        }

        fn tamper_with(&self, index: usize, metadata: Value) {
            self.entries.lock().unwrap()[index].metadata = metadata;
        }
    }

    #[async_trait]
    impl AppendEntry<Postgres, LedgerEntry> for InMemoryLedgerStore {
        async fn append(&self, entry: LedgerEntry) -> Result<LedgerEntry, BoxError> {
            let pending = self.conflicts_to_inject.load(Ordering::SeqCst);
            if pending > 0 {
                self.conflicts_to_inject.store(pending - 1, Ordering::SeqCst);
                return Err(Box::new(LedgerError::ConcurrencyConflict {
                    resource_id: entry.resource_id.clone(),
                }));
            }

            let mut entries = self.entries.lock().unwrap();
            if entries.iter().any(|e| e.entry_hash == entry.entry_hash) {
                return Err(Box::new(LedgerError::DuplicateHash(
                    entry.entry_hash.as_str().to_string(),
                )));
            }
            if entries
                .iter()
                .any(|e| e.resource_id == entry.resource_id && e.prev_hash == entry.prev_hash)
            {
                return Err(Box::new(LedgerError::ConcurrencyConflict {
                    resource_id: entry.resource_id.clone(),
                }));
            }

            let saved = LedgerEntry {
                id: entries.len() as i64 + 1,
                ..entry
            };
            entries.push(saved.clone());
            Ok(saved)
        }
    }

    #[async_trait]
    impl FindLatest<Postgres, LedgerEntry> for InMemoryLedgerStore {
        async fn find_latest(&self, resource_id: &str) -> Result<Option<LedgerEntry>, BoxError> {
            let entries = self.entries.lock().unwrap();
            Ok(entries
                .iter()
                .filter(|e| e.resource_id == resource_id)
                .max_by_key(|e| (e.created_at, e.id))
                .cloned())
        }
    }

    #[async_trait]
    impl LoadChain<Postgres, LedgerEntry> for InMemoryLedgerStore {
        async fn load_chain(&self, resource_id: &str) -> Result<Vec<LedgerEntry>, BoxError> {
            let entries = self.entries.lock().unwrap();
            let mut chain: Vec<LedgerEntry> = entries
                .iter()
                .filter(|e| e.resource_id == resource_id)
                .cloned()
                .collect();
            chain.sort_by_key(|e| (e.created_at, e.id));
            Ok(chain)
        }

        async fn load_chain_page(
            &self,
            resource_id: &str,
            page: PageRequest,
        ) -> Result<Page<LedgerEntry>, BoxError> {
            let chain = self.load_chain(resource_id).await?;
            let total = chain.len();
            let items: Vec<LedgerEntry> = chain
                .into_iter()
                .skip(page.offset)
                .take(page.limit)
                .collect();
            Ok(Page::new(items, total, page.limit, page.offset))
        }
    }

    #[async_trait]
    impl FindByEntryHash<Postgres, LedgerEntry> for InMemoryLedgerStore {
        async fn find_by_entry_hash(
            &self,
            entry_hash: &str,
        ) -> Result<Option<LedgerEntry>, BoxError> {
            let entries = self.entries.lock().unwrap();
            Ok(entries
                .iter()
                .find(|e| e.entry_hash.as_str() == entry_hash)
                .cloned())
        }
    }

    #[derive(Default)]
    struct InMemoryContentStore {
        objects: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl InMemoryContentStore {
        fn object_count(&self) -> usize {
            self.objects.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentStore for InMemoryContentStore {
        async fn save(
            &self,
            content: &[u8],
            suggested_name: &str,
        ) -> Result<StoredObject, BoxError> {
            let mut objects = self.objects.lock().unwrap();
            let stored_name = format!("{}-{}", objects.len() + 1, suggested_name);
            let content_hash =
                HexDigest::try_from(format!("{:064x}", objects.len() + 1).as_str()).unwrap();
            objects.insert(stored_name.clone(), content.to_vec());
            Ok(StoredObject {
                stored_name,
                content_hash,
                size: content.len() as u64,
            })
        }

        async fn load(&self, stored_name: &str) -> Result<Option<Vec<u8>>, BoxError> {
            Ok(self.objects.lock().unwrap().get(stored_name).cloned())
        }

        async fn remove(&self, stored_name: &str) -> Result<(), BoxError> {
            self.objects.lock().unwrap().remove(stored_name);
            Ok(())
        }
    }

    /// Content store whose saves always fail, for outage behavior.
    struct UnavailableContentStore;

    #[async_trait]
    impl ContentStore for UnavailableContentStore {
        async fn save(&self, _: &[u8], _: &str) -> Result<StoredObject, BoxError> {
            Err("disk full".into())
        }

        async fn load(&self, _: &str) -> Result<Option<Vec<u8>>, BoxError> {
            Err("disk full".into())
        }

        async fn remove(&self, _: &str) -> Result<(), BoxError> {
            Err("disk full".into())
        }
    }

    type TestService = MetadataLedgerService<Postgres, InMemoryLedgerStore, InMemoryContentStore>;

    fn service(store: InMemoryLedgerStore) -> (TestService, Arc<InMemoryLedgerStore>, Arc<InMemoryContentStore>) {
        service_with_config(store, LedgerConfig::new("unused"))
    }

    fn service_with_config(
        store: InMemoryLedgerStore,
        config: LedgerConfig,
    ) -> (TestService, Arc<InMemoryLedgerStore>, Arc<InMemoryContentStore>) {
        let store = Arc::new(store);
        let content = Arc::new(InMemoryContentStore::default());
        let svc = MetadataLedgerService::new(store.clone(), content.clone(), config);
        (svc, store, content)
    }

    #[tokio::test]
    async fn test_append_builds_a_chain() -> Result<(), BoxError> {
        let (svc, _, _) = service(InMemoryLedgerStore::default());

        let first = svc
            .append_metadata(AppendRequest::new("doc-1").with_metadata(json!({"title": "x"})))
            .await?;
        assert!(first.prev_hash.is_empty());
        assert_eq!(first.entry_hash.len(), 64);
        assert!(first.entry_hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(first.signature.is_none());
        assert_eq!(first.id, 1);

        let second = svc
            .append_metadata(AppendRequest::new("doc-1").with_metadata(json!({"title": "y"})))
            .await?;
        assert_eq!(second.prev_hash, first.entry_hash);
        assert_eq!(second.id, 2);

        let chain = svc.get_chain("doc-1").await?;
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].entry_hash, first.entry_hash);
        assert_eq!(chain[1].entry_hash, second.entry_hash);

        let result = svc.verify_chain("doc-1").await?;
        assert!(result.valid);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_resource_has_empty_chain() -> Result<(), BoxError> {
        let (svc, _, _) = service(InMemoryLedgerStore::default());
        assert!(svc.get_chain("unknown-resource").await?.is_empty());
        assert!(svc.verify_chain("unknown-resource").await?.valid);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_entry_by_hash() -> Result<(), BoxError> {
        let (svc, _, _) = service(InMemoryLedgerStore::default());
        let mut request = AppendRequest::new("doc-1");
        request.anchor_tx = Some("ots:9f2c".to_string());
        let entry = svc.append_metadata(request).await?;

        let found = svc.get_entry(entry.entry_hash.as_str()).await?.unwrap();
        assert_eq!(found.id, entry.id);
        // Anchors are stored verbatim, never computed here.
        assert_eq!(found.anchor_tx.as_deref(), Some("ots:9f2c"));

        let missing = svc.get_entry(&"0".repeat(64)).await?;
        assert!(missing.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_chain_pagination() -> Result<(), BoxError> {
        let (svc, _, _) = service(InMemoryLedgerStore::default());
        for i in 0..5 {
            svc.append_metadata(
                AppendRequest::new("doc-1").with_metadata(json!({"revision": i})),
            )
            .await?;
        }

        let page = svc.get_chain_page("doc-1", PageRequest::new(2, 0)).await?;
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more());

        let last = svc.get_chain_page("doc-1", PageRequest::new(2, 4)).await?;
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_more());
        Ok(())
    }

    #[tokio::test]
    async fn test_append_requires_resource_id() {
        let (svc, _, _) = service(InMemoryLedgerStore::default());
        let err = svc.append_metadata(AppendRequest::new("")).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_append_rejects_non_object_metadata() {
        let (svc, _, _) = service(InMemoryLedgerStore::default());
        let err = svc
            .append_metadata(AppendRequest::new("doc-1").with_metadata(json!([1, 2])))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidMetadata(_)));
    }

    #[tokio::test]
    async fn test_append_retries_after_conflict() -> Result<(), BoxError> {
        let (svc, store, _) = service(InMemoryLedgerStore::with_injected_conflicts(1));

        let entry = svc.append_metadata(AppendRequest::new("doc-1")).await?;
        assert_eq!(entry.id, 1);
        assert_eq!(store.entries.lock().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_surfaces_persistent_conflict() {
        let (svc, _, _) = service(InMemoryLedgerStore::with_injected_conflicts(
            MAX_APPEND_ATTEMPTS,
        ));

        let err = svc.append_metadata(AppendRequest::new("doc-1")).await.unwrap_err();
        assert!(matches!(err, LedgerError::ConcurrencyConflict { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_appends_serialize() -> Result<(), BoxError> {
        let (svc, _, _) = service(InMemoryLedgerStore::default());

        let (first, second) = tokio::join!(
            svc.append_metadata(AppendRequest::new("doc-1").with_metadata(json!({"n": 1}))),
            svc.append_metadata(AppendRequest::new("doc-1").with_metadata(json!({"n": 2}))),
        );
        let (first, second) = (first?, second?);

        // Exactly one of them won the race for the genesis slot; the other
        // observed the winner's hash.
        let chain = svc.get_chain("doc-1").await?;
        assert_eq!(chain.len(), 2);
        assert!(chain[0].prev_hash.is_empty());
        assert_eq!(chain[1].prev_hash, chain[0].entry_hash);
        assert_ne!(first.entry_hash, second.entry_hash);
        assert!(svc.verify_chain("doc-1").await?.valid);
        Ok(())
    }

    #[tokio::test]
    async fn test_independent_resources() -> Result<(), BoxError> {
        let (svc, _, _) = service(InMemoryLedgerStore::default());

        svc.append_metadata(AppendRequest::new("doc-a")).await?;
        let b1 = svc.append_metadata(AppendRequest::new("doc-b")).await?;
        svc.append_metadata(AppendRequest::new("doc-a")).await?;
        let b2 = svc.append_metadata(AppendRequest::new("doc-b")).await?;

        assert!(b1.prev_hash.is_empty());
        assert_eq!(b2.prev_hash, b1.entry_hash);
        assert_eq!(svc.get_chain("doc-a").await?.len(), 2);
        assert_eq!(svc.get_chain("doc-b").await?.len(), 2);
        assert!(svc.verify_chain("doc-a").await?.valid);
        assert!(svc.verify_chain("doc-b").await?.valid);
        Ok(())
    }

    #[tokio::test]
    async fn test_attachments_are_folded_into_metadata() -> Result<(), BoxError> {
        let (svc, _, content) = service(InMemoryLedgerStore::default());

        let request = AppendRequest::new("doc-1")
            .with_metadata(json!({"title": "x"}))
            .with_attachment(AttachmentUpload::new("file", "paper.pdf", vec![1, 2, 3]))
            .with_attachment(AttachmentUpload::new("extra", "script.sh", vec![4]));
        let entry = svc.append_metadata(request).await?;

        // The disallowed extension was skipped, not stored, not recorded.
        assert_eq!(content.object_count(), 1);
        let files = entry.metadata["files"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["field"], "file");
        assert_eq!(files[0]["filename"], "paper.pdf");
        assert_eq!(files[0]["sha256"].as_str().unwrap().len(), 64);

        let stored_as = files[0]["stored_as"].as_str().unwrap();
        assert_eq!(svc.get_attachment(stored_as).await?, Some(vec![1, 2, 3]));

        assert!(svc.verify_chain("doc-1").await?.valid);
        Ok(())
    }

    #[tokio::test]
    async fn test_oversized_attachment_is_rejected() {
        let mut config = LedgerConfig::new("unused");
        config.max_attachment_bytes = 4;
        let (svc, store, content) =
            service_with_config(InMemoryLedgerStore::default(), config);

        let request = AppendRequest::new("doc-1")
            .with_attachment(AttachmentUpload::new("a", "small.pdf", vec![1]))
            .with_attachment(AttachmentUpload::new("b", "big.pdf", vec![0; 5]));
        let err = svc.append_metadata(request).await.unwrap_err();

        assert!(matches!(err, LedgerError::InvalidInput(_)));
        // The already-saved attachment was cleaned up and no entry landed.
        assert_eq!(content.object_count(), 0);
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_content_store_fails_append() {
        let store = Arc::new(InMemoryLedgerStore::default());
        let svc: MetadataLedgerService<Postgres, _, _> = MetadataLedgerService::new(
            store.clone(),
            Arc::new(UnavailableContentStore),
            LedgerConfig::new("unused"),
        );

        let request = AppendRequest::new("doc-1")
            .with_attachment(AttachmentUpload::new("file", "paper.pdf", vec![1]));
        let err = svc.append_metadata(request).await.unwrap_err();

        assert!(matches!(err, LedgerError::StorageUnavailable(_)));
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_append_cleans_up_attachments() {
        let (svc, _, content) = service(InMemoryLedgerStore::with_injected_conflicts(
            MAX_APPEND_ATTEMPTS,
        ));

        let request = AppendRequest::new("doc-1")
            .with_attachment(AttachmentUpload::new("file", "paper.pdf", vec![1, 2]));
        let err = svc.append_metadata(request).await.unwrap_err();

        assert!(matches!(err, LedgerError::ConcurrencyConflict { .. }));
        assert_eq!(content.object_count(), 0);
    }

    #[tokio::test]
    async fn test_metadata_files_must_be_an_array() {
        let (svc, _, content) = service(InMemoryLedgerStore::default());

        let request = AppendRequest::new("doc-1")
            .with_metadata(json!({"files": "not-a-list"}))
            .with_attachment(AttachmentUpload::new("file", "paper.pdf", vec![1]));
        let err = svc.append_metadata(request).await.unwrap_err();

        assert!(matches!(err, LedgerError::InvalidMetadata(_)));
        assert_eq!(content.object_count(), 0);
    }

    #[tokio::test]
    async fn test_verify_chain_detects_tampering() -> Result<(), BoxError> {
        let (svc, store, _) = service(InMemoryLedgerStore::default());

        let first = svc
            .append_metadata(AppendRequest::new("doc-1").with_metadata(json!({"grade": "A"})))
            .await?;
        svc.append_metadata(AppendRequest::new("doc-1")).await?;

        store.tamper_with(0, json!({"grade": "F"}));

        let result = svc.verify_chain("doc-1").await?;
        assert!(!result.valid);
        assert_eq!(result.reason, Some(VerificationFault::HashMismatch));
        assert_eq!(result.broken_at.as_ref(), Some(&first.entry_hash));
        Ok(())
    }

    #[tokio::test]
    async fn test_signed_appends_verify_only_with_the_right_key() -> Result<(), BoxError> {
        let store = Arc::new(InMemoryLedgerStore::default());
        let content = Arc::new(InMemoryContentStore::default());
        let signed: MetadataLedgerService<Postgres, _, _> = MetadataLedgerService::new(
            store.clone(),
            content.clone(),
            LedgerConfig::new("unused").with_signing_key("server-secret"),
        );

        let entry = signed.append_metadata(AppendRequest::new("doc-1")).await?;
        assert!(entry.signature.is_some());
        assert!(signed.verify_chain("doc-1").await?.valid);

        let wrong_key: MetadataLedgerService<Postgres, _, _> = MetadataLedgerService::new(
            store,
            content,
            LedgerConfig::new("unused").with_signing_key("rotated-away"),
        );
        let result = wrong_key.verify_chain("doc-1").await?;
        assert!(!result.valid);
        assert_eq!(result.reason, Some(VerificationFault::SignatureMismatch));
        Ok(())
    }

    #[test]
    fn test_into_ledger_error_downcasts() {
        let boxed: Box<dyn std::error::Error + Send + Sync> =
            Box::new(LedgerError::DuplicateHash("abc".to_string()));
        assert!(matches!(
            into_ledger_error(boxed),
            LedgerError::DuplicateHash(_)
        ));

        let opaque: Box<dyn std::error::Error + Send + Sync> = "connection reset".into();
        assert!(matches!(into_ledger_error(opaque), LedgerError::Database(_)));
    }
}
