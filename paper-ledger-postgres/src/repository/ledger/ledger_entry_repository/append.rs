use async_trait::async_trait;
use paper_ledger_api::domain::{canonical_metadata_text, LedgerEntry};
use paper_ledger_api::error::LedgerError;
use paper_ledger_db::repository::append_entry::AppendEntry;
use sqlx::{Postgres, Row};
use std::error::Error;

use super::repo_impl::LedgerEntryRepositoryImpl;

impl LedgerEntryRepositoryImpl {
    pub(super) async fn append_impl(
        repo: &LedgerEntryRepositoryImpl,
        entry: LedgerEntry,
    ) -> Result<LedgerEntry, Box<dyn Error + Send + Sync>> {
        // The canonical text is what was hashed; storing it verbatim keeps
        // re-hashing from the stored document exact.
        let metadata_text = canonical_metadata_text(&entry.metadata)?;

        let row = sqlx::query(
            r#"
            INSERT INTO metadata_ledger
                (resource_id, metadata, created_by, created_at, prev_hash, entry_hash, signature, anchor_tx)
            VALUES ($1, $2::json, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&entry.resource_id)
        .bind(&metadata_text)
        .bind(&entry.created_by)
        .bind(entry.created_at)
        .bind(entry.prev_hash.as_str())
        .bind(entry.entry_hash.as_str())
        .bind(entry.signature.as_ref().map(|s| s.as_str()))
        .bind(&entry.anchor_tx)
        .fetch_one(&*repo.pool)
        .await
        .map_err(|err| map_append_error(err, &entry))?;

        let id: i64 = row.try_get("id")?;
        tracing::debug!(
            id,
            resource_id = %entry.resource_id,
            entry_hash = %entry.entry_hash.as_str(),
            "inserted ledger entry"
        );
        Ok(LedgerEntry { id, ..entry })
    }
}

/// Translate the table's unique-constraint violations into the ledger error
/// taxonomy: the chain-fork constraint means "retry against the new head",
/// the entry-hash constraint means something is badly wrong.
fn map_append_error(err: sqlx::Error, entry: &LedgerEntry) -> Box<dyn Error + Send + Sync> {
    if let sqlx::Error::Database(ref db_err) = err {
        match db_err.constraint() {
            Some("metadata_ledger_resource_prev_key") => {
                return Box::new(LedgerError::ConcurrencyConflict {
                    resource_id: entry.resource_id.clone(),
                });
            }
            Some("metadata_ledger_entry_hash_key") => {
                return Box::new(LedgerError::DuplicateHash(
                    entry.entry_hash.as_str().to_string(),
                ));
            }
            _ => {}
        }
    }
    Box::new(err)
}

#[async_trait]
impl AppendEntry<Postgres, LedgerEntry> for LedgerEntryRepositoryImpl {
    async fn append(
        &self,
        entry: LedgerEntry,
    ) -> Result<LedgerEntry, Box<dyn Error + Send + Sync>> {
        Self::append_impl(self, entry).await
    }
}
