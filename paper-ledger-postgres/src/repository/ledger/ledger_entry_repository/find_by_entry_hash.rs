use async_trait::async_trait;
use paper_ledger_api::domain::LedgerEntry;
use paper_ledger_db::repository::find_by_entry_hash::FindByEntryHash;
use sqlx::Postgres;
use std::error::Error;

use crate::utils::TryFromRow;

use super::repo_impl::LedgerEntryRepositoryImpl;

impl LedgerEntryRepositoryImpl {
    pub(super) async fn find_by_entry_hash_impl(
        repo: &LedgerEntryRepositoryImpl,
        entry_hash: &str,
    ) -> Result<Option<LedgerEntry>, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query(
            r#"
            SELECT id, resource_id, metadata, created_by, created_at,
                   prev_hash, entry_hash, signature, anchor_tx
            FROM metadata_ledger
            WHERE entry_hash = $1
            "#,
        )
        .bind(entry_hash)
        .fetch_optional(&*repo.pool)
        .await?;

        row.as_ref().map(LedgerEntry::try_from_row).transpose()
    }
}

#[async_trait]
impl FindByEntryHash<Postgres, LedgerEntry> for LedgerEntryRepositoryImpl {
    async fn find_by_entry_hash(
        &self,
        entry_hash: &str,
    ) -> Result<Option<LedgerEntry>, Box<dyn Error + Send + Sync>> {
        Self::find_by_entry_hash_impl(self, entry_hash).await
    }
}
