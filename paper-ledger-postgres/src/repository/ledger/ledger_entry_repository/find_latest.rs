use async_trait::async_trait;
use paper_ledger_api::domain::LedgerEntry;
use paper_ledger_db::repository::find_latest::FindLatest;
use sqlx::Postgres;
use std::error::Error;

use crate::utils::TryFromRow;

use super::repo_impl::LedgerEntryRepositoryImpl;

impl LedgerEntryRepositoryImpl {
    pub(super) async fn find_latest_impl(
        repo: &LedgerEntryRepositoryImpl,
        resource_id: &str,
    ) -> Result<Option<LedgerEntry>, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query(
            r#"
            SELECT id, resource_id, metadata, created_by, created_at,
                   prev_hash, entry_hash, signature, anchor_tx
            FROM metadata_ledger
            WHERE resource_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(resource_id)
        .fetch_optional(&*repo.pool)
        .await?;

        row.as_ref().map(LedgerEntry::try_from_row).transpose()
    }
}

#[async_trait]
impl FindLatest<Postgres, LedgerEntry> for LedgerEntryRepositoryImpl {
    async fn find_latest(
        &self,
        resource_id: &str,
    ) -> Result<Option<LedgerEntry>, Box<dyn Error + Send + Sync>> {
        Self::find_latest_impl(self, resource_id).await
    }
}
