use async_trait::async_trait;
use paper_ledger_api::domain::LedgerEntry;
use paper_ledger_db::repository::load_chain::LoadChain;
use paper_ledger_db::repository::pagination::{Page, PageRequest};
use sqlx::Postgres;
use std::error::Error;

use crate::utils::TryFromRow;

use super::repo_impl::LedgerEntryRepositoryImpl;

impl LedgerEntryRepositoryImpl {
    pub(super) async fn load_chain_impl(
        repo: &LedgerEntryRepositoryImpl,
        resource_id: &str,
    ) -> Result<Vec<LedgerEntry>, Box<dyn Error + Send + Sync>> {
        let rows = sqlx::query(
            r#"
            SELECT id, resource_id, metadata, created_by, created_at,
                   prev_hash, entry_hash, signature, anchor_tx
            FROM metadata_ledger
            WHERE resource_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(resource_id)
        .fetch_all(&*repo.pool)
        .await?;

        rows.iter().map(LedgerEntry::try_from_row).collect()
    }

    pub(super) async fn load_chain_page_impl(
        repo: &LedgerEntryRepositoryImpl,
        resource_id: &str,
        page: PageRequest,
    ) -> Result<Page<LedgerEntry>, Box<dyn Error + Send + Sync>> {
        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM metadata_ledger WHERE resource_id = $1"#,
        )
        .bind(resource_id)
        .fetch_one(&*repo.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT id, resource_id, metadata, created_by, created_at,
                   prev_hash, entry_hash, signature, anchor_tx
            FROM metadata_ledger
            WHERE resource_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(resource_id)
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(&*repo.pool)
        .await?;

        let items = rows
            .iter()
            .map(LedgerEntry::try_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}

#[async_trait]
impl LoadChain<Postgres, LedgerEntry> for LedgerEntryRepositoryImpl {
    async fn load_chain(
        &self,
        resource_id: &str,
    ) -> Result<Vec<LedgerEntry>, Box<dyn Error + Send + Sync>> {
        Self::load_chain_impl(self, resource_id).await
    }

    async fn load_chain_page(
        &self,
        resource_id: &str,
        page: PageRequest,
    ) -> Result<Page<LedgerEntry>, Box<dyn Error + Send + Sync>> {
        Self::load_chain_page_impl(self, resource_id, page).await
    }
}
