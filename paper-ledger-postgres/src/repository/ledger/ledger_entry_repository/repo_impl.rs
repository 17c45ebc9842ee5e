use paper_ledger_api::domain::LedgerEntry;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::error::Error;
use std::sync::Arc;

use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct LedgerEntryRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl LedgerEntryRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

impl TryFromRow<PgRow> for LedgerEntry {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(LedgerEntry {
            id: row.try_get("id")?,
            resource_id: row.try_get("resource_id")?,
            metadata: row.try_get("metadata")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            prev_hash: get_heapless_string(row, "prev_hash")?,
            entry_hash: get_heapless_string(row, "entry_hash")?,
            signature: get_optional_heapless_string(row, "signature")?,
            anchor_tx: row.try_get("anchor_tx")?,
        })
    }
}
