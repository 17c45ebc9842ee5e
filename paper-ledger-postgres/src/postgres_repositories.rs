use sqlx::PgPool;
use std::sync::Arc;

use crate::repository::ledger::ledger_entry_repository::LedgerEntryRepositoryImpl;

/// Factory for the PostgreSQL-backed repositories.
///
/// Holds the shared connection pool; repositories are cheap handles over it,
/// so every append runs as its own atomic statement and concurrent appends
/// to different resources never serialize on a shared transaction.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn ledger_repositories(&self) -> LedgerRepositories {
        LedgerRepositories {
            entry_repository: Arc::new(LedgerEntryRepositoryImpl::new(self.pool.clone())),
        }
    }
}

/// Container for the ledger module repositories.
pub struct LedgerRepositories {
    pub entry_repository: Arc<LedgerEntryRepositoryImpl>,
}
