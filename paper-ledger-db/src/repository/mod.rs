pub mod append_entry;
pub mod find_by_entry_hash;
pub mod find_latest;
pub mod load_chain;
pub mod pagination;

// Re-exports
pub use append_entry::*;
pub use find_by_entry_hash::*;
pub use find_latest::*;
pub use load_chain::*;
pub use pagination::*;

use paper_ledger_api::domain::LedgerEntry;
use sqlx::Database;

/// Everything a store must provide to back the metadata ledger service.
///
/// Blanket-implemented for any repository that provides the four ledger
/// operations over `LedgerEntry`.
pub trait LedgerEntryRepository<DB: Database>:
    AppendEntry<DB, LedgerEntry>
    + FindLatest<DB, LedgerEntry>
    + LoadChain<DB, LedgerEntry>
    + FindByEntryHash<DB, LedgerEntry>
{
}

impl<DB: Database, T> LedgerEntryRepository<DB> for T where
    T: AppendEntry<DB, LedgerEntry>
        + FindLatest<DB, LedgerEntry>
        + LoadChain<DB, LedgerEntry>
        + FindByEntryHash<DB, LedgerEntry>
{
}
