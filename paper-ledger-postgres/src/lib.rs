pub mod postgres_repositories;
pub mod repository;
pub mod utils;

pub use postgres_repositories::PostgresRepositories;
pub use repository::ledger::ledger_entry_repository::LedgerEntryRepositoryImpl;

#[cfg(test)]
pub mod test_helper;
