pub mod ledger_entry_repository;

pub use ledger_entry_repository::LedgerEntryRepositoryImpl;
