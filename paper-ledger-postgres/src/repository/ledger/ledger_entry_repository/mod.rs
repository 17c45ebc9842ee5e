pub mod append;
pub mod find_by_entry_hash;
pub mod find_latest;
pub mod load_chain;
pub mod repo_impl;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::LedgerEntryRepositoryImpl;
