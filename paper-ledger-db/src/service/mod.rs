pub mod metadata_ledger;

// Re-exports
pub use metadata_ledger::*;
