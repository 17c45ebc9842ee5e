//! Filesystem-backed content store for ledger attachments.

pub mod error;
pub mod file_store;

pub use error::ContentStoreError;
pub use file_store::FileContentStore;
