use async_trait::async_trait;
use sqlx::Database;

use crate::models::chain_linked::ChainLinked;

/// Generic repository trait for point lookups by entry hash
///
/// `entry_hash` is globally unique across all resources, so the lookup needs
/// no resource id. Returns an Option to handle unknown hashes.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement the ChainLinked trait
#[async_trait]
pub trait FindByEntryHash<DB: Database, T: ChainLinked>: Send + Sync {
    /// Find a single entry by its content hash
    ///
    /// # Returns
    /// * `Ok(Some(T))` - The found entry
    /// * `Ok(None)` - No entry carries this hash
    /// * `Err` - An error if the query could not be executed
    async fn find_by_entry_hash(
        &self,
        entry_hash: &str,
    ) -> Result<Option<T>, Box<dyn std::error::Error + Send + Sync>>;
}
