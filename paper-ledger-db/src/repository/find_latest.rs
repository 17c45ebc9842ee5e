use async_trait::async_trait;
use sqlx::Database;

use crate::models::chain_linked::ChainLinked;

/// Generic repository trait for reading the newest entry of a resource
///
/// The newest entry is the chain head: its `entry_hash` becomes the
/// `prev_hash` of the next append. Ordering is by creation time, with the
/// sequence id as tie-breaker.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement the ChainLinked trait
#[async_trait]
pub trait FindLatest<DB: Database, T: ChainLinked>: Send + Sync {
    /// Find the most recent entry for a resource
    ///
    /// # Returns
    /// * `Ok(Some(T))` - The chain head
    /// * `Ok(None)` - The resource has no entries yet
    /// * `Err` - An error if the query could not be executed
    async fn find_latest(
        &self,
        resource_id: &str,
    ) -> Result<Option<T>, Box<dyn std::error::Error + Send + Sync>>;
}
