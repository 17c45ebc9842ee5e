use async_trait::async_trait;
use sqlx::Database;

use crate::models::chain_linked::ChainLinked;
use crate::repository::pagination::{Page, PageRequest};

/// Generic repository trait for loading a resource's full chain in order
///
/// Entries come back in creation order (ties broken by sequence id
/// ascending), which is exactly the order the chain verifier walks them in.
/// An unknown resource yields an empty sequence, not an error.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement the ChainLinked trait
#[async_trait]
pub trait LoadChain<DB: Database, T: ChainLinked>: Send + Sync {
    /// Load every entry of a resource's chain, oldest first
    async fn load_chain(
        &self,
        resource_id: &str,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;

    /// Load one page of a resource's chain, oldest first
    ///
    /// # Arguments
    /// * `resource_id` - The resource whose history is being paged through
    /// * `page` - The pagination parameters (limit and offset)
    async fn load_chain_page(
        &self,
        resource_id: &str,
        page: PageRequest,
    ) -> Result<Page<T>, Box<dyn std::error::Error + Send + Sync>>;
}
