use async_trait::async_trait;
use sqlx::Database;

use crate::models::chain_linked::ChainLinked;

/// Generic repository trait for appending one entry to a resource's chain
///
/// This trait provides the single write path of the ledger: there is no
/// update and no delete. The insert must be atomic (a cancelled or failed
/// append leaves no partial entry) and must assign the sequence id.
///
/// Fork prevention is the implementation's responsibility: two appends built
/// against the same predecessor must not both land. Implementations reject
/// the loser with `LedgerError::ConcurrencyConflict` (typically via a unique
/// constraint on `(resource_id, prev_hash)`), and reject an `entry_hash`
/// collision with `LedgerError::DuplicateHash`.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement the ChainLinked trait
///
/// # Example
/// ```ignore
/// impl<DB: Database> AppendEntry<DB, LedgerEntry> for LedgerEntryRepositoryImpl {
///     async fn append(&self, entry: LedgerEntry) -> Result<LedgerEntry, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait AppendEntry<DB: Database, T: ChainLinked>: Send + Sync {
    /// Persist a fully built entry and make it visible to subsequent reads
    ///
    /// # Arguments
    /// * `entry` - The entry to append, with the sequence id still unassigned
    ///
    /// # Returns
    /// * `Ok(T)` - The stored entry with its assigned sequence id
    /// * `Err` - `ConcurrencyConflict`, `DuplicateHash`, or a database error
    async fn append(&self, entry: T) -> Result<T, Box<dyn std::error::Error + Send + Sync>>;
}
