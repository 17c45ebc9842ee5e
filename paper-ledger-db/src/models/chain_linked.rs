use paper_ledger_api::domain::LedgerEntry;

/// Trait for entities that participate in a per-resource hash chain.
///
/// The repository layer only needs the identity and linkage fields: the
/// entry hash that names a record, the previous hash it links to, and the
/// resource whose chain it belongs to.
pub trait ChainLinked {
    /// The record's own content hash — its identity in the store.
    fn entry_hash(&self) -> &str;

    /// The predecessor's hash, empty for the first record of a resource.
    fn prev_hash(&self) -> &str;

    /// The resource whose chain this record extends.
    fn resource_id(&self) -> &str;
}

impl ChainLinked for LedgerEntry {
    fn entry_hash(&self) -> &str {
        self.entry_hash.as_str()
    }

    fn prev_hash(&self) -> &str {
        self.prev_hash.as_str()
    }

    fn resource_id(&self) -> &str {
        &self.resource_id
    }
}
