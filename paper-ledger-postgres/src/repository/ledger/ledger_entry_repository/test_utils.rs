#[cfg(test)]
pub mod test_utils {
    use paper_ledger_api::domain::{build_entry, IntegritySigner, LedgerEntry};
    use serde_json::json;
    use uuid::Uuid;

    /// Ledger rows are never deleted, so each test works on its own
    /// resource instead of relying on table cleanup.
    pub fn unique_resource_id() -> String {
        format!("test-resource-{}", Uuid::new_v4())
    }

    pub fn new_test_entry(resource_id: &str, previous: Option<&LedgerEntry>) -> LedgerEntry {
        new_test_entry_with_metadata(
            resource_id,
            previous,
            json!({"subject": "Physics", "semester": 4}),
        )
    }

    pub fn new_test_entry_with_metadata(
        resource_id: &str,
        previous: Option<&LedgerEntry>,
        metadata: serde_json::Value,
    ) -> LedgerEntry {
        build_entry(
            resource_id,
            metadata,
            Some("test-registrar".to_string()),
            None,
            previous,
            &IntegritySigner::disabled(),
        )
        .expect("a valid test entry")
    }
}
