//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use medseal::{PassthroughRenderer, Sealer, SealerConfig};
use medseal_store::MemoryStore;
use medseal_vault::MasterKey;

/// Master key used by default in fixtures.
pub const TEST_MASTER_KEY: &str = "medseal-test-master-key";

/// A test fixture with a shared in-memory store.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
}

impl TestFixture {
    /// Create a new fixture with an empty store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Build a sealer over this fixture's store with the default test
    /// master key and a passthrough renderer.
    pub fn sealer(&self) -> Sealer<MemoryStore> {
        self.sealer_with_master_key(TEST_MASTER_KEY)
    }

    /// Build a sealer with a specific master key (for wrong-key tests).
    pub fn sealer_with_master_key(&self, master_key: &str) -> Sealer<MemoryStore> {
        Sealer::new(
            MasterKey::new(master_key),
            Arc::clone(&self.store),
            Arc::new(PassthroughRenderer),
            SealerConfig::default(),
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A representative medicine-batch payload.
pub fn sample_medicine() -> serde_json::Value {
    serde_json::json!({
        "medicine_id": "MED1",
        "name": "Paracetamol 500mg",
        "batch_no": "B-2024-117",
        "expiry": "2027-03-01"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_sealers_share_store() {
        let fixture = TestFixture::new();
        let sealer_a = fixture.sealer();
        let sealer_b = fixture.sealer();

        let mf_id = sealer_a.allocate_manufacturer_id().await.unwrap();
        let prod_id = sealer_a.allocate_product_id().await.unwrap();
        let seal = sealer_a.issue(&mf_id, &prod_id, &sample_medicine()).await.unwrap();

        // A token issued through one handle verifies through the other.
        let outcome = sealer_b.verify(&seal.token).await.unwrap();
        assert!(outcome.is_verified);
    }
}
