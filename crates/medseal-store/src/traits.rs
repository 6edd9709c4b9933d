//! Store trait: the abstract interface for record persistence.
//!
//! The core performs check-then-create without a transaction, so the
//! uniqueness guarantees on `manufacturer_id` and `product_id` live
//! here, not in the callers. Every implementation must enforce them and
//! report the loser of a concurrent insert race as [`InsertOutcome::Duplicate`].

use async_trait::async_trait;
use medseal_core::{ManufacturerId, ManufacturerIdentity, ProductId, ProductRecord};

use crate::error::Result;

/// Result of inserting a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Record was inserted.
    Inserted,
    /// A record with the same unique id already exists. Not an error at
    /// this layer; callers decide whether to retry or re-read.
    Duplicate,
}

/// Ledger stamp returned by a successful verification increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStamp {
    /// Verification count after the increment.
    pub count: i64,
    /// The timestamp written to `last_verified_at`, Unix milliseconds.
    pub verified_at: i64,
}

/// The Store trait: async interface for record persistence.
///
/// Identities are append-only; product payload and signature are
/// immutable. The only in-place mutation is the verification ledger
/// update, which must be atomic.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Manufacturer identities
    // ─────────────────────────────────────────────────────────────────────────

    /// Look up an identity by its unique manufacturer id.
    async fn find_identity(&self, id: &ManufacturerId) -> Result<Option<ManufacturerIdentity>>;

    /// Insert an identity, enforcing uniqueness of `manufacturer_id`.
    async fn insert_identity(&self, identity: &ManufacturerIdentity) -> Result<InsertOutcome>;

    /// Check whether a manufacturer id is taken.
    async fn manufacturer_exists(&self, id: &ManufacturerId) -> Result<bool> {
        Ok(self.find_identity(id).await?.is_some())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Product records
    // ─────────────────────────────────────────────────────────────────────────

    /// Look up a product record by its unique product id.
    async fn find_product(&self, id: &ProductId) -> Result<Option<ProductRecord>>;

    /// Insert a product record, enforcing uniqueness of `product_id`.
    async fn insert_product(&self, record: &ProductRecord) -> Result<InsertOutcome>;

    /// Check whether a product id is taken.
    async fn product_exists(&self, id: &ProductId) -> Result<bool> {
        Ok(self.find_product(id).await?.is_some())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification ledger
    // ─────────────────────────────────────────────────────────────────────────

    /// Atomically increment `verification_count` and stamp
    /// `last_verified_at` for a product.
    ///
    /// Returns `None` if the product is unknown; in that case nothing
    /// was mutated.
    async fn record_verification(&self, id: &ProductId, at: i64) -> Result<Option<LedgerStamp>>;
}
