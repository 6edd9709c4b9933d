//! The verification ledger: per-product scan counting.
//!
//! A heuristic anti-counterfeiting signal, not a security guarantee; a
//! legitimate re-scan by the same customer also increments the count.
//! Every scan of a known product counts, including scans whose
//! signature check later fails. Unknown products are never counted.

use std::sync::Arc;

use medseal_core::ProductId;
use medseal_store::{LedgerStamp, Store};

use crate::error::{Result, SealError};

/// First scan of a product.
pub const FIRST_SCAN_MESSAGE: &str = "Product is genuine and first-time verified.";

/// Any scan after the first.
pub const REPEAT_SCAN_MESSAGE: &str =
    "Warning: this QR has been scanned multiple times. Possible duplicate.";

/// Tracks per-product verification counts.
pub struct VerificationLedger<S> {
    store: Arc<S>,
}

impl<S: Store> VerificationLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Atomically count a scan of a known product.
    ///
    /// Fails with [`SealError::ProductNotFound`] if the product id is
    /// unknown; nothing is mutated in that case.
    pub async fn record_verification(&self, id: &ProductId) -> Result<LedgerStamp> {
        let stamp = self
            .store
            .record_verification(id, now_millis())
            .await?
            .ok_or_else(|| SealError::ProductNotFound(id.clone()))?;

        tracing::debug!(product = %id, count = stamp.count, "verification recorded");
        Ok(stamp)
    }
}

/// Message for a verified scan at the given count.
pub fn scan_message(count: i64) -> &'static str {
    if count > 1 {
        REPEAT_SCAN_MESSAGE
    } else {
        FIRST_SCAN_MESSAGE
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
