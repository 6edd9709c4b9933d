//! Persistent record types shared by the store and the service layer.

use serde::{Deserialize, Serialize};

use crate::ids::{ManufacturerId, ProductId};
use crate::signing::Signature;

/// A manufacturer's signing identity as stored at rest.
///
/// Append-only: created on the first signing request for a new
/// manufacturer id and never mutated or deleted afterwards. The private
/// key is present only in encrypted form (`salt:iv:ciphertext` blob).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerIdentity {
    pub manufacturer_id: ManufacturerId,
    /// SPKI PEM public key.
    pub public_key_pem: String,
    /// Encrypted PKCS#8 PEM private key, `base64(salt):base64(iv):base64(ct)`.
    pub encrypted_private_key: String,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
}

/// A signed medicine-batch record as stored at rest.
///
/// `canonical_payload` and `signature` are immutable after creation;
/// only the verification counter and timestamp change, and only through
/// the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: ProductId,
    /// The exact serialized bytes that were signed. Verification must
    /// reuse this string byte-for-byte.
    pub canonical_payload: String,
    pub signature: Signature,
    pub verification_count: i64,
    /// Last successful ledger stamp, Unix milliseconds.
    pub last_verified_at: Option<i64>,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
}

impl ProductRecord {
    /// Build a fresh record with a zeroed ledger.
    pub fn new(
        product_id: ProductId,
        canonical_payload: String,
        signature: Signature,
        created_at: i64,
    ) -> Self {
        Self {
            product_id,
            canonical_payload,
            signature,
            verification_count: 0,
            last_verified_at: None,
            created_at,
        }
    }
}

/// Canonicalize medicine-batch data for signing.
///
/// Compact JSON with deterministic key order. The result is stored next
/// to the signature, so determinism across a single process is what
/// matters; verification never re-canonicalizes caller input.
pub fn canonical_payload(medicine_data: &serde_json::Value) -> String {
    medicine_data.to_string()
}
