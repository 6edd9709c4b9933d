//! The Sealer: unified API for issuing and verifying authenticity
//! tokens.
//!
//! Issue path: vault supplies the manufacturer's signing key, the
//! canonical payload is signed, the product record persisted, and the
//! token encoded and rendered as a QR.
//!
//! Verify path: decode the token, count the scan, check the signature
//! against the stored public key and stored canonical payload. Expected
//! negatives come back as [`VerifyOutcome`] values; only infrastructure
//! failures are `Err`.

use std::sync::Arc;

use medseal_core::{
    canonical_payload, decode_token, encode_token, random_id, AuthToken, CoreError, ManufacturerId,
    ProductId, ProductRecord, PublicKey, Signature, ID_SUFFIX_LEN, MANUFACTURER_ID_PREFIX,
    PRODUCT_ID_PREFIX,
};
use medseal_store::{InsertOutcome, Store};
use medseal_vault::{KeyVault, MasterKey};

use crate::error::{Result, SealError};
use crate::ledger::{scan_message, VerificationLedger};
use crate::qr::QrRenderer;

/// Unscannable or corrupted QR content.
pub const MALFORMED_TOKEN_MESSAGE: &str = "Invalid QR code format.";

/// Token points at a product id with no record.
pub const UNKNOWN_PRODUCT_MESSAGE: &str = "Product not found.";

/// Token points at a manufacturer id with no identity.
pub const UNKNOWN_MANUFACTURER_MESSAGE: &str =
    "Product not genuine: missing manufacturer data.";

/// Signature does not match the stored payload and key.
pub const SIGNATURE_MISMATCH_MESSAGE: &str =
    "Product not genuine: signature verification failed.";

/// Configuration for the Sealer.
#[derive(Debug, Clone)]
pub struct SealerConfig {
    /// Random suffix length for allocated ids.
    pub id_suffix_len: usize,
}

impl Default for SealerConfig {
    fn default() -> Self {
        Self {
            id_suffix_len: ID_SUFFIX_LEN,
        }
    }
}

/// Everything produced by a successful issue.
#[derive(Debug, Clone)]
pub struct IssuedSeal {
    pub manufacturer_id: ManufacturerId,
    pub product_id: ProductId,
    pub signature: Signature,
    /// The encoded token text embedded in the QR.
    pub token: String,
    /// Rendered QR image bytes (renderer-defined encoding).
    pub qr: Vec<u8>,
}

/// How a verification scan resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStatus {
    /// Signature valid, first recorded scan.
    FirstTimeVerified,
    /// Signature valid, but the product has been scanned before.
    PossibleDuplicate,
    /// Token failed base64/inflate/JSON decoding.
    MalformedToken,
    /// No product record for the token's product id.
    UnknownProduct,
    /// No identity for the token's manufacturer id.
    UnknownManufacturer,
    /// Signature check failed against the stored key and payload.
    SignatureMismatch,
}

impl VerifyStatus {
    /// Whether this status counts as a verified product.
    pub fn is_verified(self) -> bool {
        matches!(self, Self::FirstTimeVerified | Self::PossibleDuplicate)
    }
}

/// The boundary result of a verification scan.
///
/// Always carries `is_verified` plus a human-readable message; "not
/// verified" is an expected outcome of the protocol, never a crash.
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub is_verified: bool,
    pub status: VerifyStatus,
    pub message: String,
    pub manufacturer_id: Option<ManufacturerId>,
    pub product_id: Option<ProductId>,
    /// The stored canonical payload, returned on a verified scan.
    pub product_data: Option<String>,
    /// Ledger count after this scan, when the scan was counted.
    pub verification_count: Option<i64>,
}

impl VerifyOutcome {
    fn negative(status: VerifyStatus, message: &str) -> Self {
        Self {
            is_verified: false,
            status,
            message: message.to_string(),
            manufacturer_id: None,
            product_id: None,
            product_data: None,
            verification_count: None,
        }
    }
}

/// The main service struct: issues and verifies seals over a store.
pub struct Sealer<S> {
    store: Arc<S>,
    vault: KeyVault<S>,
    ledger: VerificationLedger<S>,
    renderer: Arc<dyn QrRenderer>,
    config: SealerConfig,
}

impl<S: Store> Sealer<S> {
    /// Create a new Sealer.
    ///
    /// The master key is injected here rather than read from ambient
    /// state; loading it (and failing hard when it is absent) is the
    /// embedding process's startup concern.
    pub fn new(
        master_key: MasterKey,
        store: Arc<S>,
        renderer: Arc<dyn QrRenderer>,
        config: SealerConfig,
    ) -> Self {
        Self {
            vault: KeyVault::new(Arc::clone(&store), master_key),
            ledger: VerificationLedger::new(Arc::clone(&store)),
            store,
            renderer,
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Id allocation
    // ─────────────────────────────────────────────────────────────────────────

    /// Allocate a manufacturer id that is unused at call time.
    pub async fn allocate_manufacturer_id(&self) -> Result<ManufacturerId> {
        loop {
            let candidate =
                ManufacturerId::new(random_id(MANUFACTURER_ID_PREFIX, self.config.id_suffix_len));
            if !self.store.manufacturer_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }

    /// Allocate a product id that is unused at call time.
    pub async fn allocate_product_id(&self) -> Result<ProductId> {
        loop {
            let candidate =
                ProductId::new(random_id(PRODUCT_ID_PREFIX, self.config.id_suffix_len));
            if !self.store.product_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issue
    // ─────────────────────────────────────────────────────────────────────────

    /// Sign a medicine batch on the manufacturer's behalf and produce
    /// its QR token.
    ///
    /// Creates the manufacturer's signing identity on first use. The
    /// product id must be fresh; re-issuing an existing product is an
    /// error, since payload and signature are immutable once created.
    pub async fn issue(
        &self,
        manufacturer_id: &ManufacturerId,
        product_id: &ProductId,
        medicine_data: &serde_json::Value,
    ) -> Result<IssuedSeal> {
        let key = self.vault.get_or_create(manufacturer_id).await?;

        let payload = canonical_payload(medicine_data);
        let signature = key.keypair.sign(payload.as_bytes());

        let record = ProductRecord::new(
            product_id.clone(),
            payload,
            signature.clone(),
            now_millis(),
        );
        match self.store.insert_product(&record).await? {
            InsertOutcome::Inserted => {}
            InsertOutcome::Duplicate => {
                return Err(SealError::ProductExists(product_id.clone()));
            }
        }

        let token = encode_token(&AuthToken {
            signature: signature.clone(),
            manufacturer_id: manufacturer_id.clone(),
            product_id: product_id.clone(),
        })?;
        let qr = self.renderer.render(&token)?;

        tracing::info!(
            manufacturer = %manufacturer_id,
            product = %product_id,
            token_len = token.len(),
            "issued authenticity seal"
        );

        Ok(IssuedSeal {
            manufacturer_id: manufacturer_id.clone(),
            product_id: product_id.clone(),
            signature,
            token,
            qr,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verify
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify scanned QR token text.
    ///
    /// The ledger counts every scan of a known product, even when the
    /// signature check fails afterwards. Unknown products are never
    /// counted.
    pub async fn verify(&self, qr_text: &str) -> Result<VerifyOutcome> {
        let token = match decode_token(qr_text) {
            Ok(token) => token,
            Err(CoreError::MalformedToken(reason)) => {
                tracing::debug!(%reason, "rejected malformed token");
                return Ok(VerifyOutcome::negative(
                    VerifyStatus::MalformedToken,
                    MALFORMED_TOKEN_MESSAGE,
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let Some(record) = self.store.find_product(&token.product_id).await? else {
            tracing::debug!(product = %token.product_id, "token references unknown product");
            let mut outcome =
                VerifyOutcome::negative(VerifyStatus::UnknownProduct, UNKNOWN_PRODUCT_MESSAGE);
            outcome.manufacturer_id = Some(token.manufacturer_id);
            outcome.product_id = Some(token.product_id);
            return Ok(outcome);
        };

        // The product exists, so this scan counts from here on.
        let stamp = self.ledger.record_verification(&token.product_id).await?;

        let Some(identity) = self.store.find_identity(&token.manufacturer_id).await? else {
            tracing::warn!(
                manufacturer = %token.manufacturer_id,
                product = %token.product_id,
                "product record exists but manufacturer identity is missing"
            );
            let mut outcome = VerifyOutcome::negative(
                VerifyStatus::UnknownManufacturer,
                UNKNOWN_MANUFACTURER_MESSAGE,
            );
            outcome.manufacturer_id = Some(token.manufacturer_id);
            outcome.product_id = Some(token.product_id);
            outcome.verification_count = Some(stamp.count);
            return Ok(outcome);
        };

        let public_key = PublicKey::from_public_key_pem(&identity.public_key_pem)?;
        let verified = match public_key.verify(&token.signature, record.canonical_payload.as_bytes())
        {
            Ok(v) => v,
            // A wire signature that is not even decodable is the same
            // negative outcome as a mismatch.
            Err(CoreError::InvalidSignature(_)) => false,
            Err(e) => return Err(e.into()),
        };

        if !verified {
            let mut outcome = VerifyOutcome::negative(
                VerifyStatus::SignatureMismatch,
                SIGNATURE_MISMATCH_MESSAGE,
            );
            outcome.manufacturer_id = Some(token.manufacturer_id);
            outcome.product_id = Some(token.product_id);
            outcome.verification_count = Some(stamp.count);
            return Ok(outcome);
        }

        let status = if stamp.count > 1 {
            VerifyStatus::PossibleDuplicate
        } else {
            VerifyStatus::FirstTimeVerified
        };

        tracing::info!(
            manufacturer = %token.manufacturer_id,
            product = %token.product_id,
            count = stamp.count,
            "token verified"
        );

        Ok(VerifyOutcome {
            is_verified: true,
            status,
            message: scan_message(stamp.count).to_string(),
            manufacturer_id: Some(token.manufacturer_id),
            product_id: Some(token.product_id),
            product_data: Some(record.canonical_payload),
            verification_count: Some(stamp.count),
        })
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
