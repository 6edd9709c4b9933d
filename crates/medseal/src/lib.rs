//! # Medseal
//!
//! The unified API for the medseal authenticity protocol: issue signed
//! QR tokens for medicine batches and verify scanned tokens against
//! stored records.
//!
//! ## Overview
//!
//! - **Identities**: one secp256k1 keypair per manufacturer, created on
//!   first use, private key encrypted at rest under the master key
//! - **Seals**: the canonical batch payload is signed, stored, and the
//!   {signature, manufacturer, product} triple packed into a compact
//!   compressed token for QR embedding
//! - **Verification**: the token is decoded and checked against the
//!   stored public key and stored payload; a per-product scan counter
//!   flags possible duplicates
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use medseal::{PassthroughRenderer, Sealer, SealerConfig};
//! use medseal::store::SqliteStore;
//! use medseal::vault::MasterKey;
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open("medseal.db").unwrap());
//!     let sealer = Sealer::new(
//!         MasterKey::new(std::env::var("MASTER_KEY").expect("MASTER_KEY must be set")),
//!         store,
//!         Arc::new(PassthroughRenderer),
//!         SealerConfig::default(),
//!     );
//!
//!     let mf_id = sealer.allocate_manufacturer_id().await.unwrap();
//!     let prod_id = sealer.allocate_product_id().await.unwrap();
//!     let seal = sealer
//!         .issue(&mf_id, &prod_id, &serde_json::json!({"medicine_id": "MED1"}))
//!         .await
//!         .unwrap();
//!
//!     let outcome = sealer.verify(&seal.token).await.unwrap();
//!     assert!(outcome.is_verified);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `medseal::core` - primitives (ids, signing, token codec)
//! - `medseal::store` - storage abstraction and SQLite
//! - `medseal::vault` - key vault and at-rest encryption

pub mod error;
pub mod ledger;
pub mod qr;
pub mod sealer;

// Re-export component crates
pub use medseal_core as core;
pub use medseal_store as store;
pub use medseal_vault as vault;

// Re-export main types for convenience
pub use error::{Result, SealError};
pub use ledger::{scan_message, VerificationLedger, FIRST_SCAN_MESSAGE, REPEAT_SCAN_MESSAGE};
pub use qr::{PassthroughRenderer, QrRenderError, QrRenderer};
pub use sealer::{IssuedSeal, Sealer, SealerConfig, VerifyOutcome, VerifyStatus};

// Re-export commonly used core types
pub use medseal_core::{
    AuthToken, KeyPair, ManufacturerId, ManufacturerIdentity, ProductId, ProductRecord, PublicKey,
    Signature,
};
