//! Error types for the medseal service layer.
//!
//! Expected protocol negatives (bad token, unknown ids, signature
//! mismatch during verification) are NOT errors here; they surface as
//! [`crate::VerifyOutcome`] values. `SealError` covers infrastructure
//! failures and misuse of the issuing API.

use medseal_core::{CoreError, ProductId};
use medseal_store::StoreError;
use medseal_vault::VaultError;
use thiserror::Error;

use crate::qr::QrRenderError;

/// Errors that can occur during seal operations.
#[derive(Debug, Error)]
pub enum SealError {
    /// Vault error (key generation, encryption, wrong master key).
    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    /// Core error (signing, token encoding).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error. No partial state is assumed committed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// QR rendering failed.
    #[error("qr render error: {0}")]
    QrRender(#[from] QrRenderError),

    /// Product id already has a signed record.
    #[error("product already exists: {0}")]
    ProductExists(ProductId),

    /// Product id is unknown.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
}

/// Result type for seal operations.
pub type Result<T> = std::result::Result<T, SealError>;
