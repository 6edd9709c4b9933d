//! Error types for the vault.

use thiserror::Error;

/// Errors that can occur during vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Wrong master key or corrupt blob. Fatal to the request, not the
    /// process.
    #[error("decryption error: {0}")]
    Decryption(String),

    /// Encryption failure.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Key derivation failure.
    #[error("key derivation error: {0}")]
    KeyDerivation(String),

    /// Stored data violates vault invariants.
    #[error("invalid vault state: {0}")]
    InvalidState(String),

    /// Core error (key parsing / encoding).
    #[error("core error: {0}")]
    Core(#[from] medseal_core::CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] medseal_store::StoreError),
}

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
