//! Error types for medseal-core.

use thiserror::Error;

/// Core errors that can occur during signing and token operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
