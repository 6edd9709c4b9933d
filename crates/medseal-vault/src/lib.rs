//! # Medseal Vault
//!
//! Key lifecycle for manufacturer signing identities: generation,
//! encrypted-at-rest storage, and retrieval.
//!
//! ## Scheme
//!
//! Private keys are PKCS#8 PEM, encrypted with AES-256-CBC under a key
//! derived from the process master key via scrypt. Salt and IV are
//! freshly random per record and stored with the ciphertext:
//! `base64(salt):base64(iv):base64(ct)`.
//!
//! ## Key Types
//!
//! - [`MasterKey`] - injected process secret, redacted in Debug output
//! - [`KeyVault`] - get-or-create identities over a `Store`
//! - [`VaultKey`] - a decrypted, usable signing identity

pub mod cipher;
pub mod error;
pub mod vault;

pub use cipher::{decrypt_private_key, encrypt_private_key, MasterKey};
pub use error::{Result, VaultError};
pub use vault::{KeyVault, VaultKey};
