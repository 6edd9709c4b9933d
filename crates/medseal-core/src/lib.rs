//! # Medseal Core
//!
//! Pure primitives for the medseal authenticity protocol: identifiers,
//! ECDSA signing, and the compact QR token codec.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data.
//!
//! ## Key Types
//!
//! - [`KeyPair`] / [`PublicKey`] - secp256k1 signing identity, PEM at rest
//! - [`Signature`] - base64 DER ECDSA signature
//! - [`AuthToken`] - the ephemeral {signature, manufacturer, product} triple
//! - [`ManufacturerId`] / [`ProductId`] - opaque unique identifiers
//! - [`ManufacturerIdentity`] / [`ProductRecord`] - records as stored at rest
//!
//! ## Wire Format
//!
//! The QR payload is `base64(deflate(json {s, m, p}))`. See [`token`].

pub mod error;
pub mod ids;
pub mod record;
pub mod signing;
pub mod token;

pub use error::{CoreError, Result};
pub use ids::{
    generate_unique, random_id, ManufacturerId, ProductId, ID_SUFFIX_LEN, MANUFACTURER_ID_PREFIX,
    PRODUCT_ID_PREFIX,
};
pub use record::{canonical_payload, ManufacturerIdentity, ProductRecord};
pub use signing::{KeyPair, PublicKey, Signature};
pub use token::{decode_token, encode_token, AuthToken};
