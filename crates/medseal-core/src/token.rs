//! The compact authenticity token carried inside the QR image.
//!
//! Wire format, bit-exact and order-sensitive:
//!
//! ```text
//! {"s": <base64 sig>, "m": <manufacturer id>, "p": <product id>}
//!   -> UTF-8 bytes -> zlib DEFLATE -> base64 text
//! ```
//!
//! Any scanner must run the inverse chain in exactly that order. The
//! short keys plus compression keep the QR payload small enough to scan
//! reliably at print size despite the fixed DER signature overhead.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::{CoreError, Result};
use crate::ids::{ManufacturerId, ProductId};
use crate::signing::Signature;

/// The ephemeral token triple. Exists only on the wire; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub signature: Signature,
    pub manufacturer_id: ManufacturerId,
    pub product_id: ProductId,
}

/// JSON shape with the short keys the wire format mandates.
#[derive(Serialize, Deserialize)]
struct TokenWire {
    s: String,
    m: String,
    p: String,
}

/// Encode a token into QR payload text.
pub fn encode_token(token: &AuthToken) -> Result<String> {
    let wire = TokenWire {
        s: token.signature.as_str().to_string(),
        m: token.manufacturer_id.as_str().to_string(),
        p: token.product_id.as_str().to_string(),
    };
    let json = serde_json::to_vec(&wire).map_err(|e| CoreError::EncodingError(e.to_string()))?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| CoreError::EncodingError(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| CoreError::EncodingError(e.to_string()))?;

    Ok(BASE64.encode(compressed))
}

/// Decode QR payload text back into a token.
///
/// Fails with [`CoreError::MalformedToken`] if any stage of the inverse
/// chain rejects the input: base64, zlib, JSON, or missing fields.
pub fn decode_token(payload: &str) -> Result<AuthToken> {
    let compressed = BASE64
        .decode(payload.trim())
        .map_err(|e| CoreError::MalformedToken(format!("base64: {e}")))?;

    let mut json = Vec::new();
    ZlibDecoder::new(&compressed[..])
        .read_to_end(&mut json)
        .map_err(|e| CoreError::MalformedToken(format!("inflate: {e}")))?;

    let wire: TokenWire = serde_json::from_slice(&json)
        .map_err(|e| CoreError::MalformedToken(format!("json: {e}")))?;

    Ok(AuthToken {
        signature: Signature::new(wire.s),
        manufacturer_id: ManufacturerId::new(wire.m),
        product_id: ProductId::new(wire.p),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_token() -> AuthToken {
        AuthToken {
            signature: Signature::new("MEUCIQDtest+sig/base64=="),
            manufacturer_id: ManufacturerId::new("mfidAB12CD34EF56GH78"),
            product_id: ProductId::new("pidZY98XW76VU54TS32"),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let token = sample_token();
        let encoded = encode_token(&token).unwrap();
        let decoded = decode_token(&encoded).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_encoded_token_is_base64() {
        let encoded = encode_token(&sample_token()).unwrap();
        assert!(BASE64.decode(&encoded).is_ok());
    }

    #[test]
    fn test_field_order_on_wire() {
        // The wire contract names s, m, p in that order.
        let encoded = encode_token(&sample_token()).unwrap();
        let compressed = BASE64.decode(&encoded).unwrap();
        let mut json = Vec::new();
        ZlibDecoder::new(&compressed[..]).read_to_end(&mut json).unwrap();
        let text = String::from_utf8(json).unwrap();

        let s = text.find("\"s\"").unwrap();
        let m = text.find("\"m\"").unwrap();
        let p = text.find("\"p\"").unwrap();
        assert!(s < m && m < p);
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let result = decode_token("!!! not base64 !!!");
        assert!(matches!(result, Err(CoreError::MalformedToken(_))));
    }

    #[test]
    fn test_decode_rejects_uncompressed_bytes() {
        // Valid base64, but not a zlib stream.
        let result = decode_token(&BASE64.encode(b"plain bytes"));
        assert!(matches!(result, Err(CoreError::MalformedToken(_))));
    }

    #[test]
    fn test_decode_rejects_non_json_plaintext() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"not json at all").unwrap();
        let compressed = encoder.finish().unwrap();

        let result = decode_token(&BASE64.encode(compressed));
        assert!(matches!(result, Err(CoreError::MalformedToken(_))));
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"s":"sig","m":"mfid1"}"#).unwrap();
        let compressed = encoder.finish().unwrap();

        let result = decode_token(&BASE64.encode(compressed));
        assert!(matches!(result, Err(CoreError::MalformedToken(_))));
    }

    proptest! {
        #[test]
        fn prop_token_roundtrip(
            sig in "[A-Za-z0-9+/]{16,96}={0,2}",
            m in "[ -~]{1,64}",
            p in "[ -~]{1,64}",
        ) {
            let token = AuthToken {
                signature: Signature::new(sig),
                manufacturer_id: ManufacturerId::new(m),
                product_id: ProductId::new(p),
            };
            let decoded = decode_token(&encode_token(&token).unwrap()).unwrap();
            prop_assert_eq!(decoded, token);
        }
    }
}
