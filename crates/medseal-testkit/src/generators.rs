//! Proptest generators for property-based testing.

use proptest::prelude::*;

use medseal_core::{AuthToken, KeyPair, ManufacturerId, ProductId, Signature};

/// Generate a random keypair.
///
/// Key generation draws from the thread RNG, not the proptest seed, so
/// failing cases shrink on the other inputs only.
pub fn keypair() -> impl Strategy<Value = KeyPair> {
    Just(()).prop_map(|_| KeyPair::generate())
}

/// Generate a conventional manufacturer id (`mfid` + 16 alphanumeric).
pub fn manufacturer_id() -> impl Strategy<Value = ManufacturerId> {
    "mfid[A-Za-z0-9]{16}".prop_map(ManufacturerId::new)
}

/// Generate a conventional product id (`pid` + 16 alphanumeric).
pub fn product_id() -> impl Strategy<Value = ProductId> {
    "pid[A-Za-z0-9]{16}".prop_map(ProductId::new)
}

/// Generate arbitrary payload bytes, including the empty payload.
pub fn payload_bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..512)
}

/// Generate a flat medicine-batch JSON object.
pub fn medicine_data() -> impl Strategy<Value = serde_json::Value> {
    proptest::collection::btree_map("[a-z_]{1,12}", "[ -~]{0,32}", 1..6).prop_map(|map| {
        serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect(),
        )
    })
}

/// Generate a structurally valid token with an arbitrary signature.
pub fn auth_token() -> impl Strategy<Value = AuthToken> {
    ("[A-Za-z0-9+/]{24,96}={0,2}", manufacturer_id(), product_id()).prop_map(
        |(sig, manufacturer_id, product_id)| AuthToken {
            signature: Signature::new(sig),
            manufacturer_id,
            product_id,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use medseal_core::{decode_token, encode_token};

    proptest! {
        #[test]
        fn prop_generated_tokens_roundtrip(token in auth_token()) {
            let decoded = decode_token(&encode_token(&token).unwrap()).unwrap();
            prop_assert_eq!(decoded, token);
        }

        #[test]
        fn prop_medicine_data_is_object(data in medicine_data()) {
            prop_assert!(data.is_object());
        }
    }
}
