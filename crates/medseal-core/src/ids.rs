//! Opaque identifiers for manufacturers and products, plus the random
//! id allocator.
//!
//! Ids are `prefix + alphanumeric(len)` drawn uniformly from the 62-char
//! alphabet. They are not secrets, so a non-cryptographic PRNG is fine;
//! collision safety comes from the uniqueness check against the store,
//! not from the generator.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conventional prefix for manufacturer ids.
pub const MANUFACTURER_ID_PREFIX: &str = "mfid";

/// Conventional prefix for product ids.
pub const PRODUCT_ID_PREFIX: &str = "pid";

/// Random suffix length used in practice. With 62^16 possible suffixes,
/// the retry loop in [`generate_unique`] terminates effectively always.
pub const ID_SUFFIX_LEN: usize = 16;

/// An opaque, globally unique manufacturer identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManufacturerId(String);

impl ManufacturerId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ManufacturerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ManufacturerId({})", self.0)
    }
}

impl fmt::Display for ManufacturerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ManufacturerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An opaque, globally unique product identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({})", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Generate `prefix + alphanumeric(len)`.
pub fn random_id(prefix: &str, len: usize) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect();
    format!("{prefix}{suffix}")
}

/// Generate ids until the existence predicate reports no collision.
///
/// The loop is unbounded by design: with a 62^16 keyspace a collision
/// streak long enough to matter does not happen in practice. The returned
/// id is guaranteed non-colliding at the time the predicate ran.
pub fn generate_unique<F>(prefix: &str, len: usize, mut exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    loop {
        let candidate = random_id(prefix, len);
        if !exists(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_id_shape() {
        let id = random_id(MANUFACTURER_ID_PREFIX, ID_SUFFIX_LEN);
        assert!(id.starts_with("mfid"));
        assert_eq!(id.len(), 4 + ID_SUFFIX_LEN);
        assert!(id["mfid".len()..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_id_empty_prefix() {
        let id = random_id("", 8);
        assert_eq!(id.len(), 8);
    }

    #[test]
    fn test_generate_unique_skips_collisions() {
        // Reject the first three candidates; the fourth must come back.
        let mut rejected = 0;
        let id = generate_unique(PRODUCT_ID_PREFIX, ID_SUFFIX_LEN, |_| {
            rejected += 1;
            rejected <= 3
        });
        assert_eq!(rejected, 4);
        assert!(id.starts_with("pid"));
    }

    #[test]
    fn test_generate_unique_never_returns_existing() {
        let taken: HashSet<String> =
            (0..64).map(|_| random_id("pid", ID_SUFFIX_LEN)).collect();
        let id = generate_unique("pid", ID_SUFFIX_LEN, |c| taken.contains(c));
        assert!(!taken.contains(&id));
    }

    #[test]
    fn test_ids_practically_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(random_id("mfid", ID_SUFFIX_LEN)));
        }
    }
}
