//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same uniqueness semantics
//! as SQLite but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use medseal_core::{ManufacturerId, ManufacturerIdentity, ProductId, ProductRecord};

use crate::error::{Result, StoreError};
use crate::traits::{InsertOutcome, LedgerStamp, Store};

/// In-memory store. All data is lost when the store is dropped.
/// Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    identities: HashMap<ManufacturerId, ManufacturerIdentity>,
    products: HashMap<ProductId, ProductRecord>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::InvalidData(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::InvalidData(format!("lock poisoned: {e}")))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_identity(&self, id: &ManufacturerId) -> Result<Option<ManufacturerIdentity>> {
        Ok(self.read()?.identities.get(id).cloned())
    }

    async fn insert_identity(&self, identity: &ManufacturerIdentity) -> Result<InsertOutcome> {
        let mut inner = self.write()?;
        if inner.identities.contains_key(&identity.manufacturer_id) {
            return Ok(InsertOutcome::Duplicate);
        }
        inner
            .identities
            .insert(identity.manufacturer_id.clone(), identity.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<ProductRecord>> {
        Ok(self.read()?.products.get(id).cloned())
    }

    async fn insert_product(&self, record: &ProductRecord) -> Result<InsertOutcome> {
        let mut inner = self.write()?;
        if inner.products.contains_key(&record.product_id) {
            return Ok(InsertOutcome::Duplicate);
        }
        inner.products.insert(record.product_id.clone(), record.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn record_verification(&self, id: &ProductId, at: i64) -> Result<Option<LedgerStamp>> {
        let mut inner = self.write()?;
        match inner.products.get_mut(id) {
            Some(record) => {
                record.verification_count += 1;
                record.last_verified_at = Some(at);
                Ok(Some(LedgerStamp {
                    count: record.verification_count,
                    verified_at: at,
                }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medseal_core::Signature;

    fn identity(id: &str) -> ManufacturerIdentity {
        ManufacturerIdentity {
            manufacturer_id: id.into(),
            public_key_pem: "-----BEGIN PUBLIC KEY-----\n...\n-----END PUBLIC KEY-----\n".into(),
            encrypted_private_key: "c2FsdA==:aXY=:Y3Q=".into(),
            created_at: 1,
        }
    }

    fn product(id: &str) -> ProductRecord {
        ProductRecord::new(id.into(), "{}".into(), Signature::new("sig"), 1)
    }

    #[tokio::test]
    async fn test_identity_insert_and_find() {
        let store = MemoryStore::new();
        assert!(store.find_identity(&"mfidA".into()).await.unwrap().is_none());

        let outcome = store.insert_identity(&identity("mfidA")).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);

        let found = store.find_identity(&"mfidA".into()).await.unwrap().unwrap();
        assert_eq!(found.manufacturer_id.as_str(), "mfidA");
        assert!(store.manufacturer_exists(&"mfidA".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_identity_rejected() {
        let store = MemoryStore::new();
        store.insert_identity(&identity("mfidA")).await.unwrap();

        let outcome = store.insert_identity(&identity("mfidA")).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_duplicate_product_rejected() {
        let store = MemoryStore::new();
        assert_eq!(
            store.insert_product(&product("pidX")).await.unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert_product(&product("pidX")).await.unwrap(),
            InsertOutcome::Duplicate
        );
    }

    #[tokio::test]
    async fn test_record_verification_increments() {
        let store = MemoryStore::new();
        store.insert_product(&product("pidX")).await.unwrap();

        let stamp = store
            .record_verification(&"pidX".into(), 1000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stamp.count, 1);
        assert_eq!(stamp.verified_at, 1000);

        let stamp = store
            .record_verification(&"pidX".into(), 2000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stamp.count, 2);

        let record = store.find_product(&"pidX".into()).await.unwrap().unwrap();
        assert_eq!(record.verification_count, 2);
        assert_eq!(record.last_verified_at, Some(2000));
    }

    #[tokio::test]
    async fn test_record_verification_unknown_product() {
        let store = MemoryStore::new();
        let stamp = store.record_verification(&"pidNone".into(), 1000).await.unwrap();
        assert!(stamp.is_none());
    }
}
