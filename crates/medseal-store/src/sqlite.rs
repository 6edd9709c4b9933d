//! SQLite implementation of the Store trait.
//!
//! Primary storage backend, using rusqlite with bundled SQLite. The
//! PRIMARY KEY constraints declared in the migration enforce id
//! uniqueness; a violated constraint surfaces as [`InsertOutcome::Duplicate`]
//! rather than an error.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use medseal_core::{ManufacturerId, ManufacturerIdentity, ProductId, ProductRecord, Signature};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InsertOutcome, LedgerStamp, Store};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::InvalidData(format!("mutex poisoned: {e}")))?;
        f(&conn)
    }

    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::InvalidData(format!("mutex poisoned: {e}")))?;
        f(&mut conn)
    }
}

/// Whether an insert failed on a UNIQUE / PRIMARY KEY constraint.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn row_to_identity(row: &rusqlite::Row<'_>) -> rusqlite::Result<ManufacturerIdentity> {
    Ok(ManufacturerIdentity {
        manufacturer_id: ManufacturerId::new(row.get::<_, String>("manufacturer_id")?),
        public_key_pem: row.get("public_key")?,
        encrypted_private_key: row.get("encrypted_private_key")?,
        created_at: row.get("created_at")?,
    })
}

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProductRecord> {
    Ok(ProductRecord {
        product_id: ProductId::new(row.get::<_, String>("product_id")?),
        canonical_payload: row.get("canonical_payload")?,
        signature: Signature::new(row.get::<_, String>("signature")?),
        verification_count: row.get("verification_count")?,
        last_verified_at: row.get("last_verified_at")?,
        created_at: row.get("created_at")?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_identity(&self, id: &ManufacturerId) -> Result<Option<ManufacturerIdentity>> {
        self.with_conn(|conn| {
            let identity = conn
                .query_row(
                    "SELECT manufacturer_id, public_key, encrypted_private_key, created_at
                     FROM manufacturer_identities WHERE manufacturer_id = ?1",
                    params![id.as_str()],
                    row_to_identity,
                )
                .optional()?;
            Ok(identity)
        })
    }

    async fn insert_identity(&self, identity: &ManufacturerIdentity) -> Result<InsertOutcome> {
        self.with_conn(|conn| {
            let result = conn.execute(
                "INSERT INTO manufacturer_identities
                     (manufacturer_id, public_key, encrypted_private_key, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    identity.manufacturer_id.as_str(),
                    identity.public_key_pem,
                    identity.encrypted_private_key,
                    identity.created_at,
                ],
            );
            match result {
                Ok(_) => Ok(InsertOutcome::Inserted),
                Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
                Err(e) => Err(e.into()),
            }
        })
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<ProductRecord>> {
        self.with_conn(|conn| {
            let record = conn
                .query_row(
                    "SELECT product_id, canonical_payload, signature,
                            verification_count, last_verified_at, created_at
                     FROM product_records WHERE product_id = ?1",
                    params![id.as_str()],
                    row_to_product,
                )
                .optional()?;
            Ok(record)
        })
    }

    async fn insert_product(&self, record: &ProductRecord) -> Result<InsertOutcome> {
        self.with_conn(|conn| {
            let result = conn.execute(
                "INSERT INTO product_records
                     (product_id, canonical_payload, signature,
                      verification_count, last_verified_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.product_id.as_str(),
                    record.canonical_payload,
                    record.signature.as_str(),
                    record.verification_count,
                    record.last_verified_at,
                    record.created_at,
                ],
            );
            match result {
                Ok(_) => Ok(InsertOutcome::Inserted),
                Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
                Err(e) => Err(e.into()),
            }
        })
    }

    async fn record_verification(&self, id: &ProductId, at: i64) -> Result<Option<LedgerStamp>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE product_records
                 SET verification_count = verification_count + 1,
                     last_verified_at = ?2
                 WHERE product_id = ?1",
                params![id.as_str(), at],
            )?;

            if changed == 0 {
                tx.rollback()?;
                return Ok(None);
            }

            let count: i64 = tx.query_row(
                "SELECT verification_count FROM product_records WHERE product_id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )?;

            tx.commit()?;
            Ok(Some(LedgerStamp {
                count,
                verified_at: at,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medseal_core::Signature;

    fn identity(id: &str) -> ManufacturerIdentity {
        ManufacturerIdentity {
            manufacturer_id: id.into(),
            public_key_pem: "-----BEGIN PUBLIC KEY-----\nAA==\n-----END PUBLIC KEY-----\n".into(),
            encrypted_private_key: "c2FsdA==:aXY=:Y3Q=".into(),
            created_at: 42,
        }
    }

    fn product(id: &str) -> ProductRecord {
        ProductRecord::new(
            id.into(),
            r#"{"medicine_id":"MED1"}"#.into(),
            Signature::new("c2ln"),
            42,
        )
    }

    #[tokio::test]
    async fn test_identity_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();

        assert_eq!(
            store.insert_identity(&identity("mfidA")).await.unwrap(),
            InsertOutcome::Inserted
        );

        let found = store.find_identity(&"mfidA".into()).await.unwrap().unwrap();
        assert_eq!(found, identity("mfidA"));
        assert!(store.find_identity(&"mfidB".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_constraint_maps_to_duplicate() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert_identity(&identity("mfidA")).await.unwrap();

        assert_eq!(
            store.insert_identity(&identity("mfidA")).await.unwrap(),
            InsertOutcome::Duplicate
        );

        store.insert_product(&product("pidX")).await.unwrap();
        assert_eq!(
            store.insert_product(&product("pidX")).await.unwrap(),
            InsertOutcome::Duplicate
        );
    }

    #[tokio::test]
    async fn test_product_roundtrip_preserves_ledger_fields() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert_product(&product("pidX")).await.unwrap();

        let found = store.find_product(&"pidX".into()).await.unwrap().unwrap();
        assert_eq!(found.verification_count, 0);
        assert!(found.last_verified_at.is_none());
        assert_eq!(found.canonical_payload, r#"{"medicine_id":"MED1"}"#);
    }

    #[tokio::test]
    async fn test_record_verification_atomic_increment() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert_product(&product("pidX")).await.unwrap();

        let s1 = store
            .record_verification(&"pidX".into(), 1000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!((s1.count, s1.verified_at), (1, 1000));

        let s2 = store
            .record_verification(&"pidX".into(), 2000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!((s2.count, s2.verified_at), (2, 2000));

        let record = store.find_product(&"pidX".into()).await.unwrap().unwrap();
        assert_eq!(record.verification_count, 2);
        assert_eq!(record.last_verified_at, Some(2000));
    }

    #[tokio::test]
    async fn test_record_verification_unknown_is_noop() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store
            .record_verification(&"pidNone".into(), 1000)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medseal.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert_product(&product("pidX")).await.unwrap();
        }

        // Reopen and confirm persistence
        let store = SqliteStore::open(&path).unwrap();
        assert!(store.find_product(&"pidX".into()).await.unwrap().is_some());
    }
}
