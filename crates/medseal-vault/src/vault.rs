//! The manufacturer key vault: get-or-create signing identities over a
//! [`Store`].
//!
//! No application-level locking. Two concurrent `get_or_create` calls
//! for a new manufacturer may both generate a keypair; the store's
//! uniqueness constraint picks the winner, and the loser re-reads and
//! decrypts the winning record. Exactly one identity per manufacturer
//! id survives.

use std::sync::Arc;

use medseal_core::{KeyPair, ManufacturerId, ManufacturerIdentity};
use medseal_store::{InsertOutcome, Store};

use crate::cipher::{decrypt_private_key, encrypt_private_key, MasterKey};
use crate::error::{Result, VaultError};

/// A decrypted signing identity handed to the signer.
pub struct VaultKey {
    pub keypair: KeyPair,
    /// SPKI PEM, as persisted.
    pub public_key_pem: String,
}

/// Generates, encrypts, stores, and retrieves manufacturer keypairs.
pub struct KeyVault<S> {
    store: Arc<S>,
    master_key: MasterKey,
}

impl<S: Store> KeyVault<S> {
    pub fn new(store: Arc<S>, master_key: MasterKey) -> Self {
        Self { store, master_key }
    }

    /// Fetch the signing identity for a manufacturer, creating and
    /// persisting one on first use.
    pub async fn get_or_create(&self, id: &ManufacturerId) -> Result<VaultKey> {
        if let Some(identity) = self.store.find_identity(id).await? {
            return self.open(&identity);
        }

        let keypair = KeyPair::generate();
        let private_pem = keypair.to_pkcs8_pem()?;
        let public_key_pem = keypair.public_key().to_public_key_pem()?;
        let encrypted_private_key = encrypt_private_key(&private_pem, &self.master_key)?;

        let identity = ManufacturerIdentity {
            manufacturer_id: id.clone(),
            public_key_pem: public_key_pem.clone(),
            encrypted_private_key,
            created_at: now_millis(),
        };

        match self.store.insert_identity(&identity).await? {
            InsertOutcome::Inserted => {
                tracing::info!(
                    manufacturer = %id,
                    fingerprint = %keypair.public_key().fingerprint(),
                    "created signing identity"
                );
                Ok(VaultKey {
                    keypair,
                    public_key_pem,
                })
            }
            InsertOutcome::Duplicate => {
                // Lost a creation race; the stored record wins.
                tracing::debug!(manufacturer = %id, "identity creation raced, reloading winner");
                let winner = self.store.find_identity(id).await?.ok_or_else(|| {
                    VaultError::InvalidState(format!(
                        "identity for {id} reported duplicate but is absent"
                    ))
                })?;
                self.open(&winner)
            }
        }
    }

    /// Decrypt a stored identity into a usable keypair.
    fn open(&self, identity: &ManufacturerIdentity) -> Result<VaultKey> {
        let private_pem = decrypt_private_key(&identity.encrypted_private_key, &self.master_key)?;
        let keypair = KeyPair::from_pkcs8_pem(&private_pem)?;
        Ok(VaultKey {
            keypair,
            public_key_pem: identity.public_key_pem.clone(),
        })
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
