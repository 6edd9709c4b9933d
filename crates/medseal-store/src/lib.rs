//! # Medseal Store
//!
//! Storage abstraction for medseal records. Provides a trait-based
//! interface for identity and product persistence with SQLite and
//! in-memory implementations.
//!
//! ## Overview
//!
//! The store abstracts persistence behind the [`Store`] trait, keeping
//! the protocol core storage-agnostic. The primary implementation is
//! [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`InsertOutcome`] - Result of inserting a record
//! - [`LedgerStamp`] - Result of a verification-ledger increment
//!
//! ## Design Notes
//!
//! - **Uniqueness backstop**: the service layer does check-then-create
//!   without a transaction; PRIMARY KEY enforcement here is what makes
//!   concurrent duplicate creation safe. The losing insert sees
//!   `InsertOutcome::Duplicate`.
//! - **Append-only identities**: identities are never updated or
//!   deleted; the only in-place mutation anywhere is the atomic
//!   verification-ledger increment.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertOutcome, LedgerStamp, Store};
