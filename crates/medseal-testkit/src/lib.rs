//! # Medseal Testkit
//!
//! Testing utilities for medseal.
//!
//! ## Overview
//!
//! - **Fixtures**: shared-store setup for sealer integration tests
//! - **Generators**: proptest strategies for ids, payloads, and tokens
//!
//! ## Usage
//!
//! ```rust
//! use medseal_testkit::fixtures::{sample_medicine, TestFixture};
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let sealer = fixture.sealer();
//! let mf_id = sealer.allocate_manufacturer_id().await.unwrap();
//! # }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{sample_medicine, TestFixture, TEST_MASTER_KEY};
