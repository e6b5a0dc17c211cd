//! Test utilities for the kinship ledger.
//!
//! This crate provides:
//!
//! - [`TestFixture`]: a ready-made in-memory ledger with a funded
//!   keypair, a permissive proof verifier, and a flat fee oracle
//! - Proptest strategies in [`generators`] for identities, names,
//!   and addresses
//! - Golden identity vectors in [`vectors`] that pin the packed
//!   encoding and its hash
//!
//! # Example
//!
//! ```no_run
//! use kinship_testkit::TestFixture;
//!
//! # async fn demo() {
//! let fixture = TestFixture::new();
//! let person = fixture.add_person("Brigid Moran", 1888).await;
//! let count = fixture.ledger.count_versions(&person).await.unwrap();
//! assert_eq!(count, 1);
//! # }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{party_addresses, TestFixture};
pub use vectors::{all_vectors, hash_from_vector, info_from_vector, verify_all_vectors, GoldenVector};
