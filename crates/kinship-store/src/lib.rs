//! # Kinship Store
//!
//! Storage abstraction for the kinship ledger. Provides a trait-based
//! interface for ledger persistence with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts persistence behind the [`Store`] trait,
//! allowing the ledger to be storage-agnostic. The primary implementation
//! is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`VersionInsert`] / [`EndorseInsert`] / [`MintInsert`] - Typed
//!   outcomes of the three mutating inserts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kinship_store::{SqliteStore, Store, VersionInsert};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("kinship.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     // Insert a version
//!     // let version: NewVersion = ...;
//!     // let result = store.insert_version(&version).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent inserts**: replaying the same claim, endorsement or
//!   mint returns a typed outcome, never an error
//! - **Store-assigned indices**: version indices and token ids are
//!   allocated inside the insert transaction
//! - **Atomic check-and-write**: parent and duplicate checks run in the
//!   same transaction as the insert

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{
    EndorseInsert, MintInsert, NewToken, NewVersion, Store, VersionInsert,
};
