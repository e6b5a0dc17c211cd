//! # Kinship Ledger
//!
//! The facade crate: brings identity hashing, the proof gate, storage,
//! fees, and mint policy together behind [`Ledger`].
//!
//! ## Overview
//!
//! A [`Ledger`] wraps a [`Store`](kinship_store::Store) backend and four
//! injected collaborators:
//!
//! - a [`ZkGate`](kinship_zk::ZkGate) for zero-knowledge submissions,
//! - a [`FeeOracle`] pricing endorsements,
//! - a [`ValueTransfer`] moving endorsement fees,
//! - a [`MintPolicy`] deciding who may mint.
//!
//! All mutations serialize through one writer lock and publish a
//! [`LedgerEvent`] on success. Every list query is paginated with
//! [`Page`](kinship_core::Page).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kinship_ledger::{FlatFee, Ledger, LedgerConfig, MemoryBank, SubmitterOnly};
//! use kinship_store::MemoryStore;
//! use kinship_zk::{MockVerifier, ZkGate};
//!
//! let ledger = Ledger::new(
//!     MemoryStore::new(),
//!     ZkGate::new(Arc::new(MockVerifier::accepting())),
//!     Arc::new(FlatFee(10)),
//!     Arc::new(MemoryBank::new()),
//!     Arc::new(SubmitterOnly),
//!     LedgerConfig::default(),
//! );
//! ```

pub mod economy;
pub mod error;
pub mod events;
pub mod ledger;
pub mod policy;

pub use economy::{EconomyError, FeeOracle, FlatFee, MemoryBank, ValueTransfer};
pub use error::{LedgerError, Result};
pub use events::{LedgerEvent, EVENT_CAPACITY};
pub use ledger::{Ledger, LedgerConfig};
pub use policy::{EndorsementThreshold, MintPolicy, Open, SubmitterOnly};
