//! Zero-knowledge admission gate for lineage claims.
//!
//! A submitter proves knowledge of a person's identifying details (and
//! optionally those of the parents) without revealing them. This crate
//! owns the public-signal layout, the structural checks every
//! submission must pass, and the [`ZkGate`] that dispatches to a
//! pluggable [`ProofVerifier`]. It holds no ledger state.

pub mod error;
pub mod gate;
pub mod signals;

pub use error::ZkError;
pub use gate::{MockVerifier, ProofBytes, ProofVerifier, VerifiedLineage, ZkGate};
pub use signals::{build_signals, validate_signals, ExtractedHashes, Signal, SIGNAL_COUNT, SUBMITTER_SIGNAL};
