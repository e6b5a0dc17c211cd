//! Error types for the proof gate.

use thiserror::Error;

/// Failures raised while validating and verifying a submitted proof.
///
/// Structural variants are distinct so callers can branch on exactly what
/// was malformed; all of them are raised before the cryptographic
/// verifier is ever invoked.
#[derive(Debug, Error)]
pub enum ZkError {
    #[error("expected {expected} public signals, got {got}")]
    SignalCountMismatch { expected: usize, got: usize },

    #[error("public signal {index} is not a valid 128-bit limb")]
    LimbOutOfRange { index: usize },

    #[error("public signal does not bind the proof to the submitting address")]
    SubmitterMismatch,

    #[error("proof verification failed")]
    InvalidProof,

    #[error("proof verifier error: {0}")]
    VerifierFailure(String),
}
