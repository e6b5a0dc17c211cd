//! Public-signal layout and structural validation.
//!
//! The proof relation exposes exactly seven public signals, in this fixed
//! order:
//!
//! ```text
//! [person_hi, person_lo, father_hi, father_lo, mother_hi, mother_lo, submitter]
//! ```
//!
//! Each hash limb must fit in 128 bits; the submitter slot carries the
//! caller's address as a big-endian uint160. An all-zero (hi, lo) parent
//! pair encodes "no parent asserted".

use serde::{Deserialize, Serialize};
use std::fmt;

use kinship_core::{join_limbs, Address, PersonHash};

use crate::error::ZkError;

/// Number of public signals the relation exposes.
pub const SIGNAL_COUNT: usize = 7;

/// Index of the submitter-binding signal.
pub const SUBMITTER_SIGNAL: usize = 6;

/// A 32-byte big-endian field element carried as a public signal.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal(pub [u8; 32]);

impl Signal {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build a signal holding a 128-bit limb.
    pub fn from_u128(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Build the submitter-binding signal from an address (uint160).
    pub fn from_address(addr: &Address) -> Self {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(addr.as_bytes());
        Self(bytes)
    }

    /// Interpret as a 128-bit limb; `None` if the top 16 bytes are nonzero.
    pub fn as_limb(&self) -> Option<u128> {
        if self.0[..16].iter().any(|&b| b != 0) {
            return None;
        }
        let mut lo = [0u8; 16];
        lo.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(lo))
    }

    /// Whether this signal equals the address interpreted as a uint160.
    pub fn binds_address(&self, addr: &Address) -> bool {
        self.0[..12].iter().all(|&b| b == 0) && self.0[12..] == addr.as_bytes()[..]
    }

    /// The zero signal.
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal({})", &hex::encode(self.0)[..16])
    }
}

/// The hashes extracted from a structurally valid signal vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedHashes {
    pub person_hash: PersonHash,
    /// Zero hash when the father limb pair was all zero.
    pub father_hash: PersonHash,
    /// Zero hash when the mother limb pair was all zero.
    pub mother_hash: PersonHash,
}

/// Run the structural checks over a signal vector, in order: count, limb
/// ranges, submitter binding. Cheap checks come before any cryptography.
pub fn validate_signals(signals: &[Signal], submitter: &Address) -> Result<ExtractedHashes, ZkError> {
    if signals.len() != SIGNAL_COUNT {
        return Err(ZkError::SignalCountMismatch {
            expected: SIGNAL_COUNT,
            got: signals.len(),
        });
    }

    let mut limbs = [0u128; 6];
    for (index, signal) in signals[..SUBMITTER_SIGNAL].iter().enumerate() {
        limbs[index] = signal
            .as_limb()
            .ok_or(ZkError::LimbOutOfRange { index })?;
    }

    if !signals[SUBMITTER_SIGNAL].binds_address(submitter) {
        return Err(ZkError::SubmitterMismatch);
    }

    Ok(ExtractedHashes {
        person_hash: join_limbs(limbs[0], limbs[1]),
        father_hash: join_limbs(limbs[2], limbs[3]),
        mother_hash: join_limbs(limbs[4], limbs[5]),
    })
}

/// Build the full signal vector for a submission (prover side of the
/// layout; used by tests and fixtures).
pub fn build_signals(
    person: &PersonHash,
    father: &PersonHash,
    mother: &PersonHash,
    submitter: &Address,
) -> [Signal; SIGNAL_COUNT] {
    let (p_hi, p_lo) = kinship_core::split_limbs(person);
    let (f_hi, f_lo) = kinship_core::split_limbs(father);
    let (m_hi, m_lo) = kinship_core::split_limbs(mother);
    [
        Signal::from_u128(p_hi),
        Signal::from_u128(p_lo),
        Signal::from_u128(f_hi),
        Signal::from_u128(f_lo),
        Signal::from_u128(m_hi),
        Signal::from_u128(m_lo),
        Signal::from_address(submitter),
    ]
}
