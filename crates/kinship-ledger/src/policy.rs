//! Mint authorization policies.
//!
//! Who may promote a version to a token is a deployment decision, so it
//! is a trait the ledger takes at construction.

use kinship_core::{Address, PersonVersion};

/// Decides whether a caller may mint a given version.
pub trait MintPolicy: Send + Sync {
    fn authorize(&self, minter: &Address, version: &PersonVersion, endorsements: u64) -> bool;
}

/// Only the original submitter of the version may mint. The default.
#[derive(Debug, Clone, Copy)]
pub struct SubmitterOnly;

impl MintPolicy for SubmitterOnly {
    fn authorize(&self, minter: &Address, version: &PersonVersion, _endorsements: u64) -> bool {
        *minter == version.added_by
    }
}

/// The submitter may always mint; anyone else once the version has
/// gathered enough endorsements.
#[derive(Debug, Clone, Copy)]
pub struct EndorsementThreshold {
    pub min: u64,
}

impl MintPolicy for EndorsementThreshold {
    fn authorize(&self, minter: &Address, version: &PersonVersion, endorsements: u64) -> bool {
        *minter == version.added_by || endorsements >= self.min
    }
}

/// Anyone may mint.
#[derive(Debug, Clone, Copy)]
pub struct Open;

impl MintPolicy for Open {
    fn authorize(&self, _minter: &Address, _version: &PersonVersion, _endorsements: u64) -> bool {
        true
    }
}
