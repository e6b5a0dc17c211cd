//! Submitter identity: Ed25519 keypairs and derived addresses.
//!
//! Every mutating operation is attributed to a 20-byte [`Address`]. An
//! address is a truncated, domain-prefixed Blake3 hash of an Ed25519
//! verifying key, so test identities can be generated deterministically
//! from seeds.

use ed25519_dalek::{SigningKey, VerifyingKey};
use std::fmt;

use crate::types::Address;

/// Domain prefix for address derivation.
const ADDRESS_DOMAIN: &[u8] = b"kinship-address-v0:";

impl Address {
    /// Derive an address from an Ed25519 verifying key.
    pub fn from_key(key: &VerifyingKey) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ADDRESS_DOMAIN);
        hasher.update(key.as_bytes());
        let digest = hasher.finalize();
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&digest.as_bytes()[..20]);
        Self(arr)
    }

    /// Interpret the address as a big-endian uint160, widened to u128 pairs.
    ///
    /// Returns (hi, lo) where hi holds the top 4 bytes and lo the bottom 16,
    /// matching the layout used when an address crosses into a field element.
    pub fn to_uint160_parts(&self) -> (u32, u128) {
        let hi = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        let mut lo_bytes = [0u8; 16];
        lo_bytes.copy_from_slice(&self.0[4..20]);
        (hi, u128::from_be_bytes(lo_bytes))
    }
}

/// A keypair identifying a submitter.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Get the verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Get the derived address.
    pub fn address(&self) -> Address {
        Address::from_key(&self.signing_key.verifying_key())
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.address())
    }
}
