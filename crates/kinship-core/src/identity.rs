//! Person identity hashing.
//!
//! A person is identified by a Blake3 hash over the packed, fixed-width
//! encoding of their canonical attributes. The encoding is deterministic:
//! identical attributes always produce identical hashes on every platform.
//!
//! Field order: name_hash(32) ‖ is_birth_bc(1) ‖ birth_year(2, BE) ‖
//! birth_month(1) ‖ birth_day(1) ‖ gender(1).

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::types::{NameHash, PersonHash};

/// Domain prefix for person hashing.
const PERSON_DOMAIN: &[u8] = b"kinship-person-v0:";

/// Length of the packed encoding in bytes.
pub const PACKED_INFO_LEN: usize = 32 + 1 + 2 + 1 + 1 + 1;

/// Upper bound for the birth year field (0 = unknown).
pub const MAX_BIRTH_YEAR: u16 = 9999;

/// A person's gender, as asserted by the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Gender {
    Unknown = 0,
    Male = 1,
    Female = 2,
    Other = 3,
}

impl Gender {
    /// Convert to u8 for encoding.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            3 => Some(Self::Other),
            _ => None,
        }
    }
}

/// The canonical attributes a person hash is derived from.
///
/// Month and day are range-checked only (0 = unknown); no calendar
/// validation is performed, so February 31st is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonBasicInfo {
    /// Hash of the person's full name (optionally salted). Never zero.
    pub name_hash: NameHash,
    /// Whether the birth year is before the common era.
    pub is_birth_bc: bool,
    /// Birth year, 0-9999 (0 = unknown).
    pub birth_year: u16,
    /// Birth month, 0-12 (0 = unknown).
    pub birth_month: u8,
    /// Birth day, 0-31 (0 = unknown).
    pub birth_day: u8,
    /// Gender.
    pub gender: Gender,
}

impl PersonBasicInfo {
    /// Validate field ranges.
    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.name_hash.is_zero() {
            return Err(IdentityError::InvalidNameHash);
        }
        if self.birth_year > MAX_BIRTH_YEAR {
            return Err(IdentityError::InvalidBirthYear(self.birth_year));
        }
        if self.birth_month > 12 {
            return Err(IdentityError::InvalidBirthMonth(self.birth_month));
        }
        if self.birth_day > 31 {
            return Err(IdentityError::InvalidBirthDay(self.birth_day));
        }
        Ok(())
    }

    /// Produce the packed fixed-width encoding.
    pub fn packed_bytes(&self) -> [u8; PACKED_INFO_LEN] {
        let mut buf = [0u8; PACKED_INFO_LEN];
        buf[..32].copy_from_slice(self.name_hash.as_bytes());
        buf[32] = self.is_birth_bc as u8;
        buf[33..35].copy_from_slice(&self.birth_year.to_be_bytes());
        buf[35] = self.birth_month;
        buf[36] = self.birth_day;
        buf[37] = self.gender.to_u8();
        buf
    }
}

/// Compute the person hash from canonical attributes.
///
/// Pure and total over the valid input domain; fails only on range
/// violations or the zero name-hash sentinel.
pub fn compute_person_hash(info: &PersonBasicInfo) -> Result<PersonHash, IdentityError> {
    info.validate()?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(PERSON_DOMAIN);
    hasher.update(&info.packed_bytes());
    Ok(PersonHash(*hasher.finalize().as_bytes()))
}

/// Split a 256-bit hash into (hi, lo) 128-bit limbs, big-endian.
///
/// Used wherever a 256-bit value must cross into a system that only
/// accepts smaller field elements, such as a proof public-input vector.
pub fn split_limbs(hash: &PersonHash) -> (u128, u128) {
    let bytes = hash.as_bytes();
    let mut hi = [0u8; 16];
    let mut lo = [0u8; 16];
    hi.copy_from_slice(&bytes[..16]);
    lo.copy_from_slice(&bytes[16..]);
    (u128::from_be_bytes(hi), u128::from_be_bytes(lo))
}

/// Reassemble a 256-bit hash from (hi, lo) 128-bit limbs.
pub fn join_limbs(hi: u128, lo: u128) -> PersonHash {
    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(&hi.to_be_bytes());
    bytes[16..].copy_from_slice(&lo.to_be_bytes());
    PersonHash(bytes)
}
