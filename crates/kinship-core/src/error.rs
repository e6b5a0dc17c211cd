//! Error types for the Kinship Ledger core.

use thiserror::Error;

/// Errors from identity hashing and snapshot validation.
///
/// These are all input-validation failures: the caller's fault, cheap to
/// check, and raised before anything else happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("name hash must not be the zero sentinel")]
    InvalidNameHash,

    #[error("birth year out of range: {0}")]
    InvalidBirthYear(u16),

    #[error("birth month out of range: {0}")]
    InvalidBirthMonth(u8),

    #[error("birth day out of range: {0}")]
    InvalidBirthDay(u8),

    #[error("{field} is {len} bytes, exceeds maximum of {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}
