//! Minted tokens: the 1:1 promotion of one person version to an ownable
//! asset with a revealed, frozen biographical snapshot.

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::identity::{Gender, MAX_BIRTH_YEAR};
use crate::types::{Address, PersonHash, TokenId};

/// Maximum byte length of the revealed full name.
pub const MAX_NAME_BYTES: usize = 128;

/// Maximum byte length of a birth/death place.
pub const MAX_PLACE_BYTES: usize = 128;

/// Maximum byte length of the short story carried in the snapshot.
pub const MAX_SHORT_STORY_BYTES: usize = 256;

/// Maximum byte length of a token URI.
pub const MAX_TOKEN_URI_BYTES: usize = 512;

/// Year/month/day parts with a BC flag. 0 = unknown for each part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateParts {
    pub is_bc: bool,
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl DateParts {
    /// Range checks only; no calendar validation.
    fn validate(&self) -> Result<(), IdentityError> {
        if self.year > MAX_BIRTH_YEAR {
            return Err(IdentityError::InvalidBirthYear(self.year));
        }
        if self.month > 12 {
            return Err(IdentityError::InvalidBirthMonth(self.month));
        }
        if self.day > 31 {
            return Err(IdentityError::InvalidBirthDay(self.day));
        }
        Ok(())
    }
}

/// The biographical snapshot frozen at mint time.
///
/// Unlike [`PersonBasicInfo`](crate::identity::PersonBasicInfo), the full
/// name is revealed here in clear text: minting is the deliberate step
/// from a private hash identity to a public record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCoreInfo {
    pub full_name: String,
    pub gender: Gender,
    pub birth: DateParts,
    pub birth_place: String,
    pub death: DateParts,
    pub death_place: String,
    /// Short biography; long-form text lives in story chunks.
    pub story: String,
}

impl PersonCoreInfo {
    /// Validate field ranges and byte-length bounds.
    pub fn validate(&self) -> Result<(), IdentityError> {
        self.birth.validate()?;
        self.death.validate()?;
        check_len("full_name", &self.full_name, MAX_NAME_BYTES)?;
        check_len("birth_place", &self.birth_place, MAX_PLACE_BYTES)?;
        check_len("death_place", &self.death_place, MAX_PLACE_BYTES)?;
        check_len("story", &self.story, MAX_SHORT_STORY_BYTES)?;
        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), IdentityError> {
    if value.len() > max {
        return Err(IdentityError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

/// A minted token record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintedToken {
    pub token_id: TokenId,
    /// The promoted version.
    pub person_hash: PersonHash,
    pub version_index: u32,
    /// Current owner (initially the minter).
    pub owner: Address,
    /// Mint time (Unix milliseconds).
    pub minted_at: i64,
    /// Frozen snapshot.
    pub core_info: PersonCoreInfo,
    /// Mutable off-chain pointer.
    pub token_uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_info() -> PersonCoreInfo {
        PersonCoreInfo {
            full_name: "Alice Example".to_string(),
            gender: Gender::Female,
            birth: DateParts {
                is_bc: false,
                year: 1902,
                month: 7,
                day: 14,
            },
            birth_place: "Galway".to_string(),
            death: DateParts::default(),
            death_place: String::new(),
            story: "Emigrated in 1924.".to_string(),
        }
    }

    #[test]
    fn test_core_info_valid() {
        assert!(core_info().validate().is_ok());
    }

    #[test]
    fn test_core_info_bad_month() {
        let mut info = core_info();
        info.birth.month = 13;
        assert!(matches!(
            info.validate(),
            Err(IdentityError::InvalidBirthMonth(13))
        ));
    }

    #[test]
    fn test_core_info_name_too_long() {
        let mut info = core_info();
        info.full_name = "x".repeat(MAX_NAME_BYTES + 1);
        assert!(matches!(
            info.validate(),
            Err(IdentityError::FieldTooLong {
                field: "full_name",
                ..
            })
        ));
    }

    #[test]
    fn test_length_is_bytes_not_chars() {
        let mut info = core_info();
        // 43 four-byte scorpions exceed 128 bytes at 43 characters.
        info.birth_place = "\u{1F982}".repeat(43);
        assert!(info.validate().is_err());
    }
}
