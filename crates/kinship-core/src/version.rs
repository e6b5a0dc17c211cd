//! Person versions: community-submitted lineage claims.
//!
//! A version is immutable once created. Multiple versions per person
//! coexist; duplicates of the same claim are suppressed via a content
//! digest over the (father, mother, tag) tuple.

use serde::{Deserialize, Serialize};

use crate::types::{Address, ClaimDigest, PersonHash};

/// Maximum byte length of a version tag.
pub const MAX_TAG_BYTES: usize = 64;

/// Maximum byte length of an off-chain metadata content pointer.
pub const MAX_METADATA_CID_BYTES: usize = 128;

/// Domain prefix for claim digests.
const CLAIM_DOMAIN: &[u8] = b"kinship-claim-v0:";

/// A reference to one parent: person hash plus version index.
///
/// Either part may be zero. A zero hash means "parent unknown"; a zero
/// version index means "no specific version asserted". Version indices
/// are 1-based, so 0 never collides with a real version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentLink {
    pub hash: PersonHash,
    pub version_index: u32,
}

impl ParentLink {
    /// No parent asserted.
    pub const NONE: Self = Self {
        hash: PersonHash::ZERO,
        version_index: 0,
    };

    /// Reference a specific version of a parent.
    pub fn new(hash: PersonHash, version_index: u32) -> Self {
        Self {
            hash,
            version_index,
        }
    }

    /// Whether this link asserts nothing at all.
    pub fn is_none(&self) -> bool {
        self.hash.is_zero() && self.version_index == 0
    }

    /// Whether this link pins a concrete version that must exist.
    pub fn is_pinned(&self) -> bool {
        self.version_index != 0
    }
}

/// The duplicate-suppression key of a version: parent linkage plus tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageClaim {
    pub father: ParentLink,
    pub mother: ParentLink,
    pub tag: String,
}

impl LineageClaim {
    /// Compute the claim digest over the packed tuple encoding.
    ///
    /// Fixed field order: father_hash(32) ‖ father_index(4, BE) ‖
    /// mother_hash(32) ‖ mother_index(4, BE) ‖ tag bytes.
    pub fn digest(&self) -> ClaimDigest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(CLAIM_DOMAIN);
        hasher.update(self.father.hash.as_bytes());
        hasher.update(&self.father.version_index.to_be_bytes());
        hasher.update(self.mother.hash.as_bytes());
        hasher.update(&self.mother.version_index.to_be_bytes());
        hasher.update(self.tag.as_bytes());
        ClaimDigest(*hasher.finalize().as_bytes())
    }
}

/// One stored version of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonVersion {
    /// The person this version belongs to.
    pub person_hash: PersonHash,
    /// 1-based index within the person's version list.
    pub version_index: u32,
    /// Asserted father.
    pub father: ParentLink,
    /// Asserted mother.
    pub mother: ParentLink,
    /// Who submitted this version.
    pub added_by: Address,
    /// Submission time (Unix milliseconds).
    pub timestamp: i64,
    /// Short free-text label.
    pub tag: String,
    /// Off-chain content pointer.
    pub metadata_cid: String,
}

impl PersonVersion {
    /// The duplicate-suppression claim of this version.
    pub fn claim(&self) -> LineageClaim {
        LineageClaim {
            father: self.father,
            mother: self.mother,
            tag: self.tag.clone(),
        }
    }

    /// The claim digest of this version.
    pub fn claim_digest(&self) -> ClaimDigest {
        self.claim().digest()
    }
}
