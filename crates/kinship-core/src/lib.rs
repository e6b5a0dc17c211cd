//! # Kinship Core
//!
//! Pure primitives for the Kinship Ledger: person identity hashing,
//! versions, minted snapshots, and story shards.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over content-addressed genealogy records.
//!
//! ## Key Types
//!
//! - [`PersonHash`] - Content-derived identity for a person (Blake3)
//! - [`PersonVersion`] - One community-submitted lineage claim
//! - [`MintedToken`] - The promotion of one version to an ownable asset
//! - [`StoryChunk`] / [`StoryMetadata`] - Bounded long-form biography shards
//!
//! ## Identity
//!
//! Person hashes are computed over a packed fixed-width encoding of the
//! canonical attributes; see [`identity`]. The 256-bit hash splits into
//! two 128-bit limbs for systems limited to smaller field elements.

pub mod error;
pub mod identity;
pub mod keys;
pub mod page;
pub mod story;
pub mod token;
pub mod types;
pub mod version;

pub use error::IdentityError;
pub use identity::{
    compute_person_hash, join_limbs, split_limbs, Gender, PersonBasicInfo, PACKED_INFO_LEN,
};
pub use keys::Keypair;
pub use page::{clamp_limit, paginate, Page, MAX_PAGE_LIMIT};
pub use story::{
    chain_hash, verify_story, ChunkKind, StoryChunk, StoryHash, StoryIntegrityReport,
    StoryMetadata, MAX_ATTACHMENT_CID_BYTES, MAX_CHUNK_BYTES, MAX_STORY_CHUNKS,
};
pub use token::{
    DateParts, MintedToken, PersonCoreInfo, MAX_NAME_BYTES, MAX_PLACE_BYTES,
    MAX_SHORT_STORY_BYTES, MAX_TOKEN_URI_BYTES,
};
pub use types::{Address, ClaimDigest, NameHash, PersonHash, TokenId};
pub use version::{
    LineageClaim, ParentLink, PersonVersion, MAX_METADATA_CID_BYTES, MAX_TAG_BYTES,
};
