//! Store trait: the abstract interface for ledger persistence.
//!
//! This trait keeps the ledger storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use kinship_core::{
    Address, MintedToken, NameHash, ParentLink, PersonCoreInfo, PersonHash, PersonVersion,
    StoryChunk, StoryMetadata, TokenId,
};

use crate::error::Result;

/// A version submission before the store has assigned its index.
///
/// `name_hash` is present only for clear submissions; zero-knowledge
/// submissions reveal nothing for the reverse index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersion {
    pub person_hash: PersonHash,
    pub name_hash: Option<NameHash>,
    pub father: ParentLink,
    pub mother: ParentLink,
    pub added_by: Address,
    pub timestamp: i64,
    pub tag: String,
    pub metadata_cid: String,
}

/// A mint submission before the store has assigned the token id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToken {
    pub person_hash: PersonHash,
    pub version_index: u32,
    pub owner: Address,
    pub minted_at: i64,
    pub core_info: PersonCoreInfo,
    pub token_uri: String,
}

/// Result of inserting a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionInsert {
    /// Version was inserted at this 1-based index.
    Inserted { index: u32 },
    /// The same claim already exists under this person (idempotent).
    Duplicate { existing_index: u32 },
    /// A pinned parent version does not exist.
    MissingParent { link: ParentLink },
}

/// Result of recording an endorsement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndorseInsert {
    /// Endorsement recorded; `count` is the new total.
    Recorded { count: u64 },
    /// This address already endorsed this version (idempotent).
    AlreadyEndorsed,
    /// The target version does not exist.
    VersionMissing,
}

/// Result of inserting a minted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintInsert {
    /// Token minted with this id.
    Minted { token_id: TokenId },
    /// The version is already minted.
    AlreadyMinted { token_id: TokenId },
    /// The target version does not exist.
    VersionMissing,
}

/// The Store trait: async interface for ledger persistence.
///
/// All methods are async to support both sync (SQLite) and async
/// backends. For SQLite we use `spawn_blocking` internally to avoid
/// blocking the runtime.
///
/// # Design Notes
///
/// - **Check-and-write is atomic**: `insert_version`, `insert_endorsement`
///   and `insert_token` perform their existence and duplicate checks in
///   the same critical section (or transaction) as the write, so two
///   racing writers cannot both succeed.
/// - **Indices are store-assigned**: version indices and token ids are
///   allocated by the store, never by the caller.
/// - **Typed outcomes over errors**: replays surface as `Duplicate` /
///   `AlreadyEndorsed` / `AlreadyMinted`, not as `Err`.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Version Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a version, assigning the next 1-based index.
    ///
    /// Checks pinned parents (father first, then mother), then the claim
    /// digest, then writes the row and the name index entry in one
    /// transaction.
    async fn insert_version(&self, version: &NewVersion) -> Result<VersionInsert>;

    /// Number of versions stored for a person.
    async fn version_count(&self, person: &PersonHash) -> Result<u32>;

    /// Get a single version by its 1-based index.
    async fn get_version(&self, person: &PersonHash, index: u32) -> Result<Option<PersonVersion>>;

    /// List versions of a person ordered by index, `offset`/`limit` windowed.
    async fn list_versions(
        &self,
        person: &PersonHash,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PersonVersion>>;

    /// Person hashes registered under a name hash, ordered by hash bytes.
    async fn persons_by_name(
        &self,
        name: &NameHash,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PersonHash>>;

    /// Number of person hashes registered under a name hash.
    async fn persons_by_name_count(&self, name: &NameHash) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Endorsement Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record an endorsement of a version by an address.
    async fn insert_endorsement(
        &self,
        person: &PersonHash,
        index: u32,
        endorser: &Address,
        endorsed_at: i64,
    ) -> Result<EndorseInsert>;

    /// Number of endorsements on a version.
    async fn endorsement_count(&self, person: &PersonHash, index: u32) -> Result<u64>;

    /// Whether an address has endorsed a version.
    async fn has_endorsed(&self, person: &PersonHash, index: u32, endorser: &Address)
        -> Result<bool>;

    /// Endorsers of a version, ordered by address bytes.
    async fn list_endorsers(
        &self,
        person: &PersonHash,
        index: u32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Address>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Token Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Mint a token for a version, assigning the next token id.
    ///
    /// Also creates the empty story metadata row in the same transaction.
    async fn insert_token(&self, token: &NewToken) -> Result<MintInsert>;

    /// Get a minted token by id.
    async fn get_token(&self, token_id: TokenId) -> Result<Option<MintedToken>>;

    /// The token minted for a version, if any.
    async fn token_for_version(&self, person: &PersonHash, index: u32) -> Result<Option<TokenId>>;

    /// Total number of minted tokens.
    async fn token_count(&self) -> Result<u64>;

    /// Update a token's owner. Returns false if the token does not exist.
    async fn set_token_owner(&self, token_id: TokenId, owner: &Address) -> Result<bool>;

    /// Update a token's URI. Returns false if the token does not exist.
    async fn set_token_uri(&self, token_id: TokenId, token_uri: &str) -> Result<bool>;

    /// Tokens held by an owner, ordered by token id.
    async fn tokens_by_owner(
        &self,
        owner: &Address,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<TokenId>>;

    /// Number of tokens held by an owner.
    async fn tokens_by_owner_count(&self, owner: &Address) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Story Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Story bookkeeping for a token. `None` if the token does not exist.
    async fn story_metadata(&self, token_id: TokenId) -> Result<Option<StoryMetadata>>;

    /// Get a single chunk by index.
    async fn get_chunk(&self, token_id: TokenId, index: u32) -> Result<Option<StoryChunk>>;

    /// Chunks of a story ordered by index, `offset`/`limit` windowed.
    async fn list_chunks(
        &self,
        token_id: TokenId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<StoryChunk>>;

    /// Write a chunk and its updated metadata atomically.
    ///
    /// Used for both appends and in-place edits; the caller has already
    /// decided the metadata deltas.
    async fn put_chunk(&self, chunk: &StoryChunk, meta: &StoryMetadata) -> Result<()>;

    /// Overwrite story metadata (used to seal).
    async fn put_story_metadata(&self, meta: &StoryMetadata) -> Result<()>;
}
