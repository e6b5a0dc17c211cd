//! Error types for the ledger facade.

use kinship_core::{IdentityError, TokenId};
use kinship_store::StoreError;
use kinship_zk::ZkError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Identity validation error.
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Proof gate error.
    #[error("proof error: {0}")]
    Zk(#[from] ZkError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Tag exceeds the byte-length bound.
    #[error("tag too long: {len} bytes (max {max})")]
    TagTooLong { len: usize, max: usize },

    /// Metadata CID exceeds the byte-length bound.
    #[error("metadata CID too long: {len} bytes (max {max})")]
    MetadataCidTooLong { len: usize, max: usize },

    /// Attachment CID exceeds the byte-length bound.
    #[error("attachment CID too long: {len} bytes (max {max})")]
    AttachmentCidTooLong { len: usize, max: usize },

    /// Token URI exceeds the byte-length bound.
    #[error("token URI too long: {len} bytes (max {max})")]
    TokenUriTooLong { len: usize, max: usize },

    /// A parent reference does not resolve to a stored version.
    #[error("invalid parent version reference")]
    InvalidParentVersion,

    /// The same lineage claim already exists under this person.
    #[error("duplicate version: same claim exists at index {existing_index}")]
    DuplicateVersion { existing_index: u32 },

    /// No version at this (person, index).
    #[error("version not found")]
    VersionNotFound,

    /// This address already endorsed this version.
    #[error("already endorsed")]
    AlreadyEndorsed,

    /// No token with this id.
    #[error("token not found")]
    TokenNotFound,

    /// This version is already minted.
    #[error("version already minted as token {0:?}")]
    AlreadyMinted(TokenId),

    /// The mint policy rejected the caller.
    #[error("mint not authorized")]
    MintNotAuthorized,

    /// Caller is not the current token owner.
    #[error("caller is not the token owner")]
    NotTokenOwner,

    /// The story is sealed; chunks are frozen.
    #[error("story is sealed")]
    StorySealed,

    /// Chunks must be appended contiguously.
    #[error("chunk index out of order: expected {expected}, got {got}")]
    ChunkIndexOutOfOrder { expected: u32, got: u32 },

    /// No chunk at this index.
    #[error("chunk not found")]
    ChunkNotFound,

    /// Chunk content must be non-empty.
    #[error("empty chunk")]
    EmptyChunk,

    /// Chunk content exceeds the byte-length cap.
    #[error("chunk too long: {len} bytes (max {max})")]
    ChunkTooLong { len: usize, max: usize },

    /// The story already holds the maximum number of chunks.
    #[error("story is full")]
    StoryFull,

    /// A story cannot be sealed with zero chunks.
    #[error("empty story")]
    EmptyStory,

    /// The caller-supplied chunk hash does not match the content.
    #[error("chunk hash mismatch")]
    ChunkHashMismatch,

    /// The endorsement fee could not be transferred.
    #[error("fee transfer failed: {0}")]
    FeeTransferFailed(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
