//! Typed events for off-chain indexers.
//!
//! Every successful mutation publishes one event on a lossy broadcast
//! channel. Each variant carries enough to reconstruct the mutation
//! without re-querying the ledger.

use kinship_core::{Address, ParentLink, PersonHash, StoryHash, TokenId};

/// Buffered events per subscriber; slow consumers lose the oldest.
pub const EVENT_CAPACITY: usize = 256;

/// A committed ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A proof passed the gate (zero-knowledge submissions only).
    ProofVerified {
        person_hash: PersonHash,
        submitter: Address,
    },
    /// A new version was appended. Carries the full lineage linkage so
    /// an indexer can grow its ancestry DAG from the stream alone.
    VersionAdded {
        person_hash: PersonHash,
        version_index: u32,
        father: ParentLink,
        mother: ParentLink,
        added_by: Address,
        timestamp: i64,
        tag: String,
        metadata_cid: String,
    },
    /// A version was endorsed; `fee` is the amount actually charged.
    Endorsed {
        person_hash: PersonHash,
        version_index: u32,
        endorser: Address,
        fee: u64,
    },
    /// A version was promoted to a token.
    Minted {
        token_id: TokenId,
        person_hash: PersonHash,
        version_index: u32,
        owner: Address,
    },
    /// A chunk was appended to a story.
    ChunkAdded {
        token_id: TokenId,
        chunk_index: u32,
        chunk_hash: StoryHash,
        last_editor: Address,
        content_len: u64,
    },
    /// An existing chunk was edited in place.
    ChunkUpdated {
        token_id: TokenId,
        chunk_index: u32,
        chunk_hash: StoryHash,
        last_editor: Address,
        content_len: u64,
    },
    /// A story was sealed; chunks are frozen forever.
    StorySealed {
        token_id: TokenId,
        full_story_hash: StoryHash,
    },
    /// A token changed owner.
    TokenTransferred {
        token_id: TokenId,
        from: Address,
        to: Address,
    },
    /// A token's URI was replaced.
    TokenUriUpdated { token_id: TokenId },
}
