//! Story shards: bounded chunks of long-form biographical text attached
//! to a minted token.
//!
//! Chunks are indexed contiguously from 0 and may be appended or edited
//! while the story is unsealed. Sealing is irreversible and commits to the
//! exact content and order of all chunks through a hash-of-hashes chain:
//! the sealed hash covers the concatenated chunk hashes, not the raw
//! content, so integrity can be verified chunk by chunk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::{Address, TokenId};

/// Maximum number of chunks per story.
pub const MAX_STORY_CHUNKS: u32 = 100;

/// Maximum UTF-8 byte length of one chunk's content.
pub const MAX_CHUNK_BYTES: usize = 1000;

/// Maximum byte length of a chunk attachment pointer.
pub const MAX_ATTACHMENT_CID_BYTES: usize = 128;

/// Domain prefix for chunk content hashing.
const CHUNK_DOMAIN: &[u8] = b"kinship-chunk-v0:";

/// Domain prefix for the sealed story hash chain.
const SEAL_DOMAIN: &[u8] = b"kinship-story-seal-v0:";

/// A 32-byte Blake3 hash of chunk content, or of the sealed hash chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryHash(pub [u8; 32]);

impl StoryHash {
    /// Hash chunk content bytes.
    pub fn of_content(content: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(CHUNK_DOMAIN);
        hasher.update(content.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The zero hash: "no expectation" when passed as an optimistic guard.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Whether this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Debug for StoryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoryHash({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for StoryHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Compute the sealed story hash: Blake3 over the concatenated chunk
/// hashes in index order.
pub fn chain_hash(chunk_hashes: &[StoryHash]) -> StoryHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SEAL_DOMAIN);
    for h in chunk_hashes {
        hasher.update(h.as_bytes());
    }
    StoryHash(*hasher.finalize().as_bytes())
}

/// Discriminator for how a chunk's content should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChunkKind {
    /// Narrative text.
    Text = 0,
    /// Text describing an attached media item.
    Media = 1,
    /// A source citation.
    Citation = 2,
}

impl ChunkKind {
    /// Convert to u8 for storage.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Text),
            1 => Some(Self::Media),
            2 => Some(Self::Citation),
            _ => None,
        }
    }
}

/// One stored story chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryChunk {
    pub token_id: TokenId,
    /// 0-based, contiguous.
    pub chunk_index: u32,
    /// Blake3 hash of `content`.
    pub chunk_hash: StoryHash,
    /// UTF-8 text, at most [`MAX_CHUNK_BYTES`] bytes.
    pub content: String,
    /// Last write time (Unix milliseconds).
    pub timestamp: i64,
    pub last_editor: Address,
    pub kind: ChunkKind,
    pub attachment_cid: String,
}

/// Per-token story bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMetadata {
    pub token_id: TokenId,
    pub total_chunks: u32,
    /// Sum of chunk content byte lengths.
    pub total_length: u64,
    /// One-way transition; once true, chunks are frozen forever.
    pub is_sealed: bool,
    pub last_update_time: i64,
    /// Set at seal time only.
    pub full_story_hash: Option<StoryHash>,
}

impl StoryMetadata {
    /// Fresh metadata for a newly minted token.
    pub fn new(token_id: TokenId, now: i64) -> Self {
        Self {
            token_id,
            total_chunks: 0,
            total_length: 0,
            is_sealed: false,
            last_update_time: now,
            full_story_hash: None,
        }
    }
}

/// Result of a read-side integrity check over a fetched chunk set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryIntegrityReport {
    /// Indices in `0..total_chunks` with no fetched chunk.
    pub missing_indices: Vec<u32>,
    /// Indices whose stored hash does not match their content.
    pub corrupt_indices: Vec<u32>,
    /// Sum of fetched chunk byte lengths.
    pub computed_length: u64,
    /// Whether `computed_length` equals the recorded total.
    pub length_matches: bool,
    /// Chained-hash comparison against the sealed hash; `None` when the
    /// story is unsealed or the chunk set is incomplete.
    pub hash_matches: Option<bool>,
}

impl StoryIntegrityReport {
    /// Whether the fetched set is complete and fully consistent.
    pub fn is_intact(&self) -> bool {
        self.missing_indices.is_empty()
            && self.corrupt_indices.is_empty()
            && self.length_matches
            && self.hash_matches != Some(false)
    }
}

/// Verify a full set of fetched chunks against the story metadata.
///
/// Pure; intended for clients that fetched chunks out of band and want to
/// confirm nothing is missing, truncated, or tampered with.
pub fn verify_story(meta: &StoryMetadata, chunks: &[StoryChunk]) -> StoryIntegrityReport {
    let by_index: BTreeMap<u32, &StoryChunk> = chunks
        .iter()
        .filter(|c| c.chunk_index < meta.total_chunks)
        .map(|c| (c.chunk_index, c))
        .collect();

    let missing_indices: Vec<u32> = (0..meta.total_chunks)
        .filter(|i| !by_index.contains_key(i))
        .collect();

    let corrupt_indices: Vec<u32> = by_index
        .values()
        .filter(|c| StoryHash::of_content(&c.content) != c.chunk_hash)
        .map(|c| c.chunk_index)
        .collect();

    let computed_length: u64 = by_index.values().map(|c| c.content.len() as u64).sum();
    let length_matches = computed_length == meta.total_length;

    let hash_matches = match (&meta.full_story_hash, missing_indices.is_empty()) {
        (Some(sealed), true) => {
            let hashes: Vec<StoryHash> = by_index.values().map(|c| c.chunk_hash).collect();
            Some(chain_hash(&hashes) == *sealed)
        }
        _ => None,
    };

    StoryIntegrityReport {
        missing_indices,
        corrupt_indices,
        computed_length,
        length_matches,
        hash_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: u32, content: &str) -> StoryChunk {
        StoryChunk {
            token_id: TokenId(1),
            chunk_index: index,
            chunk_hash: StoryHash::of_content(content),
            content: content.to_string(),
            timestamp: 1000,
            last_editor: Address::from_bytes([7; 20]),
            kind: ChunkKind::Text,
            attachment_cid: String::new(),
        }
    }

    fn sealed_meta(chunks: &[StoryChunk]) -> StoryMetadata {
        let hashes: Vec<StoryHash> = chunks.iter().map(|c| c.chunk_hash).collect();
        StoryMetadata {
            token_id: TokenId(1),
            total_chunks: chunks.len() as u32,
            total_length: chunks.iter().map(|c| c.content.len() as u64).sum(),
            is_sealed: true,
            last_update_time: 1000,
            full_story_hash: Some(chain_hash(&hashes)),
        }
    }

    #[test]
    fn test_verify_intact_story() {
        let chunks = vec![chunk(0, "Born in Galway."), chunk(1, "Moved to Boston.")];
        let meta = sealed_meta(&chunks);

        let report = verify_story(&meta, &chunks);
        assert!(report.missing_indices.is_empty());
        assert!(report.corrupt_indices.is_empty());
        assert!(report.length_matches);
        assert_eq!(report.hash_matches, Some(true));
        assert!(report.is_intact());
    }

    #[test]
    fn test_verify_missing_chunk() {
        let chunks = vec![chunk(0, "a"), chunk(1, "b"), chunk(2, "c")];
        let meta = sealed_meta(&chunks);

        let partial = vec![chunks[0].clone(), chunks[2].clone()];
        let report = verify_story(&meta, &partial);
        assert_eq!(report.missing_indices, vec![1]);
        assert_eq!(report.hash_matches, None);
        assert!(!report.is_intact());
    }

    #[test]
    fn test_verify_tampered_content() {
        let chunks = vec![chunk(0, "original")];
        let meta = sealed_meta(&chunks);

        let mut tampered = chunks.clone();
        tampered[0].content = "rewritten".to_string();
        // Stored hash no longer matches content, and the chain still
        // matches because it is computed over stored hashes.
        let report = verify_story(&meta, &tampered);
        assert_eq!(report.corrupt_indices, vec![0]);
        assert!(!report.length_matches);
        assert!(!report.is_intact());
    }

    #[test]
    fn test_verify_swapped_order_fails_chain() {
        let chunks = vec![chunk(0, "first"), chunk(1, "second")];
        let hashes = vec![chunks[1].chunk_hash, chunks[0].chunk_hash];
        let meta = StoryMetadata {
            full_story_hash: Some(chain_hash(&hashes)),
            ..sealed_meta(&chunks)
        };

        let report = verify_story(&meta, &chunks);
        assert_eq!(report.hash_matches, Some(false));
    }

    #[test]
    fn test_unsealed_story_has_no_hash_verdict() {
        let chunks = vec![chunk(0, "draft")];
        let meta = StoryMetadata {
            is_sealed: false,
            full_story_hash: None,
            ..sealed_meta(&chunks)
        };
        assert_eq!(verify_story(&meta, &chunks).hash_matches, None);
    }

    #[test]
    fn test_chain_hash_order_sensitive() {
        let a = StoryHash::of_content("a");
        let b = StoryHash::of_content("b");
        assert_ne!(chain_hash(&[a, b]), chain_hash(&[b, a]));
    }

    #[test]
    fn test_chunk_kind_roundtrip() {
        for kind in [ChunkKind::Text, ChunkKind::Media, ChunkKind::Citation] {
            assert_eq!(ChunkKind::from_u8(kind.to_u8()), Some(kind));
        }
        assert_eq!(ChunkKind::from_u8(9), None);
    }
}
