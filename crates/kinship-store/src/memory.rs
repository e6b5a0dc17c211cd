//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use kinship_core::{
    Address, ClaimDigest, LineageClaim, MintedToken, NameHash, PersonHash, PersonVersion,
    StoryChunk, StoryMetadata, TokenId,
};

use crate::error::Result;
use crate::traits::{EndorseInsert, MintInsert, NewToken, NewVersion, Store, VersionInsert};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Versions per person; slot `i` holds version index `i + 1`.
    versions: HashMap<PersonHash, Vec<PersonVersion>>,

    /// Claim digest index: (person, digest) -> version index.
    claims: HashMap<(PersonHash, ClaimDigest), u32>,

    /// Reverse name index.
    name_index: HashMap<NameHash, BTreeSet<PersonHash>>,

    /// Endorsers per version.
    endorsements: HashMap<(PersonHash, u32), BTreeSet<Address>>,

    /// Minted tokens by id.
    tokens: BTreeMap<TokenId, MintedToken>,

    /// Version -> token index.
    version_tokens: HashMap<(PersonHash, u32), TokenId>,

    /// Owner -> token ids.
    owner_index: HashMap<Address, BTreeSet<TokenId>>,

    /// Story bookkeeping per token.
    story_meta: HashMap<TokenId, StoryMetadata>,

    /// Story chunks, keyed for in-order iteration.
    chunks: BTreeMap<(TokenId, u32), StoryChunk>,

    /// Next token id to assign (ids start at 1).
    next_token_id: u64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                next_token_id: 1,
                ..Default::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn window<T>(iter: impl Iterator<Item = T>, offset: u64, limit: u64) -> Vec<T> {
    iter.skip(offset as usize).take(limit as usize).collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_version(&self, version: &NewVersion) -> Result<VersionInsert> {
        let mut inner = self.inner.write().unwrap();

        // Pinned parents must resolve to stored versions. Father first.
        for link in [&version.father, &version.mother] {
            if link.is_pinned() {
                let exists = inner
                    .versions
                    .get(&link.hash)
                    .is_some_and(|v| (link.version_index as usize) <= v.len());
                if !exists {
                    return Ok(VersionInsert::MissingParent { link: *link });
                }
            }
        }

        let digest = LineageClaim {
            father: version.father,
            mother: version.mother,
            tag: version.tag.clone(),
        }
        .digest();

        if let Some(&existing_index) = inner.claims.get(&(version.person_hash, digest)) {
            return Ok(VersionInsert::Duplicate { existing_index });
        }

        let list = inner.versions.entry(version.person_hash).or_default();
        let index = list.len() as u32 + 1;
        list.push(PersonVersion {
            person_hash: version.person_hash,
            version_index: index,
            father: version.father,
            mother: version.mother,
            added_by: version.added_by,
            timestamp: version.timestamp,
            tag: version.tag.clone(),
            metadata_cid: version.metadata_cid.clone(),
        });
        inner.claims.insert((version.person_hash, digest), index);

        if let Some(name) = version.name_hash {
            inner
                .name_index
                .entry(name)
                .or_default()
                .insert(version.person_hash);
        }

        Ok(VersionInsert::Inserted { index })
    }

    async fn version_count(&self, person: &PersonHash) -> Result<u32> {
        let inner = self.inner.read().unwrap();
        Ok(inner.versions.get(person).map_or(0, |v| v.len() as u32))
    }

    async fn get_version(&self, person: &PersonHash, index: u32) -> Result<Option<PersonVersion>> {
        let inner = self.inner.read().unwrap();
        if index == 0 {
            return Ok(None);
        }
        Ok(inner
            .versions
            .get(person)
            .and_then(|v| v.get(index as usize - 1))
            .cloned())
    }

    async fn list_versions(
        &self,
        person: &PersonHash,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PersonVersion>> {
        let inner = self.inner.read().unwrap();
        let versions = inner.versions.get(person).map(Vec::as_slice).unwrap_or(&[]);
        Ok(window(versions.iter().cloned(), offset, limit))
    }

    async fn persons_by_name(
        &self,
        name: &NameHash,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PersonHash>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .name_index
            .get(name)
            .map(|set| window(set.iter().copied(), offset, limit))
            .unwrap_or_default())
    }

    async fn persons_by_name_count(&self, name: &NameHash) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        Ok(inner.name_index.get(name).map_or(0, |s| s.len() as u64))
    }

    async fn insert_endorsement(
        &self,
        person: &PersonHash,
        index: u32,
        endorser: &Address,
        _endorsed_at: i64,
    ) -> Result<EndorseInsert> {
        let mut inner = self.inner.write().unwrap();

        let exists = inner
            .versions
            .get(person)
            .is_some_and(|v| index >= 1 && (index as usize) <= v.len());
        if !exists {
            return Ok(EndorseInsert::VersionMissing);
        }

        let set = inner.endorsements.entry((*person, index)).or_default();
        if !set.insert(*endorser) {
            return Ok(EndorseInsert::AlreadyEndorsed);
        }
        Ok(EndorseInsert::Recorded {
            count: set.len() as u64,
        })
    }

    async fn endorsement_count(&self, person: &PersonHash, index: u32) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .endorsements
            .get(&(*person, index))
            .map_or(0, |s| s.len() as u64))
    }

    async fn has_endorsed(
        &self,
        person: &PersonHash,
        index: u32,
        endorser: &Address,
    ) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .endorsements
            .get(&(*person, index))
            .is_some_and(|s| s.contains(endorser)))
    }

    async fn list_endorsers(
        &self,
        person: &PersonHash,
        index: u32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Address>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .endorsements
            .get(&(*person, index))
            .map(|set| window(set.iter().copied(), offset, limit))
            .unwrap_or_default())
    }

    async fn insert_token(&self, token: &NewToken) -> Result<MintInsert> {
        let mut inner = self.inner.write().unwrap();

        let exists = inner
            .versions
            .get(&token.person_hash)
            .is_some_and(|v| token.version_index >= 1 && (token.version_index as usize) <= v.len());
        if !exists {
            return Ok(MintInsert::VersionMissing);
        }

        if let Some(&token_id) = inner
            .version_tokens
            .get(&(token.person_hash, token.version_index))
        {
            return Ok(MintInsert::AlreadyMinted { token_id });
        }

        let token_id = TokenId(inner.next_token_id);
        inner.next_token_id += 1;

        inner.tokens.insert(
            token_id,
            MintedToken {
                token_id,
                person_hash: token.person_hash,
                version_index: token.version_index,
                owner: token.owner,
                minted_at: token.minted_at,
                core_info: token.core_info.clone(),
                token_uri: token.token_uri.clone(),
            },
        );
        inner
            .version_tokens
            .insert((token.person_hash, token.version_index), token_id);
        inner
            .owner_index
            .entry(token.owner)
            .or_default()
            .insert(token_id);
        inner
            .story_meta
            .insert(token_id, StoryMetadata::new(token_id, token.minted_at));

        Ok(MintInsert::Minted { token_id })
    }

    async fn get_token(&self, token_id: TokenId) -> Result<Option<MintedToken>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.tokens.get(&token_id).cloned())
    }

    async fn token_for_version(&self, person: &PersonHash, index: u32) -> Result<Option<TokenId>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.version_tokens.get(&(*person, index)).copied())
    }

    async fn token_count(&self) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        Ok(inner.tokens.len() as u64)
    }

    async fn set_token_owner(&self, token_id: TokenId, owner: &Address) -> Result<bool> {
        let mut inner = self.inner.write().unwrap();
        let Some(previous) = inner.tokens.get(&token_id).map(|t| t.owner) else {
            return Ok(false);
        };
        if let Some(token) = inner.tokens.get_mut(&token_id) {
            token.owner = *owner;
        }
        if let Some(set) = inner.owner_index.get_mut(&previous) {
            set.remove(&token_id);
        }
        inner.owner_index.entry(*owner).or_default().insert(token_id);
        Ok(true)
    }

    async fn set_token_uri(&self, token_id: TokenId, token_uri: &str) -> Result<bool> {
        let mut inner = self.inner.write().unwrap();
        match inner.tokens.get_mut(&token_id) {
            Some(token) => {
                token.token_uri = token_uri.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn tokens_by_owner(
        &self,
        owner: &Address,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<TokenId>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .owner_index
            .get(owner)
            .map(|set| window(set.iter().copied(), offset, limit))
            .unwrap_or_default())
    }

    async fn tokens_by_owner_count(&self, owner: &Address) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        Ok(inner.owner_index.get(owner).map_or(0, |s| s.len() as u64))
    }

    async fn story_metadata(&self, token_id: TokenId) -> Result<Option<StoryMetadata>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.story_meta.get(&token_id).cloned())
    }

    async fn get_chunk(&self, token_id: TokenId, index: u32) -> Result<Option<StoryChunk>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.chunks.get(&(token_id, index)).cloned())
    }

    async fn list_chunks(
        &self,
        token_id: TokenId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<StoryChunk>> {
        let inner = self.inner.read().unwrap();
        Ok(window(
            inner
                .chunks
                .range((token_id, 0)..=(token_id, u32::MAX))
                .map(|(_, c)| c.clone()),
            offset,
            limit,
        ))
    }

    async fn put_chunk(&self, chunk: &StoryChunk, meta: &StoryMetadata) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner
            .chunks
            .insert((chunk.token_id, chunk.chunk_index), chunk.clone());
        inner.story_meta.insert(meta.token_id, meta.clone());
        Ok(())
    }

    async fn put_story_metadata(&self, meta: &StoryMetadata) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.story_meta.insert(meta.token_id, meta.clone());
        Ok(())
    }
}
