//! The Ledger: unified API for the kinship system.
//!
//! The Ledger brings together identity hashing, the proof gate, storage,
//! fees, and mint policy into a cohesive interface. All mutations
//! serialize through a single writer lock so every check-then-write
//! sequence observes a fully committed snapshot; reads go straight to
//! the store.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use kinship_core::{
    chain_hash, clamp_limit, compute_person_hash, verify_story, Address, ChunkKind, MintedToken,
    NameHash, Page, ParentLink, PersonBasicInfo, PersonCoreInfo, PersonHash, PersonVersion,
    StoryChunk, StoryHash, StoryIntegrityReport, StoryMetadata, TokenId, MAX_ATTACHMENT_CID_BYTES,
    MAX_CHUNK_BYTES, MAX_METADATA_CID_BYTES, MAX_STORY_CHUNKS, MAX_TAG_BYTES, MAX_TOKEN_URI_BYTES,
};
use kinship_store::{
    EndorseInsert, MintInsert, NewToken, NewVersion, Store, VersionInsert,
};
use kinship_zk::{ProofBytes, Signal, ZkGate};

use crate::economy::{FeeOracle, ValueTransfer};
use crate::error::{LedgerError, Result};
use crate::events::{LedgerEvent, EVENT_CAPACITY};
use crate::policy::MintPolicy;

/// Configuration for the Ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Basis points of an endorsement fee routed to the token holder
    /// when the endorsed version is minted; the rest goes to the
    /// original submitter. 10000 = all to the holder; larger values
    /// are treated as 10000.
    pub holder_share_bps: u16,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            holder_share_bps: 5000,
        }
    }
}

/// The main Ledger struct.
///
/// Provides a unified API for:
/// - Submitting person versions (clear or zero-knowledge)
/// - Endorsing versions with fee distribution
/// - Minting versions into owned tokens
/// - Writing and sealing story chunks
/// - Querying all of the above, paginated
pub struct Ledger<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// The proof gate for zero-knowledge submissions.
    gate: ZkGate,
    /// Prices endorsement fees.
    fees: Arc<dyn FeeOracle>,
    /// Moves endorsement fees.
    bank: Arc<dyn ValueTransfer>,
    /// Decides who may mint.
    policy: Arc<dyn MintPolicy>,
    /// Configuration.
    config: LedgerConfig,
    /// Event fan-out for indexers.
    events: broadcast::Sender<LedgerEvent>,
    /// Serializes all mutating operations.
    writer: Mutex<()>,
}

impl<S: Store> Ledger<S> {
    /// Create a new ledger instance.
    pub fn new(
        store: S,
        gate: ZkGate,
        fees: Arc<dyn FeeOracle>,
        bank: Arc<dyn ValueTransfer>,
        policy: Arc<dyn MintPolicy>,
        config: LedgerConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store: Arc::new(store),
            gate,
            fees,
            bank,
            policy,
            config,
            events,
            writer: Mutex::new(()),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Subscribe to committed mutation events.
    ///
    /// The channel is lossy: a subscriber that falls more than
    /// [`EVENT_CAPACITY`] events behind loses the oldest.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: LedgerEvent) {
        // Returns Err only when nobody is subscribed.
        let _ = self.events.send(event);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Version Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Submit a version in the clear.
    ///
    /// The person hash is computed here from `info`, and the name-hash
    /// reverse index is updated with the version write.
    pub async fn add_version(
        &self,
        info: &PersonBasicInfo,
        father: ParentLink,
        mother: ParentLink,
        tag: &str,
        metadata_cid: &str,
        submitter: &Address,
    ) -> Result<u32> {
        let _guard = self.writer.lock().await;

        check_tag_and_cid(tag, metadata_cid)?;
        check_parent_shape(&father)?;
        check_parent_shape(&mother)?;

        let person_hash = compute_person_hash(info)?;

        self.insert_version(NewVersion {
            person_hash,
            name_hash: Some(info.name_hash),
            father,
            mother,
            added_by: *submitter,
            timestamp: now_millis(),
            tag: tag.to_string(),
            metadata_cid: metadata_cid.to_string(),
        })
        .await
    }

    /// Submit a version through the proof gate.
    ///
    /// The person and parent hashes come from the verified public
    /// signals; nothing is revealed, so the name index is not updated.
    /// Parent version indices still bind the claim to concrete stored
    /// versions when nonzero.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_version_zk(
        &self,
        proof: &ProofBytes,
        signals: &[Signal],
        submitter: &Address,
        father_index: u32,
        mother_index: u32,
        tag: &str,
        metadata_cid: &str,
    ) -> Result<u32> {
        let _guard = self.writer.lock().await;

        check_tag_and_cid(tag, metadata_cid)?;

        let lineage = self.gate.verify_and_extract(proof, signals, submitter)?;
        self.emit(LedgerEvent::ProofVerified {
            person_hash: lineage.person_hash,
            submitter: *submitter,
        });

        let father = link_from_proof(lineage.father_hash, father_index)?;
        let mother = link_from_proof(lineage.mother_hash, mother_index)?;

        self.insert_version(NewVersion {
            person_hash: lineage.person_hash,
            name_hash: None,
            father,
            mother,
            added_by: *submitter,
            timestamp: now_millis(),
            tag: tag.to_string(),
            metadata_cid: metadata_cid.to_string(),
        })
        .await
    }

    async fn insert_version(&self, version: NewVersion) -> Result<u32> {
        match self.store.insert_version(&version).await? {
            VersionInsert::Inserted { index } => {
                tracing::info!(
                    person = %version.person_hash,
                    index,
                    added_by = %version.added_by,
                    "version added"
                );
                self.emit(LedgerEvent::VersionAdded {
                    person_hash: version.person_hash,
                    version_index: index,
                    father: version.father,
                    mother: version.mother,
                    added_by: version.added_by,
                    timestamp: version.timestamp,
                    tag: version.tag,
                    metadata_cid: version.metadata_cid,
                });
                Ok(index)
            }
            VersionInsert::Duplicate { existing_index } => {
                Err(LedgerError::DuplicateVersion { existing_index })
            }
            VersionInsert::MissingParent { .. } => Err(LedgerError::InvalidParentVersion),
        }
    }

    /// Number of versions stored for a person.
    pub async fn count_versions(&self, person: &PersonHash) -> Result<u32> {
        Ok(self.store.version_count(person).await?)
    }

    /// Get a single version.
    pub async fn get_version(&self, person: &PersonHash, index: u32) -> Result<PersonVersion> {
        self.store
            .get_version(person, index)
            .await?
            .ok_or(LedgerError::VersionNotFound)
    }

    /// List versions of a person, paginated.
    pub async fn list_versions(
        &self,
        person: &PersonHash,
        offset: u64,
        limit: u32,
    ) -> Result<Page<PersonVersion>> {
        let total = self.store.version_count(person).await? as u64;
        let limit = clamp_limit(limit);
        if limit == 0 {
            return Ok(Page::count_only(total, offset));
        }
        let items = self.store.list_versions(person, offset, limit as u64).await?;
        Ok(Page::new(items, total, offset))
    }

    /// Person hashes registered under a name hash, paginated.
    pub async fn find_persons_by_name(
        &self,
        name: &NameHash,
        offset: u64,
        limit: u32,
    ) -> Result<Page<PersonHash>> {
        let total = self.store.persons_by_name_count(name).await?;
        let limit = clamp_limit(limit);
        if limit == 0 {
            return Ok(Page::count_only(total, offset));
        }
        let items = self.store.persons_by_name(name, offset, limit as u64).await?;
        Ok(Page::new(items, total, offset))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Endorsement Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Endorse a version, paying the current fee.
    ///
    /// The fee is read from the oracle at call time and distributed in a
    /// single atomic transfer: split with the token holder when the
    /// version is minted, all to the submitter otherwise. Returns the
    /// fee charged.
    pub async fn endorse(
        &self,
        person: &PersonHash,
        index: u32,
        endorser: &Address,
    ) -> Result<u64> {
        let _guard = self.writer.lock().await;

        let version = self
            .store
            .get_version(person, index)
            .await?
            .ok_or(LedgerError::VersionNotFound)?;

        if self.store.has_endorsed(person, index, endorser).await? {
            return Err(LedgerError::AlreadyEndorsed);
        }

        let fee = self.fees.endorsement_fee();
        let recipients = self.fee_recipients(&version, fee).await?;
        self.bank
            .transfer_split(endorser, &recipients)
            .map_err(|e| LedgerError::FeeTransferFailed(e.to_string()))?;

        // The transfer is committed at this point; any failure to record
        // the endorsement row must hand the fee back.
        let outcome = match self
            .store
            .insert_endorsement(person, index, endorser, now_millis())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                self.refund(endorser, &recipients);
                return Err(e.into());
            }
        };

        match outcome {
            EndorseInsert::Recorded { count } => {
                tracing::info!(
                    person = %person,
                    index,
                    endorser = %endorser,
                    fee,
                    count,
                    "version endorsed"
                );
                self.emit(LedgerEvent::Endorsed {
                    person_hash: *person,
                    version_index: index,
                    endorser: *endorser,
                    fee,
                });
                Ok(fee)
            }
            EndorseInsert::AlreadyEndorsed => {
                self.refund(endorser, &recipients);
                Err(LedgerError::AlreadyEndorsed)
            }
            EndorseInsert::VersionMissing => {
                self.refund(endorser, &recipients);
                Err(LedgerError::VersionNotFound)
            }
        }
    }

    /// Hand a distributed endorsement fee back to the endorser.
    fn refund(&self, endorser: &Address, recipients: &[(Address, u64)]) {
        for (recipient, amount) in recipients {
            if *amount == 0 {
                continue;
            }
            if let Err(e) = self.bank.transfer_split(recipient, &[(*endorser, *amount)]) {
                tracing::error!(
                    recipient = %recipient,
                    amount,
                    error = %e,
                    "endorsement fee refund failed"
                );
            }
        }
    }

    /// Fee recipients for endorsing `version`.
    async fn fee_recipients(
        &self,
        version: &PersonVersion,
        fee: u64,
    ) -> Result<Vec<(Address, u64)>> {
        let token = match self
            .store
            .token_for_version(&version.person_hash, version.version_index)
            .await?
        {
            Some(token_id) => self.store.get_token(token_id).await?,
            None => None,
        };

        Ok(match token {
            Some(token) => {
                // Widen before multiplying so the largest fee cannot
                // overflow; the clamped ratio keeps the result <= fee.
                let bps = u128::from(self.config.holder_share_bps.min(10_000));
                let holder_amount = (u128::from(fee) * bps / 10_000) as u64;
                vec![
                    (version.added_by, fee - holder_amount),
                    (token.owner, holder_amount),
                ]
            }
            None => vec![(version.added_by, fee)],
        })
    }

    /// Number of endorsements on a version.
    pub async fn endorsement_count(&self, person: &PersonHash, index: u32) -> Result<u64> {
        Ok(self.store.endorsement_count(person, index).await?)
    }

    /// Whether an address has endorsed a version.
    pub async fn has_endorsed(
        &self,
        person: &PersonHash,
        index: u32,
        endorser: &Address,
    ) -> Result<bool> {
        Ok(self.store.has_endorsed(person, index, endorser).await?)
    }

    /// Endorsers of a version, paginated.
    pub async fn list_endorsers(
        &self,
        person: &PersonHash,
        index: u32,
        offset: u64,
        limit: u32,
    ) -> Result<Page<Address>> {
        let total = self.store.endorsement_count(person, index).await?;
        let limit = clamp_limit(limit);
        if limit == 0 {
            return Ok(Page::count_only(total, offset));
        }
        let items = self
            .store
            .list_endorsers(person, index, offset, limit as u64)
            .await?;
        Ok(Page::new(items, total, offset))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mint Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Promote a version to an owned token.
    ///
    /// `core_info` is the deliberate disclosure: the full name and life
    /// details frozen at mint. The injected policy decides authorization.
    pub async fn mint(
        &self,
        person: &PersonHash,
        index: u32,
        core_info: PersonCoreInfo,
        minter: &Address,
    ) -> Result<TokenId> {
        let _guard = self.writer.lock().await;

        core_info.validate()?;

        let version = self
            .store
            .get_version(person, index)
            .await?
            .ok_or(LedgerError::VersionNotFound)?;

        if let Some(token_id) = self.store.token_for_version(person, index).await? {
            return Err(LedgerError::AlreadyMinted(token_id));
        }

        let endorsements = self.store.endorsement_count(person, index).await?;
        if !self.policy.authorize(minter, &version, endorsements) {
            return Err(LedgerError::MintNotAuthorized);
        }

        match self
            .store
            .insert_token(&NewToken {
                person_hash: *person,
                version_index: index,
                owner: *minter,
                minted_at: now_millis(),
                core_info,
                token_uri: String::new(),
            })
            .await?
        {
            MintInsert::Minted { token_id } => {
                tracing::info!(
                    person = %person,
                    index,
                    token = token_id.value(),
                    owner = %minter,
                    "version minted"
                );
                self.emit(LedgerEvent::Minted {
                    token_id,
                    person_hash: *person,
                    version_index: index,
                    owner: *minter,
                });
                Ok(token_id)
            }
            MintInsert::AlreadyMinted { token_id } => Err(LedgerError::AlreadyMinted(token_id)),
            MintInsert::VersionMissing => Err(LedgerError::VersionNotFound),
        }
    }

    /// Get a minted token.
    pub async fn get_token(&self, token_id: TokenId) -> Result<MintedToken> {
        self.store
            .get_token(token_id)
            .await?
            .ok_or(LedgerError::TokenNotFound)
    }

    /// The token minted for a version, if any.
    pub async fn token_for_version(
        &self,
        person: &PersonHash,
        index: u32,
    ) -> Result<Option<TokenId>> {
        Ok(self.store.token_for_version(person, index).await?)
    }

    /// Total number of minted tokens.
    pub async fn token_count(&self) -> Result<u64> {
        Ok(self.store.token_count().await?)
    }

    /// Tokens held by an owner, paginated.
    pub async fn tokens_by_owner(
        &self,
        owner: &Address,
        offset: u64,
        limit: u32,
    ) -> Result<Page<TokenId>> {
        let total = self.store.tokens_by_owner_count(owner).await?;
        let limit = clamp_limit(limit);
        if limit == 0 {
            return Ok(Page::count_only(total, offset));
        }
        let items = self.store.tokens_by_owner(owner, offset, limit as u64).await?;
        Ok(Page::new(items, total, offset))
    }

    /// Replace a token's URI. Caller must be the current owner.
    pub async fn update_token_uri(
        &self,
        token_id: TokenId,
        token_uri: &str,
        caller: &Address,
    ) -> Result<()> {
        let _guard = self.writer.lock().await;

        if token_uri.len() > MAX_TOKEN_URI_BYTES {
            return Err(LedgerError::TokenUriTooLong {
                len: token_uri.len(),
                max: MAX_TOKEN_URI_BYTES,
            });
        }

        let token = self
            .store
            .get_token(token_id)
            .await?
            .ok_or(LedgerError::TokenNotFound)?;
        if token.owner != *caller {
            return Err(LedgerError::NotTokenOwner);
        }

        self.store.set_token_uri(token_id, token_uri).await?;
        self.emit(LedgerEvent::TokenUriUpdated { token_id });
        Ok(())
    }

    /// Reassign a token's owner. Caller must be the current owner.
    pub async fn transfer_token(
        &self,
        token_id: TokenId,
        to: &Address,
        caller: &Address,
    ) -> Result<()> {
        let _guard = self.writer.lock().await;

        let token = self
            .store
            .get_token(token_id)
            .await?
            .ok_or(LedgerError::TokenNotFound)?;
        if token.owner != *caller {
            return Err(LedgerError::NotTokenOwner);
        }

        self.store.set_token_owner(token_id, to).await?;
        tracing::info!(
            token = token_id.value(),
            from = %caller,
            to = %to,
            "token transferred"
        );
        self.emit(LedgerEvent::TokenTransferred {
            token_id,
            from: *caller,
            to: *to,
        });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Story Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a chunk at the end of a token's story.
    ///
    /// Chunks are appended strictly in order; `expected_hash`, when
    /// given, must match the hash of `content`. Returns the chunk hash.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_chunk(
        &self,
        token_id: TokenId,
        chunk_index: u32,
        content: &str,
        kind: ChunkKind,
        attachment_cid: &str,
        expected_hash: Option<StoryHash>,
        caller: &Address,
    ) -> Result<StoryHash> {
        let _guard = self.writer.lock().await;

        let (token, meta) = self.story_target(token_id).await?;
        if meta.is_sealed {
            return Err(LedgerError::StorySealed);
        }
        if token.owner != *caller {
            return Err(LedgerError::NotTokenOwner);
        }
        if chunk_index != meta.total_chunks {
            return Err(LedgerError::ChunkIndexOutOfOrder {
                expected: meta.total_chunks,
                got: chunk_index,
            });
        }
        check_chunk_content(content, attachment_cid)?;
        if meta.total_chunks >= MAX_STORY_CHUNKS {
            return Err(LedgerError::StoryFull);
        }

        let chunk_hash = StoryHash::of_content(content);
        if matches!(expected_hash, Some(expected) if expected != chunk_hash) {
            return Err(LedgerError::ChunkHashMismatch);
        }

        let now = now_millis();
        let chunk = StoryChunk {
            token_id,
            chunk_index,
            chunk_hash,
            content: content.to_string(),
            timestamp: now,
            last_editor: *caller,
            kind,
            attachment_cid: attachment_cid.to_string(),
        };
        let meta = StoryMetadata {
            total_chunks: meta.total_chunks + 1,
            total_length: meta.total_length + content.len() as u64,
            last_update_time: now,
            ..meta
        };

        self.store.put_chunk(&chunk, &meta).await?;
        tracing::debug!(token = token_id.value(), chunk_index, "chunk added");
        self.emit(LedgerEvent::ChunkAdded {
            token_id,
            chunk_index,
            chunk_hash,
            last_editor: *caller,
            content_len: content.len() as u64,
        });
        Ok(chunk_hash)
    }

    /// Edit an existing chunk in place.
    ///
    /// The edit replaces the full chunk record, kind and attachment
    /// included. The story total length is recomputed from the old and
    /// new content lengths.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_chunk(
        &self,
        token_id: TokenId,
        chunk_index: u32,
        new_content: &str,
        kind: ChunkKind,
        attachment_cid: &str,
        expected_hash: Option<StoryHash>,
        caller: &Address,
    ) -> Result<StoryHash> {
        let _guard = self.writer.lock().await;

        let (token, meta) = self.story_target(token_id).await?;
        if meta.is_sealed {
            return Err(LedgerError::StorySealed);
        }
        if token.owner != *caller {
            return Err(LedgerError::NotTokenOwner);
        }
        if chunk_index >= meta.total_chunks {
            return Err(LedgerError::ChunkNotFound);
        }
        check_chunk_content(new_content, attachment_cid)?;

        let chunk_hash = StoryHash::of_content(new_content);
        if matches!(expected_hash, Some(expected) if expected != chunk_hash) {
            return Err(LedgerError::ChunkHashMismatch);
        }

        let old = self
            .store
            .get_chunk(token_id, chunk_index)
            .await?
            .ok_or(LedgerError::ChunkNotFound)?;

        let now = now_millis();
        let chunk = StoryChunk {
            token_id,
            chunk_index,
            chunk_hash,
            content: new_content.to_string(),
            timestamp: now,
            last_editor: *caller,
            kind,
            attachment_cid: attachment_cid.to_string(),
        };
        let meta = StoryMetadata {
            total_length: meta.total_length - old.content.len() as u64
                + new_content.len() as u64,
            last_update_time: now,
            ..meta
        };

        self.store.put_chunk(&chunk, &meta).await?;
        tracing::debug!(token = token_id.value(), chunk_index, "chunk updated");
        self.emit(LedgerEvent::ChunkUpdated {
            token_id,
            chunk_index,
            chunk_hash,
            last_editor: *caller,
            content_len: new_content.len() as u64,
        });
        Ok(chunk_hash)
    }

    /// Seal a story, freezing its chunks forever.
    ///
    /// The sealed hash is the chained hash of all chunk hashes in index
    /// order. Returns it.
    pub async fn seal_story(&self, token_id: TokenId, caller: &Address) -> Result<StoryHash> {
        let _guard = self.writer.lock().await;

        let (token, meta) = self.story_target(token_id).await?;
        if meta.is_sealed {
            return Err(LedgerError::StorySealed);
        }
        if token.owner != *caller {
            return Err(LedgerError::NotTokenOwner);
        }
        if meta.total_chunks == 0 {
            return Err(LedgerError::EmptyStory);
        }

        let chunks = self
            .store
            .list_chunks(token_id, 0, meta.total_chunks as u64)
            .await?;
        if chunks.len() != meta.total_chunks as usize {
            return Err(LedgerError::Store(kinship_store::StoreError::InvalidData(
                format!(
                    "story {} has {} of {} chunks",
                    token_id.value(),
                    chunks.len(),
                    meta.total_chunks
                ),
            )));
        }

        let hashes: Vec<StoryHash> = chunks.iter().map(|c| c.chunk_hash).collect();
        let full_story_hash = chain_hash(&hashes);

        let meta = StoryMetadata {
            is_sealed: true,
            full_story_hash: Some(full_story_hash),
            last_update_time: now_millis(),
            ..meta
        };
        self.store.put_story_metadata(&meta).await?;

        tracing::info!(token = token_id.value(), "story sealed");
        self.emit(LedgerEvent::StorySealed {
            token_id,
            full_story_hash,
        });
        Ok(full_story_hash)
    }

    async fn story_target(&self, token_id: TokenId) -> Result<(MintedToken, StoryMetadata)> {
        let token = self
            .store
            .get_token(token_id)
            .await?
            .ok_or(LedgerError::TokenNotFound)?;
        let meta = self
            .store
            .story_metadata(token_id)
            .await?
            .ok_or(LedgerError::TokenNotFound)?;
        Ok((token, meta))
    }

    /// Story bookkeeping for a token.
    pub async fn story_metadata(&self, token_id: TokenId) -> Result<StoryMetadata> {
        self.store
            .story_metadata(token_id)
            .await?
            .ok_or(LedgerError::TokenNotFound)
    }

    /// Get a single chunk.
    pub async fn get_chunk(&self, token_id: TokenId, index: u32) -> Result<StoryChunk> {
        self.store
            .get_chunk(token_id, index)
            .await?
            .ok_or(LedgerError::ChunkNotFound)
    }

    /// Chunks of a story, paginated.
    pub async fn list_chunks(
        &self,
        token_id: TokenId,
        offset: u64,
        limit: u32,
    ) -> Result<Page<StoryChunk>> {
        let meta = self.story_metadata(token_id).await?;
        let total = meta.total_chunks as u64;
        let limit = clamp_limit(limit);
        if limit == 0 {
            return Ok(Page::count_only(total, offset));
        }
        let items = self.store.list_chunks(token_id, offset, limit as u64).await?;
        Ok(Page::new(items, total, offset))
    }

    /// Fetch a token's full chunk set and verify it against the story
    /// metadata.
    pub async fn verify_story_chunks(&self, token_id: TokenId) -> Result<StoryIntegrityReport> {
        let meta = self.story_metadata(token_id).await?;
        let chunks = self
            .store
            .list_chunks(token_id, 0, meta.total_chunks as u64)
            .await?;
        Ok(verify_story(&meta, &chunks))
    }
}

fn check_tag_and_cid(tag: &str, metadata_cid: &str) -> Result<()> {
    if tag.len() > MAX_TAG_BYTES {
        return Err(LedgerError::TagTooLong {
            len: tag.len(),
            max: MAX_TAG_BYTES,
        });
    }
    if metadata_cid.len() > MAX_METADATA_CID_BYTES {
        return Err(LedgerError::MetadataCidTooLong {
            len: metadata_cid.len(),
            max: MAX_METADATA_CID_BYTES,
        });
    }
    Ok(())
}

/// A zero parent hash with a nonzero version index is malformed.
fn check_parent_shape(link: &ParentLink) -> Result<()> {
    if link.hash.is_zero() && link.version_index != 0 {
        return Err(LedgerError::InvalidParentVersion);
    }
    Ok(())
}

fn link_from_proof(hash: Option<PersonHash>, index: u32) -> Result<ParentLink> {
    match hash {
        Some(hash) => Ok(ParentLink::new(hash, index)),
        None if index != 0 => Err(LedgerError::InvalidParentVersion),
        None => Ok(ParentLink::NONE),
    }
}

fn check_chunk_content(content: &str, attachment_cid: &str) -> Result<()> {
    if content.is_empty() {
        return Err(LedgerError::EmptyChunk);
    }
    if content.len() > MAX_CHUNK_BYTES {
        return Err(LedgerError::ChunkTooLong {
            len: content.len(),
            max: MAX_CHUNK_BYTES,
        });
    }
    if attachment_cid.len() > MAX_ATTACHMENT_CID_BYTES {
        return Err(LedgerError::AttachmentCidTooLong {
            len: attachment_cid.len(),
            max: MAX_ATTACHMENT_CID_BYTES,
        });
    }
    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
