//! End-to-end scenarios over the full ledger stack.

use std::sync::Arc;

use kinship_core::{
    ChunkKind, DateParts, Gender, NameHash, ParentLink, PersonBasicInfo, PersonCoreInfo,
    PersonHash, StoryHash, TokenId,
};
use kinship_ledger::{
    FlatFee, Ledger, LedgerConfig, LedgerError, LedgerEvent, MemoryBank, MintPolicy, Open,
    SubmitterOnly, ValueTransfer,
};
use kinship_store::{
    EndorseInsert, MemoryStore, MintInsert, NewToken, NewVersion, SqliteStore, Store, StoreError,
    VersionInsert,
};
use kinship_zk::{build_signals, MockVerifier, ProofBytes, ZkGate};

fn addr(byte: u8) -> kinship_core::Address {
    kinship_core::Address::from_bytes([byte; 20])
}

fn person_info(name: &str, year: u16) -> PersonBasicInfo {
    PersonBasicInfo {
        name_hash: NameHash::derive(name, None),
        is_birth_bc: false,
        birth_year: year,
        birth_month: 6,
        birth_day: 15,
        gender: Gender::Unknown,
    }
}

fn core_info(name: &str) -> PersonCoreInfo {
    PersonCoreInfo {
        full_name: name.to_string(),
        gender: Gender::Female,
        birth: DateParts {
            is_bc: false,
            year: 1901,
            month: 3,
            day: 2,
        },
        birth_place: "Dublin".to_string(),
        death: DateParts::default(),
        death_place: String::new(),
        story: "remembered fondly".to_string(),
    }
}

fn build_ledger<S: Store>(
    store: S,
    fee: u64,
    bank: Arc<MemoryBank>,
    policy: Arc<dyn MintPolicy>,
) -> Ledger<S> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Ledger::new(
        store,
        ZkGate::new(Arc::new(MockVerifier::accepting())),
        Arc::new(FlatFee(fee)),
        bank as Arc<dyn ValueTransfer>,
        policy,
        LedgerConfig::default(),
    )
}

fn memory_ledger(fee: u64) -> (Ledger<MemoryStore>, Arc<MemoryBank>) {
    let bank = Arc::new(MemoryBank::new());
    let ledger = build_ledger(MemoryStore::new(), fee, bank.clone(), Arc::new(SubmitterOnly));
    (ledger, bank)
}

// ─────────────────────────────────────────────────────────────────────────────
// Versions
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_lineage_across_generations() {
    let (ledger, _) = memory_ledger(0);
    let submitter = addr(1);

    let grandmother = person_info("Maeve Byrne", 1890);
    let gm_hash = kinship_core::compute_person_hash(&grandmother).unwrap();
    let gm_index = ledger
        .add_version(
            &grandmother,
            ParentLink::NONE,
            ParentLink::NONE,
            "church-register",
            "",
            &submitter,
        )
        .await
        .unwrap();
    assert_eq!(gm_index, 1);

    let child = person_info("Una Byrne", 1920);
    let child_index = ledger
        .add_version(
            &child,
            ParentLink::NONE,
            ParentLink::new(gm_hash, gm_index),
            "census-1926",
            "",
            &submitter,
        )
        .await
        .unwrap();
    assert_eq!(child_index, 1);

    let child_hash = kinship_core::compute_person_hash(&child).unwrap();
    let stored = ledger.get_version(&child_hash, 1).await.unwrap();
    assert_eq!(stored.mother, ParentLink::new(gm_hash, 1));
    assert_eq!(stored.father, ParentLink::NONE);
    assert_eq!(stored.added_by, submitter);

    // Reverse index finds the person by name hash.
    let found = ledger
        .find_persons_by_name(&NameHash::derive("Una Byrne", None), 0, 10)
        .await
        .unwrap();
    assert_eq!(found.items, vec![child_hash]);
}

#[tokio::test]
async fn test_unknown_parent_version_rejected() {
    let (ledger, _) = memory_ledger(0);
    let ghost = PersonHash::from_bytes([0xee; 32]);

    let result = ledger
        .add_version(
            &person_info("Orphan Line", 1950),
            ParentLink::new(ghost, 3),
            ParentLink::NONE,
            "",
            "",
            &addr(1),
        )
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidParentVersion)));
}

#[tokio::test]
async fn test_zero_parent_hash_with_index_rejected() {
    let (ledger, _) = memory_ledger(0);

    let result = ledger
        .add_version(
            &person_info("Broken Link", 1950),
            ParentLink::new(PersonHash::ZERO, 2),
            ParentLink::NONE,
            "",
            "",
            &addr(1),
        )
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidParentVersion)));
}

#[tokio::test]
async fn test_duplicate_claim_rejected_different_tag_accepted() {
    let (ledger, _) = memory_ledger(0);
    let info = person_info("Twice Told", 1900);

    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "a", "", &addr(1))
        .await
        .unwrap();

    let replay = ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "a", "", &addr(2))
        .await;
    assert!(matches!(
        replay,
        Err(LedgerError::DuplicateVersion { existing_index: 1 })
    ));

    // A different tag is a different claim.
    let second = ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "b", "", &addr(2))
        .await
        .unwrap();
    assert_eq!(second, 2);
}

#[tokio::test]
async fn test_tag_and_cid_bounds() {
    let (ledger, _) = memory_ledger(0);
    let info = person_info("Bounded", 1900);

    let long_tag = "x".repeat(65);
    let result = ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, &long_tag, "", &addr(1))
        .await;
    assert!(matches!(result, Err(LedgerError::TagTooLong { len: 65, .. })));

    let long_cid = "c".repeat(129);
    let result = ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", &long_cid, &addr(1))
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::MetadataCidTooLong { len: 129, .. })
    ));
}

#[tokio::test]
async fn test_version_pagination() {
    let (ledger, _) = memory_ledger(0);
    let info = person_info("Many Claims", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();

    for i in 0..5 {
        ledger
            .add_version(
                &info,
                ParentLink::NONE,
                ParentLink::NONE,
                &format!("tag-{i}"),
                "",
                &addr(1),
            )
            .await
            .unwrap();
    }

    let page = ledger.list_versions(&person, 2, 2).await.unwrap();
    assert_eq!(page.total_count, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].version_index, 3);
    assert!(page.has_more);
    assert_eq!(page.next_offset, 4);

    // Count-only form.
    let counted = ledger.list_versions(&person, 0, 0).await.unwrap();
    assert!(counted.items.is_empty());
    assert_eq!(counted.total_count, 5);
}

// ─────────────────────────────────────────────────────────────────────────────
// Zero-knowledge submissions
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_zk_submission_hides_name() {
    let (ledger, _) = memory_ledger(0);
    let submitter = addr(9);
    let person = PersonHash::from_bytes([0x5a; 32]);

    let signals = build_signals(&person, &PersonHash::ZERO, &PersonHash::ZERO, &submitter);
    let index = ledger
        .add_version_zk(
            &ProofBytes::new(vec![1, 2, 3]),
            &signals,
            &submitter,
            0,
            0,
            "private",
            "",
        )
        .await
        .unwrap();
    assert_eq!(index, 1);

    let stored = ledger.get_version(&person, 1).await.unwrap();
    assert_eq!(stored.added_by, submitter);

    // Nothing was revealed for the reverse index.
    let found = ledger
        .find_persons_by_name(&NameHash::derive("anyone", None), 0, 10)
        .await
        .unwrap();
    assert_eq!(found.total_count, 0);
}

#[tokio::test]
async fn test_zk_submission_rejected_by_verifier() {
    let bank = Arc::new(MemoryBank::new());
    let ledger = Ledger::new(
        MemoryStore::new(),
        ZkGate::new(Arc::new(MockVerifier::rejecting())),
        Arc::new(FlatFee(0)),
        bank as Arc<dyn ValueTransfer>,
        Arc::new(SubmitterOnly),
        LedgerConfig::default(),
    );
    let submitter = addr(9);
    let person = PersonHash::from_bytes([0x5a; 32]);
    let signals = build_signals(&person, &PersonHash::ZERO, &PersonHash::ZERO, &submitter);

    let result = ledger
        .add_version_zk(&ProofBytes::new(vec![0]), &signals, &submitter, 0, 0, "", "")
        .await;
    assert!(matches!(result, Err(LedgerError::Zk(_))));
    assert_eq!(ledger.count_versions(&person).await.unwrap(), 0);
}

#[tokio::test]
async fn test_zk_submitter_binding_enforced() {
    let (ledger, _) = memory_ledger(0);
    let person = PersonHash::from_bytes([0x5a; 32]);
    // Signals bound to addr(9), submitted by addr(8).
    let signals = build_signals(&person, &PersonHash::ZERO, &PersonHash::ZERO, &addr(9));

    let result = ledger
        .add_version_zk(&ProofBytes::new(vec![0]), &signals, &addr(8), 0, 0, "", "")
        .await;
    assert!(matches!(result, Err(LedgerError::Zk(_))));
}

// ─────────────────────────────────────────────────────────────────────────────
// Endorsements and fees
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_endorse_unminted_pays_submitter_in_full() {
    let (ledger, bank) = memory_ledger(10);
    let submitter = addr(1);
    let endorser = addr(2);
    bank.deposit(&endorser, 100);

    let info = person_info("Endorsed One", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", &submitter)
        .await
        .unwrap();

    let fee = ledger.endorse(&person, 1, &endorser).await.unwrap();
    assert_eq!(fee, 10);
    assert_eq!(bank.balance(&endorser), 90);
    assert_eq!(bank.balance(&submitter), 10);
    assert_eq!(ledger.endorsement_count(&person, 1).await.unwrap(), 1);

    let replay = ledger.endorse(&person, 1, &endorser).await;
    assert!(matches!(replay, Err(LedgerError::AlreadyEndorsed)));
    assert_eq!(bank.balance(&endorser), 90);
}

#[tokio::test]
async fn test_endorse_minted_splits_with_holder() {
    let (ledger, bank) = memory_ledger(10);
    let submitter = addr(1);
    let holder = addr(3);
    let endorser = addr(2);
    bank.deposit(&endorser, 100);

    let info = person_info("Endorsed Two", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", &submitter)
        .await
        .unwrap();
    let token_id = ledger
        .mint(&person, 1, core_info("Endorsed Two"), &submitter)
        .await
        .unwrap();
    ledger.transfer_token(token_id, &holder, &submitter).await.unwrap();

    ledger.endorse(&person, 1, &endorser).await.unwrap();
    // Default split is 50/50 between submitter and current holder.
    assert_eq!(bank.balance(&submitter), 5);
    assert_eq!(bank.balance(&holder), 5);
}

#[tokio::test]
async fn test_endorse_insufficient_funds_writes_nothing() {
    let (ledger, bank) = memory_ledger(10);
    let endorser = addr(2);
    bank.deposit(&endorser, 3);

    let info = person_info("Unpaid", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", &addr(1))
        .await
        .unwrap();

    let result = ledger.endorse(&person, 1, &endorser).await;
    assert!(matches!(result, Err(LedgerError::FeeTransferFailed(_))));
    assert_eq!(ledger.endorsement_count(&person, 1).await.unwrap(), 0);
    assert!(!ledger.has_endorsed(&person, 1, &endorser).await.unwrap());
    assert_eq!(bank.balance(&endorser), 3);
}

#[tokio::test]
async fn test_endorse_missing_version() {
    let (ledger, _) = memory_ledger(0);
    let result = ledger
        .endorse(&PersonHash::from_bytes([9; 32]), 1, &addr(2))
        .await;
    assert!(matches!(result, Err(LedgerError::VersionNotFound)));
}

#[tokio::test]
async fn test_fee_split_handles_large_fees() {
    let fee = u64::MAX / 2;
    let (ledger, bank) = memory_ledger(fee);
    let submitter = addr(1);
    let holder = addr(3);
    let endorser = addr(2);
    bank.deposit(&endorser, fee);

    let info = person_info("Large Fee", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", &submitter)
        .await
        .unwrap();
    let token_id = ledger
        .mint(&person, 1, core_info("Large Fee"), &submitter)
        .await
        .unwrap();
    ledger.transfer_token(token_id, &holder, &submitter).await.unwrap();

    let charged = ledger.endorse(&person, 1, &endorser).await.unwrap();
    assert_eq!(charged, fee);
    assert_eq!(bank.balance(&holder), fee / 2);
    assert_eq!(bank.balance(&submitter), fee - fee / 2);
    assert_eq!(bank.balance(&endorser), 0);
}

#[tokio::test]
async fn test_holder_share_over_full_is_clamped() {
    let bank = Arc::new(MemoryBank::new());
    let ledger = Ledger::new(
        MemoryStore::new(),
        ZkGate::new(Arc::new(MockVerifier::accepting())),
        Arc::new(FlatFee(10)),
        bank.clone() as Arc<dyn ValueTransfer>,
        Arc::new(SubmitterOnly),
        LedgerConfig {
            holder_share_bps: 20_000,
        },
    );
    let submitter = addr(1);
    let holder = addr(3);
    let endorser = addr(2);
    bank.deposit(&endorser, 10);

    let info = person_info("Clamped Share", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", &submitter)
        .await
        .unwrap();
    let token_id = ledger
        .mint(&person, 1, core_info("Clamped Share"), &submitter)
        .await
        .unwrap();
    ledger.transfer_token(token_id, &holder, &submitter).await.unwrap();

    // A ratio above 10000 routes the whole fee to the holder, never more.
    ledger.endorse(&person, 1, &endorser).await.unwrap();
    assert_eq!(bank.balance(&holder), 10);
    assert_eq!(bank.balance(&submitter), 0);
    assert_eq!(bank.balance(&endorser), 0);
}

/// A store that accepts everything except endorsement writes.
struct FailingEndorsementStore {
    inner: MemoryStore,
}

#[async_trait::async_trait]
impl Store for FailingEndorsementStore {
    async fn insert_version(
        &self,
        version: &NewVersion,
    ) -> kinship_store::Result<VersionInsert> {
        self.inner.insert_version(version).await
    }

    async fn version_count(&self, person: &PersonHash) -> kinship_store::Result<u32> {
        self.inner.version_count(person).await
    }

    async fn get_version(
        &self,
        person: &PersonHash,
        index: u32,
    ) -> kinship_store::Result<Option<kinship_core::PersonVersion>> {
        self.inner.get_version(person, index).await
    }

    async fn list_versions(
        &self,
        person: &PersonHash,
        offset: u64,
        limit: u64,
    ) -> kinship_store::Result<Vec<kinship_core::PersonVersion>> {
        self.inner.list_versions(person, offset, limit).await
    }

    async fn persons_by_name(
        &self,
        name: &NameHash,
        offset: u64,
        limit: u64,
    ) -> kinship_store::Result<Vec<PersonHash>> {
        self.inner.persons_by_name(name, offset, limit).await
    }

    async fn persons_by_name_count(&self, name: &NameHash) -> kinship_store::Result<u64> {
        self.inner.persons_by_name_count(name).await
    }

    async fn insert_endorsement(
        &self,
        _person: &PersonHash,
        _index: u32,
        _endorser: &kinship_core::Address,
        _endorsed_at: i64,
    ) -> kinship_store::Result<EndorseInsert> {
        Err(StoreError::InvalidData("endorsement write rejected".into()))
    }

    async fn endorsement_count(
        &self,
        person: &PersonHash,
        index: u32,
    ) -> kinship_store::Result<u64> {
        self.inner.endorsement_count(person, index).await
    }

    async fn has_endorsed(
        &self,
        person: &PersonHash,
        index: u32,
        endorser: &kinship_core::Address,
    ) -> kinship_store::Result<bool> {
        self.inner.has_endorsed(person, index, endorser).await
    }

    async fn list_endorsers(
        &self,
        person: &PersonHash,
        index: u32,
        offset: u64,
        limit: u64,
    ) -> kinship_store::Result<Vec<kinship_core::Address>> {
        self.inner.list_endorsers(person, index, offset, limit).await
    }

    async fn insert_token(&self, token: &NewToken) -> kinship_store::Result<MintInsert> {
        self.inner.insert_token(token).await
    }

    async fn get_token(
        &self,
        token_id: TokenId,
    ) -> kinship_store::Result<Option<kinship_core::MintedToken>> {
        self.inner.get_token(token_id).await
    }

    async fn token_for_version(
        &self,
        person: &PersonHash,
        index: u32,
    ) -> kinship_store::Result<Option<TokenId>> {
        self.inner.token_for_version(person, index).await
    }

    async fn token_count(&self) -> kinship_store::Result<u64> {
        self.inner.token_count().await
    }

    async fn set_token_owner(
        &self,
        token_id: TokenId,
        owner: &kinship_core::Address,
    ) -> kinship_store::Result<bool> {
        self.inner.set_token_owner(token_id, owner).await
    }

    async fn set_token_uri(
        &self,
        token_id: TokenId,
        token_uri: &str,
    ) -> kinship_store::Result<bool> {
        self.inner.set_token_uri(token_id, token_uri).await
    }

    async fn tokens_by_owner(
        &self,
        owner: &kinship_core::Address,
        offset: u64,
        limit: u64,
    ) -> kinship_store::Result<Vec<TokenId>> {
        self.inner.tokens_by_owner(owner, offset, limit).await
    }

    async fn tokens_by_owner_count(
        &self,
        owner: &kinship_core::Address,
    ) -> kinship_store::Result<u64> {
        self.inner.tokens_by_owner_count(owner).await
    }

    async fn story_metadata(
        &self,
        token_id: TokenId,
    ) -> kinship_store::Result<Option<kinship_core::StoryMetadata>> {
        self.inner.story_metadata(token_id).await
    }

    async fn get_chunk(
        &self,
        token_id: TokenId,
        index: u32,
    ) -> kinship_store::Result<Option<kinship_core::StoryChunk>> {
        self.inner.get_chunk(token_id, index).await
    }

    async fn list_chunks(
        &self,
        token_id: TokenId,
        offset: u64,
        limit: u64,
    ) -> kinship_store::Result<Vec<kinship_core::StoryChunk>> {
        self.inner.list_chunks(token_id, offset, limit).await
    }

    async fn put_chunk(
        &self,
        chunk: &kinship_core::StoryChunk,
        meta: &kinship_core::StoryMetadata,
    ) -> kinship_store::Result<()> {
        self.inner.put_chunk(chunk, meta).await
    }

    async fn put_story_metadata(
        &self,
        meta: &kinship_core::StoryMetadata,
    ) -> kinship_store::Result<()> {
        self.inner.put_story_metadata(meta).await
    }
}

#[tokio::test]
async fn test_failed_endorsement_write_refunds_fee() {
    let bank = Arc::new(MemoryBank::new());
    let store = FailingEndorsementStore {
        inner: MemoryStore::new(),
    };
    let ledger = build_ledger(store, 10, bank.clone(), Arc::new(SubmitterOnly));
    let submitter = addr(1);
    let endorser = addr(2);
    bank.deposit(&endorser, 50);

    let info = person_info("Refunded", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", &submitter)
        .await
        .unwrap();

    let result = ledger.endorse(&person, 1, &endorser).await;
    assert!(matches!(result, Err(LedgerError::Store(_))));
    // The fee came back; no endorsement state exists anywhere.
    assert_eq!(bank.balance(&endorser), 50);
    assert_eq!(bank.balance(&submitter), 0);
    assert_eq!(ledger.endorsement_count(&person, 1).await.unwrap(), 0);
    assert!(!ledger.has_endorsed(&person, 1, &endorser).await.unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// Minting
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_mint_policy_and_replay() {
    let (ledger, _) = memory_ledger(0);
    let submitter = addr(1);

    let info = person_info("Minted One", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", &submitter)
        .await
        .unwrap();

    // SubmitterOnly rejects everyone else.
    let denied = ledger.mint(&person, 1, core_info("Minted One"), &addr(7)).await;
    assert!(matches!(denied, Err(LedgerError::MintNotAuthorized)));

    let token_id = ledger
        .mint(&person, 1, core_info("Minted One"), &submitter)
        .await
        .unwrap();
    assert_eq!(token_id, TokenId(1));

    let replay = ledger.mint(&person, 1, core_info("Minted One"), &submitter).await;
    assert!(matches!(replay, Err(LedgerError::AlreadyMinted(id)) if id == token_id));

    let token = ledger.get_token(token_id).await.unwrap();
    assert_eq!(token.owner, submitter);
    assert_eq!(token.core_info.full_name, "Minted One");
    assert_eq!(ledger.token_for_version(&person, 1).await.unwrap(), Some(token_id));
    assert_eq!(ledger.token_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_token_uri_owner_gated() {
    let (ledger, _) = memory_ledger(0);
    let submitter = addr(1);
    let info = person_info("Uri Person", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", &submitter)
        .await
        .unwrap();
    let token_id = ledger
        .mint(&person, 1, core_info("Uri Person"), &submitter)
        .await
        .unwrap();

    let denied = ledger
        .update_token_uri(token_id, "ipfs://meta", &addr(7))
        .await;
    assert!(matches!(denied, Err(LedgerError::NotTokenOwner)));

    ledger
        .update_token_uri(token_id, "ipfs://meta", &submitter)
        .await
        .unwrap();
    assert_eq!(ledger.get_token(token_id).await.unwrap().token_uri, "ipfs://meta");
}

// ─────────────────────────────────────────────────────────────────────────────
// Stories
// ─────────────────────────────────────────────────────────────────────────────

async fn minted_token(ledger: &Ledger<MemoryStore>, owner: &kinship_core::Address) -> TokenId {
    let info = person_info("Story Person", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "", "", owner)
        .await
        .unwrap();
    ledger
        .mint(&person, 1, core_info("Story Person"), owner)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_story_lifecycle() {
    let (ledger, _) = memory_ledger(0);
    let owner = addr(1);
    let token_id = minted_token(&ledger, &owner).await;

    ledger
        .add_chunk(token_id, 0, "She was born in Dublin.", ChunkKind::Text, "", None, &owner)
        .await
        .unwrap();
    ledger
        .add_chunk(token_id, 1, "She kept bees.", ChunkKind::Text, "", None, &owner)
        .await
        .unwrap();

    // Appends must be contiguous.
    let skipped = ledger
        .add_chunk(token_id, 5, "gap", ChunkKind::Text, "", None, &owner)
        .await;
    assert!(matches!(
        skipped,
        Err(LedgerError::ChunkIndexOutOfOrder { expected: 2, got: 5 })
    ));

    // Edit recomputes total length from old and new content.
    let before = ledger.story_metadata(token_id).await.unwrap();
    ledger
        .update_chunk(token_id, 1, "She kept bees and hens.", ChunkKind::Text, "", None, &owner)
        .await
        .unwrap();
    let after = ledger.story_metadata(token_id).await.unwrap();
    assert_eq!(
        after.total_length,
        before.total_length - "She kept bees.".len() as u64
            + "She kept bees and hens.".len() as u64
    );
    assert_eq!(after.total_chunks, 2);

    let sealed_hash = ledger.seal_story(token_id, &owner).await.unwrap();
    let meta = ledger.story_metadata(token_id).await.unwrap();
    assert!(meta.is_sealed);
    assert_eq!(meta.full_story_hash, Some(sealed_hash));

    // Frozen after seal.
    let frozen = ledger
        .add_chunk(token_id, 2, "more", ChunkKind::Text, "", None, &owner)
        .await;
    assert!(matches!(frozen, Err(LedgerError::StorySealed)));
    let edit = ledger
        .update_chunk(token_id, 0, "rewrite", ChunkKind::Text, "", None, &owner)
        .await;
    assert!(matches!(edit, Err(LedgerError::StorySealed)));

    let report = ledger.verify_story_chunks(token_id).await.unwrap();
    assert!(report.is_intact());
    assert_eq!(report.hash_matches, Some(true));
}

#[tokio::test]
async fn test_story_guards() {
    let (ledger, _) = memory_ledger(0);
    let owner = addr(1);
    let token_id = minted_token(&ledger, &owner).await;

    let not_owner = ledger
        .add_chunk(token_id, 0, "text", ChunkKind::Text, "", None, &addr(7))
        .await;
    assert!(matches!(not_owner, Err(LedgerError::NotTokenOwner)));

    let empty = ledger
        .add_chunk(token_id, 0, "", ChunkKind::Text, "", None, &owner)
        .await;
    assert!(matches!(empty, Err(LedgerError::EmptyChunk)));

    let oversize = "x".repeat(1001);
    let too_long = ledger
        .add_chunk(token_id, 0, &oversize, ChunkKind::Text, "", None, &owner)
        .await;
    assert!(matches!(too_long, Err(LedgerError::ChunkTooLong { len: 1001, .. })));

    let wrong_hash = ledger
        .add_chunk(
            token_id,
            0,
            "text",
            ChunkKind::Text,
            "",
            Some(StoryHash::from_bytes([0xab; 32])),
            &owner,
        )
        .await;
    assert!(matches!(wrong_hash, Err(LedgerError::ChunkHashMismatch)));

    let empty_seal = ledger.seal_story(token_id, &owner).await;
    assert!(matches!(empty_seal, Err(LedgerError::EmptyStory)));

    let missing = ledger
        .add_chunk(TokenId(99), 0, "text", ChunkKind::Text, "", None, &owner)
        .await;
    assert!(matches!(missing, Err(LedgerError::TokenNotFound)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_events_published_in_order() {
    let (ledger, bank) = memory_ledger(10);
    let submitter = addr(1);
    let endorser = addr(2);
    bank.deposit(&endorser, 100);
    let mut rx = ledger.subscribe();

    let parent_info = person_info("Event Parent", 1870);
    let parent = kinship_core::compute_person_hash(&parent_info).unwrap();
    ledger
        .add_version(
            &parent_info,
            ParentLink::NONE,
            ParentLink::NONE,
            "",
            "",
            &submitter,
        )
        .await
        .unwrap();

    let info = person_info("Event Person", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    ledger
        .add_version(
            &info,
            ParentLink::new(parent, 1),
            ParentLink::NONE,
            "census-1901",
            "cid-1",
            &submitter,
        )
        .await
        .unwrap();
    ledger.endorse(&person, 1, &endorser).await.unwrap();
    let token_id = ledger
        .mint(&person, 1, core_info("Event Person"), &submitter)
        .await
        .unwrap();
    ledger
        .add_chunk(token_id, 0, "first words", ChunkKind::Text, "", None, &submitter)
        .await
        .unwrap();

    match rx.try_recv().unwrap() {
        LedgerEvent::VersionAdded {
            person_hash,
            version_index,
            father,
            mother,
            added_by,
            ..
        } => {
            assert_eq!(person_hash, parent);
            assert_eq!(version_index, 1);
            assert_eq!(father, ParentLink::NONE);
            assert_eq!(mother, ParentLink::NONE);
            assert_eq!(added_by, submitter);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // The second addition carries its full linkage, so a subscriber can
    // grow the ancestry graph without querying back.
    match rx.try_recv().unwrap() {
        LedgerEvent::VersionAdded {
            person_hash,
            father,
            mother,
            tag,
            metadata_cid,
            ..
        } => {
            assert_eq!(person_hash, person);
            assert_eq!(father, ParentLink::new(parent, 1));
            assert_eq!(mother, ParentLink::NONE);
            assert_eq!(tag, "census-1901");
            assert_eq!(metadata_cid, "cid-1");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    assert_eq!(
        rx.try_recv().unwrap(),
        LedgerEvent::Endorsed {
            person_hash: person,
            version_index: 1,
            endorser,
            fee: 10,
        }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        LedgerEvent::Minted {
            token_id,
            person_hash: person,
            version_index: 1,
            owner: submitter,
        }
    );

    match rx.try_recv().unwrap() {
        LedgerEvent::ChunkAdded {
            token_id: event_token,
            chunk_index,
            last_editor,
            content_len,
            ..
        } => {
            assert_eq!(event_token, token_id);
            assert_eq!(chunk_index, 0);
            assert_eq!(last_editor, submitter);
            assert_eq!(content_len, "first words".len() as u64);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend parity
// ─────────────────────────────────────────────────────────────────────────────

async fn run_sequence<S: Store>(ledger: &Ledger<S>) -> Vec<String> {
    let submitter = addr(1);
    let info = person_info("Parity Person", 1900);
    let person = kinship_core::compute_person_hash(&info).unwrap();
    let mut log = Vec::new();

    let index = ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "t", "", &submitter)
        .await
        .unwrap();
    log.push(format!("version:{index}"));

    let dup = ledger
        .add_version(&info, ParentLink::NONE, ParentLink::NONE, "t", "", &submitter)
        .await;
    log.push(format!("dup:{}", dup.is_err()));

    let token_id = ledger
        .mint(&person, 1, core_info("Parity Person"), &submitter)
        .await
        .unwrap();
    log.push(format!("token:{}", token_id.value()));

    ledger
        .add_chunk(token_id, 0, "chunk zero", ChunkKind::Text, "", None, &submitter)
        .await
        .unwrap();
    let sealed = ledger.seal_story(token_id, &submitter).await.unwrap();
    log.push(format!("sealed:{}", sealed.to_hex()));

    let report = ledger.verify_story_chunks(token_id).await.unwrap();
    log.push(format!("intact:{}", report.is_intact()));
    log
}

#[tokio::test]
async fn test_backend_parity() {
    let bank1 = Arc::new(MemoryBank::new());
    let memory = build_ledger(MemoryStore::new(), 0, bank1, Arc::new(Open));
    let bank2 = Arc::new(MemoryBank::new());
    let sqlite = build_ledger(
        SqliteStore::open_memory().unwrap(),
        0,
        bank2,
        Arc::new(Open),
    );

    let memory_log = run_sequence(&memory).await;
    let sqlite_log = run_sequence(&sqlite).await;
    assert_eq!(memory_log, sqlite_log);
}
