//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use kinship_core::{
    compute_person_hash, Address, Gender, Keypair, NameHash, ParentLink, PersonBasicInfo,
    PersonHash,
};
use kinship_ledger::{
    FlatFee, Ledger, LedgerConfig, MemoryBank, MintPolicy, SubmitterOnly, ValueTransfer,
};
use kinship_store::MemoryStore;
use kinship_zk::{build_signals, MockVerifier, ProofBytes, Signal, ZkGate, SIGNAL_COUNT};

/// A test fixture with a keypair, a funded in-memory bank, and a ledger
/// over a memory store with an accepting mock verifier.
pub struct TestFixture {
    pub keypair: Keypair,
    pub bank: Arc<MemoryBank>,
    pub ledger: Ledger<MemoryStore>,
}

impl TestFixture {
    /// Create a fixture with a zero endorsement fee.
    pub fn new() -> Self {
        Self::with_fee(0)
    }

    /// Create a fixture charging `fee` per endorsement, with the default
    /// submitter-only mint policy.
    pub fn with_fee(fee: u64) -> Self {
        Self::with_fee_and_policy(fee, Arc::new(SubmitterOnly))
    }

    /// Create a fixture with an explicit fee and mint policy.
    pub fn with_fee_and_policy(fee: u64, policy: Arc<dyn MintPolicy>) -> Self {
        let bank = Arc::new(MemoryBank::new());
        let ledger = Ledger::new(
            MemoryStore::new(),
            ZkGate::new(Arc::new(MockVerifier::accepting())),
            Arc::new(FlatFee(fee)),
            bank.clone() as Arc<dyn ValueTransfer>,
            policy,
            LedgerConfig::default(),
        );
        Self {
            keypair: Keypair::from_seed(&[0x42; 32]),
            bank,
            ledger,
        }
    }

    /// The fixture keypair's address.
    pub fn address(&self) -> Address {
        self.keypair.address()
    }

    /// A valid person info for `name`, deterministic given the inputs.
    pub fn person_info(&self, name: &str, birth_year: u16) -> PersonBasicInfo {
        PersonBasicInfo {
            name_hash: NameHash::derive(name, None),
            is_birth_bc: false,
            birth_year,
            birth_month: 1,
            birth_day: 1,
            gender: Gender::Unknown,
        }
    }

    /// Submit a parentless version for `name` and return its person hash.
    pub async fn add_person(&self, name: &str, birth_year: u16) -> PersonHash {
        let info = self.person_info(name, birth_year);
        self.ledger
            .add_version(
                &info,
                ParentLink::NONE,
                ParentLink::NONE,
                "",
                "",
                &self.address(),
            )
            .await
            .unwrap();
        compute_person_hash(&info).unwrap()
    }

    /// Public signals for a proof bound to this fixture's address.
    pub fn signals_for(
        &self,
        person: &PersonHash,
        father: &PersonHash,
        mother: &PersonHash,
    ) -> [Signal; SIGNAL_COUNT] {
        build_signals(person, father, mother, &self.address())
    }

    /// An opaque stand-in proof accepted by the mock verifier.
    pub fn dummy_proof(&self) -> ProofBytes {
        ProofBytes::new(vec![0xab; 16])
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic distinct addresses for multi-party tests.
pub fn party_addresses(count: usize) -> Vec<Address> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0xa5;
            Keypair::from_seed(&seed).address()
        })
        .collect()
}
