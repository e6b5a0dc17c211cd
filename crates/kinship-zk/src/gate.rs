//! The proof gate: structural validation followed by verifier dispatch.
//!
//! The gate never trusts a proof's public signals until they pass the
//! structural checks in [`crate::signals`], and never mutates anything:
//! it returns the extracted lineage hashes for the ledger to act on.

use std::fmt;
use std::sync::Arc;

use kinship_core::{Address, PersonHash};

use crate::error::ZkError;
use crate::signals::{validate_signals, Signal};

/// An opaque serialized proof, produced off-process by a prover.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofBytes(pub Vec<u8>);

impl ProofBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ProofBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProofBytes({} bytes)", self.0.len())
    }
}

/// Capability interface over the underlying proof system.
///
/// The real implementation is a pairing-check verifier living outside
/// this crate; the gate only needs a boolean verdict. Implementations
/// must be pure with respect to ledger state.
pub trait ProofVerifier: Send + Sync {
    /// Verify `proof` against the public signals.
    ///
    /// `Ok(false)` means the proof is cryptographically invalid;
    /// `Err` means the verifier itself failed (bad key material, etc).
    fn verify(&self, proof: &ProofBytes, signals: &[Signal]) -> Result<bool, String>;
}

/// The lineage hashes vouched for by a verified proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedLineage {
    pub person_hash: PersonHash,
    /// `None` when the proof asserted no father.
    pub father_hash: Option<PersonHash>,
    /// `None` when the proof asserted no mother.
    pub mother_hash: Option<PersonHash>,
    /// The address the proof is bound to.
    pub submitter: Address,
}

/// Validates proof submissions before the ledger trusts their signals.
#[derive(Clone)]
pub struct ZkGate {
    verifier: Arc<dyn ProofVerifier>,
}

impl ZkGate {
    /// Create a gate over the given verifier implementation.
    pub fn new(verifier: Arc<dyn ProofVerifier>) -> Self {
        Self { verifier }
    }

    /// Validate signal structure, bind the submission to `submitter`, and
    /// only then invoke the cryptographic verifier.
    ///
    /// Check order is fixed: signal count, limb ranges, submitter
    /// binding, proof verification. The first failure wins and nothing
    /// downstream runs.
    pub fn verify_and_extract(
        &self,
        proof: &ProofBytes,
        signals: &[Signal],
        submitter: &Address,
    ) -> Result<VerifiedLineage, ZkError> {
        let extracted = validate_signals(signals, submitter)?;

        match self.verifier.verify(proof, signals) {
            Ok(true) => {}
            Ok(false) => return Err(ZkError::InvalidProof),
            Err(msg) => return Err(ZkError::VerifierFailure(msg)),
        }

        tracing::debug!(
            person = %extracted.person_hash,
            submitter = %submitter,
            "proof verified"
        );

        Ok(VerifiedLineage {
            person_hash: extracted.person_hash,
            father_hash: (!extracted.father_hash.is_zero()).then_some(extracted.father_hash),
            mother_hash: (!extracted.mother_hash.is_zero()).then_some(extracted.mother_hash),
            submitter: *submitter,
        })
    }
}

impl fmt::Debug for ZkGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ZkGate")
    }
}

/// A verifier with a fixed verdict, for tests and local development.
///
/// Plays the role SQLite's in-memory twin plays for storage: same
/// interface, no cryptography.
#[derive(Debug, Clone)]
pub struct MockVerifier {
    verdict: bool,
}

impl MockVerifier {
    /// Accepts every structurally valid submission.
    pub fn accepting() -> Self {
        Self { verdict: true }
    }

    /// Rejects every submission at the cryptographic step.
    pub fn rejecting() -> Self {
        Self { verdict: false }
    }
}

impl ProofVerifier for MockVerifier {
    fn verify(&self, _proof: &ProofBytes, _signals: &[Signal]) -> Result<bool, String> {
        Ok(self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::build_signals;
    use kinship_core::Keypair;

    fn gate(verdict: bool) -> ZkGate {
        let verifier = if verdict {
            MockVerifier::accepting()
        } else {
            MockVerifier::rejecting()
        };
        ZkGate::new(Arc::new(verifier))
    }

    fn setup() -> (PersonHash, Address, Vec<Signal>) {
        let person = PersonHash::from_bytes([0xaa; 32]);
        let submitter = Keypair::from_seed(&[0x33; 32]).address();
        let signals =
            build_signals(&person, &PersonHash::ZERO, &PersonHash::ZERO, &submitter).to_vec();
        (person, submitter, signals)
    }

    #[test]
    fn test_gate_accepts_valid_submission() {
        let (person, submitter, signals) = setup();
        let lineage = gate(true)
            .verify_and_extract(&ProofBytes::new(vec![1, 2, 3]), &signals, &submitter)
            .unwrap();

        assert_eq!(lineage.person_hash, person);
        assert_eq!(lineage.father_hash, None);
        assert_eq!(lineage.mother_hash, None);
        assert_eq!(lineage.submitter, submitter);
    }

    #[test]
    fn test_gate_rejects_bad_proof_after_structure() {
        let (_, submitter, signals) = setup();
        let result =
            gate(false).verify_and_extract(&ProofBytes::new(vec![0]), &signals, &submitter);
        assert!(matches!(result, Err(ZkError::InvalidProof)));
    }

    #[test]
    fn test_structural_failure_precedes_verifier() {
        // A rejecting verifier would yield InvalidProof; the count error
        // must win because it is checked first.
        let submitter = Keypair::from_seed(&[0x33; 32]).address();
        let short = vec![Signal::ZERO; 6];
        let result =
            gate(false).verify_and_extract(&ProofBytes::new(vec![0]), &short, &submitter);
        assert!(matches!(result, Err(ZkError::SignalCountMismatch { .. })));
    }

    #[test]
    fn test_verifier_failure_surfaces() {
        struct Broken;
        impl ProofVerifier for Broken {
            fn verify(&self, _: &ProofBytes, _: &[Signal]) -> Result<bool, String> {
                Err("verifying key missing".to_string())
            }
        }

        let (_, submitter, signals) = setup();
        let gate = ZkGate::new(Arc::new(Broken));
        let result = gate.verify_and_extract(&ProofBytes::new(vec![]), &signals, &submitter);
        assert!(matches!(result, Err(ZkError::VerifierFailure(_))));
    }

    #[test]
    fn test_asserted_parents_extracted() {
        let person = PersonHash::from_bytes([0x01; 32]);
        let father = PersonHash::from_bytes([0x02; 32]);
        let mother = PersonHash::from_bytes([0x03; 32]);
        let submitter = Keypair::from_seed(&[0x44; 32]).address();
        let signals = build_signals(&person, &father, &mother, &submitter);

        let lineage = gate(true)
            .verify_and_extract(&ProofBytes::new(vec![9]), &signals, &submitter)
            .unwrap();
        assert_eq!(lineage.father_hash, Some(father));
        assert_eq!(lineage.mother_hash, Some(mother));
    }
}
