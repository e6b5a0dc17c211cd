//! Golden person-identity vectors for deterministic verification.
//!
//! These vectors ensure that the packed identity encoding and its hash
//! stay stable across versions: two builds disagreeing on any vector
//! have diverged on the wire format.

use kinship_core::{
    compute_person_hash, join_limbs, split_limbs, Gender, NameHash, PersonBasicInfo, PersonHash,
};

/// A golden identity vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Clear-text name fed to the name hash.
    pub person_name: &'static str,
    /// Optional name salt.
    pub salt: Option<&'static [u8]>,
    pub is_birth_bc: bool,
    pub birth_year: u16,
    pub birth_month: u8,
    pub birth_day: u8,
    pub gender: Gender,
    /// Expected person hash (hex); empty until pinned from a trusted run.
    pub expected_person_hash: &'static str,
}

/// Get all golden identity vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "complete record",
            person_name: "Brigid Moran",
            salt: None,
            is_birth_bc: false,
            birth_year: 1888,
            birth_month: 4,
            birth_day: 23,
            gender: Gender::Female,
            expected_person_hash: "",
        },
        GoldenVector {
            name: "unknown month and day",
            person_name: "Tomas Moran",
            salt: None,
            is_birth_bc: false,
            birth_year: 1850,
            birth_month: 0,
            birth_day: 0,
            gender: Gender::Male,
            expected_person_hash: "",
        },
        GoldenVector {
            name: "BC date",
            person_name: "Eldest Ancestor",
            salt: None,
            is_birth_bc: true,
            birth_year: 300,
            birth_month: 1,
            birth_day: 1,
            gender: Gender::Unknown,
            expected_person_hash: "",
        },
        GoldenVector {
            name: "salted name",
            person_name: "Brigid Moran",
            salt: Some(b"family-pepper"),
            is_birth_bc: false,
            birth_year: 1888,
            birth_month: 4,
            birth_day: 23,
            gender: Gender::Female,
            expected_person_hash: "",
        },
        GoldenVector {
            name: "year boundary",
            person_name: "Future Person",
            salt: None,
            is_birth_bc: false,
            birth_year: 9999,
            birth_month: 12,
            birth_day: 31,
            gender: Gender::Other,
            expected_person_hash: "",
        },
    ]
}

/// Build the info struct for a vector.
pub fn info_from_vector(vector: &GoldenVector) -> PersonBasicInfo {
    PersonBasicInfo {
        name_hash: NameHash::derive(vector.person_name, vector.salt),
        is_birth_bc: vector.is_birth_bc,
        birth_year: vector.birth_year,
        birth_month: vector.birth_month,
        birth_day: vector.birth_day,
        gender: vector.gender,
    }
}

/// Compute the person hash for a vector.
pub fn hash_from_vector(vector: &GoldenVector) -> PersonHash {
    // All vectors are valid by construction.
    compute_person_hash(&info_from_vector(vector)).unwrap()
}

/// Verify every vector: determinism, limb round-trip, and the pinned
/// hash when one is recorded.
///
/// Returns `(name, passed, detail)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|vector| {
            let hash = hash_from_vector(vector);
            let again = hash_from_vector(vector);
            if hash != again {
                return (vector.name.to_string(), false, "not deterministic".to_string());
            }

            let (hi, lo) = split_limbs(&hash);
            if join_limbs(hi, lo) != hash {
                return (vector.name.to_string(), false, "limb round-trip failed".to_string());
            }

            if !vector.expected_person_hash.is_empty()
                && hash.to_hex() != vector.expected_person_hash
            {
                return (
                    vector.name.to_string(),
                    false,
                    format!("expected {}, got {}", vector.expected_person_hash, hash.to_hex()),
                );
            }

            (vector.name.to_string(), true, hash.to_hex())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_vectors_verify() {
        for (name, passed, detail) in verify_all_vectors() {
            assert!(passed, "vector {name} failed: {detail}");
        }
    }

    #[test]
    fn test_vectors_are_distinct() {
        let hashes: HashSet<String> = all_vectors()
            .iter()
            .map(|v| hash_from_vector(v).to_hex())
            .collect();
        assert_eq!(hashes.len(), all_vectors().len());
    }

    #[test]
    fn test_salt_changes_hash() {
        let vectors = all_vectors();
        // "complete record" and "salted name" differ only in the salt.
        let plain = hash_from_vector(&vectors[0]);
        let salted = hash_from_vector(&vectors[3]);
        assert_ne!(plain, salted);
    }
}
