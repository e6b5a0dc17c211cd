//! Proptest generators for property-based testing.

use proptest::prelude::*;

use kinship_core::{
    compute_person_hash, join_limbs, split_limbs, Address, Gender, Keypair, NameHash,
    PersonBasicInfo, PersonHash,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

/// Generate a random PersonHash.
pub fn person_hash() -> impl Strategy<Value = PersonHash> {
    any::<[u8; 32]>().prop_map(PersonHash::from_bytes)
}

/// Generate a non-zero NameHash (a real derived hash).
pub fn name_hash() -> impl Strategy<Value = NameHash> {
    "[A-Z][a-z]{1,15}( [A-Z][a-z]{1,15})?".prop_map(|name| NameHash::derive(&name, None))
}

/// Generate a Gender.
pub fn gender() -> impl Strategy<Value = Gender> {
    prop_oneof![
        Just(Gender::Unknown),
        Just(Gender::Male),
        Just(Gender::Female),
        Just(Gender::Other),
    ]
}

/// Generate a valid PersonBasicInfo (passes validation).
pub fn person_info() -> impl Strategy<Value = PersonBasicInfo> {
    (
        name_hash(),
        any::<bool>(),
        0u16..=9999,
        0u8..=12,
        0u8..=31,
        gender(),
    )
        .prop_map(
            |(name_hash, is_birth_bc, birth_year, birth_month, birth_day, gender)| {
                PersonBasicInfo {
                    name_hash,
                    is_birth_bc,
                    birth_year,
                    birth_month,
                    birth_day,
                    gender,
                }
            },
        )
}

/// Generate a tag within the byte-length bound.
pub fn tag() -> impl Strategy<Value = String> {
    "[a-z0-9-]{0,64}".prop_map(String::from)
}
