//! Canonical serialization for deterministic fingerprints.
//!
//! Graphs, embeddings and policies are fingerprinted by hashing their
//! canonical JSON form.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - Stable Vec order: Vectors serialize in index order
//! - No HashMap allowed: Use BTreeMap for maps in hashed data

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_determinism() {
        let mut rotations: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        rotations.insert(2, vec![1, 3]);
        rotations.insert(1, vec![2]);

        let h1 = canonical_hash(&rotations);
        let h2 = canonical_hash(&rotations.clone());
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(canonical_hash(&vec![1, 2, 3]), canonical_hash(&vec![1, 3, 2]));
        assert_eq!(canonical_hash_hex(&vec![1, 2]).len(), 16);
    }
}
