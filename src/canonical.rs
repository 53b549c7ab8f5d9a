//! Canonical serialization for deterministic fingerprints.
//!
//! Record payloads are opaque JSON values; the diff engine needs an
//! order-insensitive way to decide "did the content change". Serializing
//! through `serde_json` gives sorted object keys, so hashing the canonical
//! bytes is insensitive to object-key order while staying sensitive to
//! array order.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable object-key order: JSON maps serialize sorted by key
//! - No HashMap allowed: use BTreeMap for maps in hashed data

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("canonical serialization failed")
}

/// Compute the canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute the canonical hash and return it as a hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_determinism() {
        let v = json!({ "code": "COURTS", "description": "Court supervision" });
        assert_eq!(canonical_hash(&v), canonical_hash(&v));
    }

    #[test]
    fn test_object_key_order_is_irrelevant() {
        let a: serde_json::Value =
            serde_json::from_str(r#"{"code":"JAIL","rank":2}"#).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(r#"{"rank":2,"code":"JAIL"}"#).unwrap();
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn test_array_order_matters() {
        let a = json!(["b1", "b2"]);
        let b = json!(["b2", "b1"]);
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }
}
