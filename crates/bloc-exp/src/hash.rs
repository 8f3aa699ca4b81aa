use bloc_core::errors::VoteError;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::serde::to_canonical_json_bytes;

/// SHA-256 of the canonical JSON encoding of `value`, as lowercase hex.
///
/// Two values that serialize to the same JSON hash the same even when their
/// maps were built in different orders.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, VoteError> {
    let mut hasher = Sha256::new();
    hasher.update(to_canonical_json_bytes(value)?);
    Ok(hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect())
}
