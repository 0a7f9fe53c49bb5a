//! Canonical JSON encoding and stable hashing.
//!
//! Documents are hashed after a round trip through `serde_json::Value`, whose
//! object representation keeps keys sorted, so the digest is independent of
//! struct field order.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::errors::{EmodError, ErrorInfo};

/// Encodes any serializable payload to canonical (key-sorted) JSON bytes.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, EmodError> {
    let value: Value = serde_json::to_value(value)
        .map_err(|err| EmodError::Io(ErrorInfo::new("canon-encode", err.to_string())))?;
    serde_json::to_vec(&value)
        .map_err(|err| EmodError::Io(ErrorInfo::new("canon-encode", err.to_string())))
}

/// Computes a stable hexadecimal SHA-256 hash for the provided payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, EmodError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}
