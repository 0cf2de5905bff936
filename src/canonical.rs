//! Canonical encoding for fingerprints.
//!
//! Values are encoded as compact JSON (fields in declaration order, vectors in
//! index order) and hashed with xxh64. Anything hashed here must avoid
//! `HashMap` so that the encoding is stable between runs.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Seed for all fingerprints.
const FINGERPRINT_SEED: u64 = 0;

/// Encode a value as canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// xxh64 of the canonical encoding, as 16 lowercase hex digits.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = to_canonical_bytes(value)?;
    Ok(format!("{:016x}", xxh64(&bytes, FINGERPRINT_SEED)))
}
