//! Template revision hashing.
//!
//! A group's revision label is derived from the leader/worker template that
//! produced it. Changing any part of the template yields a new revision, and
//! therefore a new group key and a new constraint group.

use sha2::{Digest, Sha256};

use crate::error::CoreResult;
use crate::types::LeaderWorkerTemplate;

/// Hex-encoded prefix (8 bytes) of the SHA-256 of the template's JSON form.
///
/// `serde_json` is built without `preserve_order`, so object keys serialize
/// in sorted order and the digest does not depend on manifest key order.
pub fn revision_hash(template: &LeaderWorkerTemplate) -> CoreResult<String> {
    let bytes = serde_json::to_vec(template)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(&digest[..8]))
}
