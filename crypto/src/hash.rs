//! Blake2b hashing for proposal content and timelock batches.
//!
//! Identities are pure functions of content. Each derivation is prefixed with
//! a distinct domain tag so a proposal id can never collide with a schedule id
//! computed over the same bytes.

use agora_types::{DescriptionHash, ProposalId, ScheduleId};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

const PROPOSAL_DOMAIN: &[u8] = b"agora/proposal/v1";
const SCHEDULE_DOMAIN: &[u8] = b"agora/schedule/v1";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash a proposal description to its `DescriptionHash`.
pub fn hash_description(description: &str) -> DescriptionHash {
    DescriptionHash::new(blake2b_256(description.as_bytes()))
}

/// Derive a proposal id from the canonical encoding of its actions and its
/// description hash.
pub fn derive_proposal_id(encoded_actions: &[u8], description: &DescriptionHash) -> ProposalId {
    ProposalId::new(blake2b_256_multi(&[
        PROPOSAL_DOMAIN,
        encoded_actions,
        description.as_bytes(),
    ]))
}

/// Derive the id of a batch scheduled on the execution queue.
///
/// The description hash doubles as the salt, so two batches with identical
/// actions but different descriptions schedule independently.
pub fn derive_schedule_id(encoded_actions: &[u8], salt: &DescriptionHash) -> ScheduleId {
    ScheduleId::new(blake2b_256_multi(&[
        SCHEDULE_DOMAIN,
        encoded_actions,
        salt.as_bytes(),
    ]))
}
