//! Hashing primitives for the agora governance engine.
//!
//! - **Blake2b-256** for description hashes, proposal ids and schedule ids
//! - Domain-separated derivations so distinct identities never collide

pub mod hash;

pub use hash::{
    blake2b_256, blake2b_256_multi, derive_proposal_id, derive_schedule_id, hash_description,
};
