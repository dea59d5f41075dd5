//! Cryptographic primitives for the Covenant governance core.
//!
//! - **Ed25519** for signing transactions and verifying signer keys
//! - **Blake2b** for transaction ids and signing digests
//! - Deterministic per-role key derivation for genesis and tests

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi, signing_digest, transaction_id};
pub use keys::{
    derive_role_keypair, generate_keypair, keypair_from_private, keypair_from_seed,
    public_from_private,
};
pub use sign::{sign_message, verify_signature};
