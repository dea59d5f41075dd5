//! Ed25519 key generation and derivation.

use crate::hash::blake2b_256_multi;
use covenant_types::{AccountName, AuthorityTier, KeyPair, PrivateKey, PublicKey};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

/// Generate a new Ed25519 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    keypair_from_signing_key(SigningKey::generate(&mut OsRng))
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_from_signing_key(SigningKey::from_bytes(seed))
}

/// Derive the key an account uses for one authority tier from a shared secret.
///
/// Genesis files and test fixtures use this so that every tier of every
/// account gets a distinct, reproducible key.
pub fn derive_role_keypair(secret: &[u8], account: &AccountName, tier: AuthorityTier) -> KeyPair {
    let role = tier.to_string();
    let seed = blake2b_256_multi(&[secret, account.as_str().as_bytes(), role.as_bytes()]);
    keypair_from_seed(&seed)
}

fn keypair_from_signing_key(signing_key: SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}
