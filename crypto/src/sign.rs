//! Ed25519 message signing and verification.

use covenant_types::{PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

/// Sign a message with a private key, returning the signature.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(message).to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Uses strict verification, which rejects small-order keys and
/// non-canonical signatures so a signature has exactly one valid encoding.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify_strict(message, &dalek_sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::signing_digest;
    use crate::keys::keypair_from_seed;
    use covenant_types::ChainId;

    #[test]
    fn digest_signature_is_bound_to_chain() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let tx = b"withdraw_vesting alice";
        let main = signing_digest(&ChainId::new([1; 32]), tx);
        let test = signing_digest(&ChainId::new([2; 32]), tx);
        let sig = sign_message(&main, &kp.private);
        assert!(verify_signature(&main, &sig, &kp.public));
        assert!(!verify_signature(&test, &sig, &kp.public));
    }

    #[test]
    fn other_signer_fails() {
        let alice = keypair_from_seed(&[1u8; 32]);
        let bob = keypair_from_seed(&[2u8; 32]);
        let sig = sign_message(b"claim_reward_balance", &alice.private);
        assert!(!verify_signature(b"claim_reward_balance", &sig, &bob.public));
        assert_eq!(sig, sign_message(b"claim_reward_balance", &alice.private));
    }

    #[test]
    fn malformed_or_small_order_keys_fail() {
        let kp = keypair_from_seed(&[5u8; 32]);
        let sig = sign_message(b"test", &kp.private);
        assert!(!verify_signature(b"test", &sig, &PublicKey([0xFF; 32])));
        // The identity point decodes but has small order.
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(!verify_signature(b"test", &sig, &PublicKey(identity)));
    }
}
