//! Signature checks against the transaction digest.

use covenant_crypto::verify_signature;
use covenant_types::{AuthorityError, PublicKey, Signature};
use std::collections::BTreeSet;

/// Verify each (key, signature) pair against `digest` and return the signer set.
///
/// A key that appears twice is rejected before any signature is verified.
pub fn collect_signers<'a>(
    digest: &[u8; 32],
    signatures: impl IntoIterator<Item = (&'a PublicKey, &'a Signature)>,
) -> Result<BTreeSet<PublicKey>, AuthorityError> {
    let pairs: Vec<_> = signatures.into_iter().collect();
    let mut signers = BTreeSet::new();
    for (key, _) in &pairs {
        if !signers.insert(**key) {
            return Err(AuthorityError::DuplicateSignature);
        }
    }
    for (key, signature) in pairs {
        if !verify_signature(digest, signature, key) {
            return Err(AuthorityError::InvalidSignature);
        }
    }
    Ok(signers)
}
