//! Blake2b hashing for transaction ids and signing digests.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use covenant_types::{ChainId, TransactionId};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
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

/// The digest signers commit to: the chain id followed by the encoded transaction.
pub fn signing_digest(chain_id: &ChainId, tx_bytes: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[chain_id.as_bytes(), tx_bytes])
}

/// Identifier of an encoded transaction, independent of the chain id.
pub fn transaction_id(tx_bytes: &[u8]) -> TransactionId {
    TransactionId::new(blake2b_256(tx_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        assert_eq!(blake2b_256(b"hello covenant"), blake2b_256(b"hello covenant"));
    }

    #[test]
    fn multi_matches_concatenation() {
        let joined = blake2b_256(b"alicebob");
        let parts = blake2b_256_multi(&[b"alice", b"bob"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn chain_id_separates_digests() {
        let tx = b"same transaction bytes";
        let a = signing_digest(&ChainId::new([1; 32]), tx);
        let b = signing_digest(&ChainId::new([2; 32]), tx);
        assert_ne!(a, b);
    }
}
