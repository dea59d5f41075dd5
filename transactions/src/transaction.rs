//! Transaction envelope, signing digest and signatures.

use crate::authorities::required_authorities;
use crate::Operation;
use covenant_authority::{collect_signers, RequiredAuthorities};
use covenant_crypto::{sign_message, signing_digest, transaction_id};
use covenant_types::{ChainId, KeyPair, LedgerError, PublicKey, Signature, Timestamp, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An ordered batch of operations applied atomically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub expiration: Timestamp,
    pub operations: Vec<Operation>,
    pub extensions: Vec<String>,
}

impl Transaction {
    pub fn new(expiration: Timestamp, operations: Vec<Operation>) -> Self {
        Self {
            expiration,
            operations,
            extensions: Vec::new(),
        }
    }

    /// Canonical binary encoding. Signatures commit to these bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    pub fn digest(&self, chain_id: &ChainId) -> Result<[u8; 32], LedgerError> {
        Ok(signing_digest(chain_id, &self.to_bytes()?))
    }

    pub fn id(&self) -> Result<TransactionId, LedgerError> {
        Ok(transaction_id(&self.to_bytes()?))
    }

    /// Union of the authorities every operation needs.
    pub fn required_authorities(&self) -> RequiredAuthorities {
        let mut required = RequiredAuthorities::new();
        for op in &self.operations {
            required.merge(required_authorities(op));
        }
        required
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub signer: PublicKey,
    pub signature: Signature,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signatures: Vec<TransactionSignature>,
}

impl SignedTransaction {
    /// Sign `transaction` with every key in `keys`.
    pub fn sign(
        transaction: Transaction,
        chain_id: &ChainId,
        keys: &[&KeyPair],
    ) -> Result<Self, LedgerError> {
        let digest = transaction.digest(chain_id)?;
        let signatures = keys
            .iter()
            .map(|kp| TransactionSignature {
                signer: kp.public,
                signature: sign_message(&digest, &kp.private),
            })
            .collect();
        Ok(Self {
            transaction,
            signatures,
        })
    }

    /// Verify every signature and return the set of signing keys.
    pub fn signers(&self, chain_id: &ChainId) -> Result<BTreeSet<PublicKey>, LedgerError> {
        let digest = self.transaction.digest(chain_id)?;
        let signers = collect_signers(
            &digest,
            self.signatures.iter().map(|s| (&s.signer, &s.signature)),
        )?;
        Ok(signers)
    }

    pub fn id(&self) -> Result<TransactionId, LedgerError> {
        self.transaction.id()
    }

    /// Drop signatures whose key appears earlier in the list.
    pub fn dedup_signatures(&mut self) {
        let mut seen = BTreeSet::new();
        self.signatures.retain(|s| seen.insert(s.signer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::witness::AccountWitnessVoteOp;
    use covenant_crypto::keypair_from_seed;
    use covenant_types::{AccountName, AuthorityError};

    fn vote_tx() -> Transaction {
        Transaction::new(
            Timestamp::new(1_000),
            vec![Operation::AccountWitnessVote(AccountWitnessVoteOp {
                account: AccountName::new("alice").unwrap(),
                witness: AccountName::new("bob").unwrap(),
                approve: true,
            })],
        )
    }

    #[test]
    fn signers_recovered_from_signatures() {
        let chain = ChainId::new([3; 32]);
        let key = keypair_from_seed(&[1; 32]);
        let signed = SignedTransaction::sign(vote_tx(), &chain, &[&key]).unwrap();
        let signers = signed.signers(&chain).unwrap();
        assert_eq!(signers.into_iter().collect::<Vec<_>>(), vec![key.public]);
    }

    #[test]
    fn signature_does_not_transfer_across_chains() {
        let key = keypair_from_seed(&[1; 32]);
        let signed = SignedTransaction::sign(vote_tx(), &ChainId::new([3; 32]), &[&key]).unwrap();
        assert_eq!(
            signed.signers(&ChainId::new([4; 32])),
            Err(AuthorityError::InvalidSignature.into())
        );
    }

    #[test]
    fn id_ignores_chain_but_digest_does_not() {
        let tx = vote_tx();
        assert_ne!(
            tx.digest(&ChainId::new([1; 32])).unwrap(),
            tx.digest(&ChainId::new([2; 32])).unwrap()
        );
        let mut other = tx.clone();
        other.expiration = Timestamp::new(1_001);
        assert_ne!(tx.id().unwrap(), other.id().unwrap());
    }

    #[test]
    fn dedup_keeps_first_signature() {
        let chain = ChainId::new([3; 32]);
        let key = keypair_from_seed(&[1; 32]);
        let mut signed = SignedTransaction::sign(vote_tx(), &chain, &[&key, &key]).unwrap();
        assert_eq!(
            signed.signers(&chain),
            Err(AuthorityError::DuplicateSignature.into())
        );
        signed.dedup_signatures();
        assert_eq!(signed.signers(&chain).unwrap().len(), 1);
    }
}
