//! Witnesses and the witness-vote index.

use crate::StoreError;
use covenant_types::{AccountName, PublicKey, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub owner: AccountName,
    pub url: String,
    pub signing_key: PublicKey,
    /// Weight of all direct voters plus what their proxiers pass up.
    pub votes: i64,
    pub created: Timestamp,
}

pub trait WitnessStore {
    fn find_witness(&self, owner: &AccountName) -> Result<Option<Witness>, StoreError>;
    fn put_witness(&mut self, witness: &Witness) -> Result<(), StoreError>;
    /// All witnesses ordered by owner name.
    fn iter_witnesses(&self) -> Result<Vec<Witness>, StoreError>;

    fn has_witness_vote(
        &self,
        account: &AccountName,
        witness: &AccountName,
    ) -> Result<bool, StoreError>;
    fn insert_witness_vote(
        &mut self,
        account: &AccountName,
        witness: &AccountName,
    ) -> Result<(), StoreError>;
    fn remove_witness_vote(
        &mut self,
        account: &AccountName,
        witness: &AccountName,
    ) -> Result<(), StoreError>;
    /// Witnesses approved by `account`, ordered by witness name.
    fn witness_votes_of(&self, account: &AccountName) -> Result<Vec<AccountName>, StoreError>;

    /// Highest vote total, ties broken by the lower name.
    fn top_witness(&self) -> Result<Option<Witness>, StoreError> {
        let mut best: Option<Witness> = None;
        for witness in self.iter_witnesses()? {
            let better = match &best {
                None => true,
                Some(b) => witness.votes > b.votes,
            };
            if better {
                best = Some(witness);
            }
        }
        Ok(best)
    }
}
