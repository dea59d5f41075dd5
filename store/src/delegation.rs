//! Vesting delegations and their delayed returns.

use crate::StoreError;
use covenant_types::{AccountName, Timestamp};
use serde::{Deserialize, Serialize};

/// A live delegation. At most one per (delegator, delegatee) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingDelegation {
    pub delegator: AccountName,
    pub delegatee: AccountName,
    pub vesting_shares: i64,
    pub created: Timestamp,
}

/// Shares of a cancelled delegation still reserved against the delegator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingDelegationExpiration {
    /// Insertion sequence; breaks ties between records expiring together.
    pub id: u64,
    pub delegator: AccountName,
    pub vesting_shares: i64,
    pub expiration: Timestamp,
}

pub trait DelegationStore {
    fn find_delegation(
        &self,
        delegator: &AccountName,
        delegatee: &AccountName,
    ) -> Result<Option<VestingDelegation>, StoreError>;
    fn put_delegation(&mut self, delegation: &VestingDelegation) -> Result<(), StoreError>;
    fn remove_delegation(
        &mut self,
        delegator: &AccountName,
        delegatee: &AccountName,
    ) -> Result<(), StoreError>;
    /// All live delegations ordered by (delegator, delegatee).
    fn iter_delegations(&self) -> Result<Vec<VestingDelegation>, StoreError>;

    /// Store a new expiration, assigning its id.
    fn insert_expiration(
        &mut self,
        delegator: &AccountName,
        vesting_shares: i64,
        expiration: Timestamp,
    ) -> Result<VestingDelegationExpiration, StoreError>;
    /// The earliest expiration by (expiration, id).
    fn first_expiration(&self) -> Result<Option<VestingDelegationExpiration>, StoreError>;
    fn remove_expiration(&mut self, expiration: &VestingDelegationExpiration)
        -> Result<(), StoreError>;
    /// All pending expirations ordered by (expiration, id).
    fn iter_expirations(&self) -> Result<Vec<VestingDelegationExpiration>, StoreError>;
}
