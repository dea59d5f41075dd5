//! Account recovery requests, recovery-partner changes and owner history.

use crate::StoreError;
use covenant_types::{AccountName, Authority, Timestamp};
use serde::{Deserialize, Serialize};

/// A pending request by the recovery partner to reset an owner authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecoveryRequest {
    pub account_to_recover: AccountName,
    pub new_owner_authority: Authority,
    pub expires: Timestamp,
}

/// A recovery-partner change waiting out its delay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecoveryAccountRequest {
    pub account_to_recover: AccountName,
    pub recovery_account: AccountName,
    pub effective_on: Timestamp,
}

/// A superseded owner authority, usable as proof of ownership during recovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAuthorityHistory {
    /// Insertion sequence. History is appended in time order, so the
    /// lowest id is also the oldest entry.
    pub id: u64,
    pub account: AccountName,
    pub previous_owner_authority: Authority,
    pub last_valid_time: Timestamp,
}

pub trait RecoveryStore {
    fn find_recovery_request(
        &self,
        account: &AccountName,
    ) -> Result<Option<AccountRecoveryRequest>, StoreError>;
    fn put_recovery_request(&mut self, request: &AccountRecoveryRequest) -> Result<(), StoreError>;
    fn remove_recovery_request(&mut self, account: &AccountName) -> Result<(), StoreError>;
    /// The request with the earliest (expires, account).
    fn first_recovery_request(&self) -> Result<Option<AccountRecoveryRequest>, StoreError>;

    fn find_change_request(
        &self,
        account: &AccountName,
    ) -> Result<Option<ChangeRecoveryAccountRequest>, StoreError>;
    fn put_change_request(
        &mut self,
        request: &ChangeRecoveryAccountRequest,
    ) -> Result<(), StoreError>;
    fn remove_change_request(&mut self, account: &AccountName) -> Result<(), StoreError>;
    /// The change with the earliest (effective_on, account).
    fn first_change_request(&self) -> Result<Option<ChangeRecoveryAccountRequest>, StoreError>;

    fn insert_owner_history(
        &mut self,
        account: &AccountName,
        previous_owner_authority: &Authority,
        last_valid_time: Timestamp,
    ) -> Result<OwnerAuthorityHistory, StoreError>;
    /// History of one account, oldest first.
    fn owner_history_of(&self, account: &AccountName)
        -> Result<Vec<OwnerAuthorityHistory>, StoreError>;
    fn oldest_owner_history(&self) -> Result<Option<OwnerAuthorityHistory>, StoreError>;
    fn remove_owner_history(&mut self, id: u64) -> Result<(), StoreError>;
}
