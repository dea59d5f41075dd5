//! Account records and the account table.

use crate::StoreError;
use covenant_types::params::MAX_PROXY_RECURSION_DEPTH;
use covenant_types::{
    AccountName, Authority, AuthorityTier, LedgerError, PublicKey, StateError, Timestamp,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// Per-account governance and stake state.
///
/// All amounts are raw integers: `balance` and `reward_steem_balance` in
/// STEEM, `sbd_balance` and `reward_sbd_balance` in SBD, every `*vesting*`
/// share field in VESTS except `reward_vesting_steem`, which is the STEEM
/// valuation of `reward_vesting_balance` at the time it was credited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub posting: Authority,
    pub memo_key: PublicKey,
    pub json_metadata: String,
    pub created: Timestamp,

    pub balance: i64,
    pub sbd_balance: i64,

    pub vesting_shares: i64,
    pub delegated_vesting_shares: i64,
    pub received_vesting_shares: i64,

    /// Shares paid out per power-down interval.
    pub vesting_withdraw_rate: i64,
    /// `Timestamp::MAX` when no power-down is active.
    pub next_vesting_withdrawal: Timestamp,
    /// Shares the active power-down has yet to pay out.
    pub to_withdraw: i64,
    pub withdraw_routes: u16,

    /// `None` means the account votes for itself and is a proxy-forest root.
    pub proxy: Option<AccountName>,
    /// Incoming weight per depth: slot 0 is the direct proxiers' own shares,
    /// slot `i` is what reached them from `i` levels further down.
    pub proxied_vsf_votes: [i64; MAX_PROXY_RECURSION_DEPTH],
    pub witnesses_voted_for: u16,

    pub recovery_account: Option<AccountName>,
    pub last_account_recovery: Timestamp,
    pub last_owner_update: Timestamp,

    pub reward_steem_balance: i64,
    pub reward_sbd_balance: i64,
    pub reward_vesting_balance: i64,
    pub reward_vesting_steem: i64,

    pub pending_claimed_accounts: i64,
}

impl Account {
    /// A fresh account with no balances, no proxy and no power-down.
    pub fn new(
        name: AccountName,
        owner: Authority,
        active: Authority,
        posting: Authority,
        memo_key: PublicKey,
        created: Timestamp,
    ) -> Self {
        Self {
            name,
            owner,
            active,
            posting,
            memo_key,
            json_metadata: String::new(),
            created,
            balance: 0,
            sbd_balance: 0,
            vesting_shares: 0,
            delegated_vesting_shares: 0,
            received_vesting_shares: 0,
            vesting_withdraw_rate: 0,
            next_vesting_withdrawal: Timestamp::MAX,
            to_withdraw: 0,
            withdraw_routes: 0,
            proxy: None,
            proxied_vsf_votes: [0; MAX_PROXY_RECURSION_DEPTH],
            witnesses_voted_for: 0,
            recovery_account: None,
            last_account_recovery: Timestamp::EPOCH,
            last_owner_update: Timestamp::EPOCH,
            reward_steem_balance: 0,
            reward_sbd_balance: 0,
            reward_vesting_balance: 0,
            reward_vesting_steem: 0,
            pending_claimed_accounts: 0,
        }
    }

    pub fn authority(&self, tier: AuthorityTier) -> &Authority {
        match tier {
            AuthorityTier::Owner => &self.owner,
            AuthorityTier::Active => &self.active,
            AuthorityTier::Posting => &self.posting,
        }
    }

    pub fn proxied_vsf_votes_total(&self) -> Result<i64, StateError> {
        self.proxied_vsf_votes
            .iter()
            .try_fold(0i64, |acc, v| acc.checked_add(*v))
            .ok_or(StateError::Overflow)
    }

    /// Weight this account contributes to each witness it votes for.
    pub fn witness_vote_weight(&self) -> Result<i64, StateError> {
        self.vesting_shares
            .checked_add(self.proxied_vsf_votes_total()?)
            .ok_or(StateError::Overflow)
    }

    /// Shares neither delegated away nor committed to the active power-down.
    pub fn available_vesting_shares(&self) -> i64 {
        self.vesting_shares - self.delegated_vesting_shares - self.to_withdraw
    }

    pub fn is_powering_down(&self) -> bool {
        self.vesting_withdraw_rate > 0
    }
}

/// Trait for account storage operations.
pub trait AccountStore {
    fn find_account(&self, name: &AccountName) -> Result<Option<Account>, StoreError>;
    fn put_account(&mut self, account: &Account) -> Result<(), StoreError>;
    fn account_count(&self) -> Result<u64, StoreError>;
    fn iter_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Names of accounts whose next power-down payment is due at or before
    /// `now`, ordered by (due time, name).
    fn withdrawals_due(&self, now: Timestamp) -> Result<Vec<AccountName>, StoreError>;

    /// Accounts whose `proxy` is `proxy`, ordered by name.
    fn proxiers_of(&self, proxy: &AccountName) -> Result<Vec<AccountName>, StoreError>;

    fn get_account(&self, name: &AccountName) -> Result<Account, StoreError> {
        self.find_account(name)?
            .ok_or_else(|| StoreError::NotFound(format!("account {name}")))
    }

    fn account_exists(&self, name: &AccountName) -> Result<bool, StoreError> {
        Ok(self.find_account(name)?.is_some())
    }
}

/// Load an account named by an operation, rejecting unknown names.
pub fn require_account<S: AccountStore + ?Sized>(
    store: &S,
    name: &AccountName,
) -> Result<Account, LedgerError> {
    store
        .find_account(name)?
        .ok_or_else(|| ValidationError::UnknownAccount(name.clone()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        let key = PublicKey([1; 32]);
        Account::new(
            AccountName::new("alice").unwrap(),
            Authority::single_key(key),
            Authority::single_key(key),
            Authority::single_key(key),
            key,
            Timestamp::new(0),
        )
    }

    #[test]
    fn vote_weight_includes_proxied_slots() {
        let mut account = sample();
        account.vesting_shares = 100;
        account.proxied_vsf_votes = [10, 20, 0, 5];
        assert_eq!(account.proxied_vsf_votes_total().unwrap(), 35);
        assert_eq!(account.witness_vote_weight().unwrap(), 135);
    }

    #[test]
    fn available_shares_subtract_reserves() {
        let mut account = sample();
        account.vesting_shares = 1_000;
        account.delegated_vesting_shares = 300;
        account.to_withdraw = 200;
        assert_eq!(account.available_vesting_shares(), 500);
    }

    #[test]
    fn new_account_has_no_power_down() {
        let account = sample();
        assert!(!account.is_powering_down());
        assert!(account.next_vesting_withdrawal.is_max());
        assert!(account.proxy.is_none());
    }
}
