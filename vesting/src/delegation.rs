//! Vesting share delegation.
//!
//! A delegation moves voting and bandwidth weight, never ownership: the
//! delegator keeps `vesting_shares` and reserves the delegated amount in
//! `delegated_vesting_shares`. Cancelling frees the delegatee's side at once
//! but keeps the delegator's reserve until the return period has passed, so
//! the same shares cannot be delegated twice within that window.

use covenant_store::{require_account, AccountStore, DelegationStore, VestingDelegation};
use covenant_types::asset::{checked_add, checked_sub};
use covenant_types::{
    AccountName, Asset, ChainParams, LedgerError, LedgerEvent, StateError, Timestamp,
    ValidationError,
};

/// Creates, adjusts and cancels delegations and releases expired reserves.
#[derive(Clone, Debug)]
pub struct DelegationLedger {
    return_period: u64,
}

impl DelegationLedger {
    pub fn new(return_period: u64) -> Self {
        Self { return_period }
    }

    pub fn from_params(params: &ChainParams) -> Self {
        Self::new(params.delegation_return_period)
    }

    /// Set the delegation from `delegator` to `delegatee` to exactly `vesting_shares`.
    ///
    /// Zero cancels; the reserve is released by [`Self::process_expirations`]
    /// once `now + return_period` has passed. A positive amount creates or
    /// resizes the live record immediately.
    pub fn delegate<S>(
        &self,
        store: &mut S,
        delegator: &AccountName,
        delegatee: &AccountName,
        vesting_shares: i64,
        now: Timestamp,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + DelegationStore + ?Sized,
    {
        if vesting_shares < 0 {
            return Err(ValidationError::NegativeAmount.into());
        }
        if delegator == delegatee {
            return Err(ValidationError::SelfDelegation.into());
        }
        let mut from = require_account(store, delegator)?;
        let mut to = require_account(store, delegatee)?;
        let existing = store.find_delegation(delegator, delegatee)?;
        let current = existing.as_ref().map_or(0, |d| d.vesting_shares);

        if vesting_shares == current {
            return Err(StateError::DelegationUnchanged.into());
        }

        if vesting_shares > current {
            let delta = vesting_shares - current;
            let available = from.available_vesting_shares();
            if delta > available {
                return Err(StateError::InsufficientAvailableStake {
                    available,
                    requested: delta,
                }
                .into());
            }
            from.delegated_vesting_shares = checked_add(from.delegated_vesting_shares, delta)?;
            to.received_vesting_shares = checked_add(to.received_vesting_shares, delta)?;
        } else {
            let delta = current - vesting_shares;
            to.received_vesting_shares = checked_sub(to.received_vesting_shares, delta)?;
            if vesting_shares == 0 {
                let expiration = now.plus_secs(self.return_period);
                store.insert_expiration(delegator, delta, expiration)?;
                tracing::debug!(
                    delegator = %delegator,
                    delegatee = %delegatee,
                    vesting_shares = delta,
                    expiration = %expiration,
                    "delegation cancelled"
                );
            } else {
                from.delegated_vesting_shares =
                    checked_sub(from.delegated_vesting_shares, delta)?;
            }
        }

        if vesting_shares == 0 {
            store.remove_delegation(delegator, delegatee)?;
        } else {
            let created = existing.map_or(now, |d| d.created);
            store.put_delegation(&VestingDelegation {
                delegator: delegator.clone(),
                delegatee: delegatee.clone(),
                vesting_shares,
                created,
            })?;
        }
        store.put_account(&from)?;
        store.put_account(&to)?;
        Ok(())
    }

    /// Release every cancelled-delegation reserve whose return time has come.
    pub fn process_expirations<S>(
        &self,
        store: &mut S,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<usize, LedgerError>
    where
        S: AccountStore + DelegationStore + ?Sized,
    {
        let mut released = 0;
        while let Some(expiration) = store.first_expiration()? {
            if expiration.expiration > now {
                break;
            }
            let mut account = store.get_account(&expiration.delegator)?;
            account.delegated_vesting_shares =
                checked_sub(account.delegated_vesting_shares, expiration.vesting_shares)?;
            store.put_account(&account)?;
            store.remove_expiration(&expiration)?;

            events.push(LedgerEvent::ReturnVestingDelegation {
                account: expiration.delegator,
                vesting_shares: Asset::vests(expiration.vesting_shares),
            });
            released += 1;
        }
        Ok(released)
    }
}
