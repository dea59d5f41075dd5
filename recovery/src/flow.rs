//! Recovery requests, their execution, and recovery partner changes.
//!
//! A request moves through `none → pending → executed | expired`. Only the
//! account's recovery partner may file or overwrite it; an account without
//! a partner is served by the top witness.

use crate::owner::update_owner_authority;
use covenant_authority::validate_authority_accounts;
use covenant_store::{
    require_account, AccountRecoveryRequest, AccountStore, ChangeRecoveryAccountRequest,
    OwnerAuthorityHistory, RecoveryStore, WitnessStore,
};
use covenant_types::{
    AccountName, Authority, ChainParams, LedgerError, LedgerEvent, StateError, Timestamp,
    ValidationError,
};

#[derive(Clone, Debug)]
pub struct AccountRecoveryFlow {
    request_expiration: u64,
    owner_update_limit: u64,
    recovery_period: u64,
}

impl AccountRecoveryFlow {
    pub fn new(request_expiration: u64, owner_update_limit: u64, recovery_period: u64) -> Self {
        Self {
            request_expiration,
            owner_update_limit,
            recovery_period,
        }
    }

    pub fn from_params(params: &ChainParams) -> Self {
        Self::new(
            params.account_recovery_request_expiration_period,
            params.owner_update_limit,
            params.owner_auth_recovery_period,
        )
    }

    /// File, overwrite or (with a zero threshold) cancel a recovery request.
    pub fn request_account_recovery<S>(
        &self,
        store: &mut S,
        recovery_account: &AccountName,
        account_to_recover: &AccountName,
        new_owner: &Authority,
        now: Timestamp,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + RecoveryStore + WitnessStore + ?Sized,
    {
        let target = require_account(store, account_to_recover)?;
        require_account(store, recovery_account)?;
        let partner = match target.recovery_account {
            Some(partner) => Some(partner),
            None => store.top_witness()?.map(|w| w.owner),
        };
        if partner.as_ref() != Some(recovery_account) {
            return Err(StateError::NotRecoveryPartner(recovery_account.clone()).into());
        }

        let existing = store.find_recovery_request(account_to_recover)?;
        if existing.is_some() && new_owner.weight_threshold == 0 {
            store.remove_recovery_request(account_to_recover)?;
            tracing::debug!(account = %account_to_recover, "recovery request cancelled");
            return Ok(());
        }
        if new_owner.is_impossible() {
            return Err(ValidationError::ImpossibleAuthority.into());
        }
        if new_owner.weight_threshold == 0 {
            return Err(StateError::NoRecoveryRequest(account_to_recover.clone()).into());
        }
        validate_authority_accounts(store, new_owner)?;

        store.put_recovery_request(&AccountRecoveryRequest {
            account_to_recover: account_to_recover.clone(),
            new_owner_authority: new_owner.clone(),
            expires: now.plus_secs(self.request_expiration),
        })?;
        tracing::debug!(
            account = %account_to_recover,
            partner = %recovery_account,
            "recovery request filed"
        );
        Ok(())
    }

    /// Execute a pending request. Signatures for both authorities are
    /// checked by the caller before this runs.
    pub fn recover_account<S>(
        &self,
        store: &mut S,
        account_to_recover: &AccountName,
        new_owner: &Authority,
        recent_owner: &Authority,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + RecoveryStore + ?Sized,
    {
        let mut account = require_account(store, account_to_recover)?;
        if account.last_account_recovery.elapsed_since(now) <= self.owner_update_limit {
            return Err(StateError::RecoveryWindowNotElapsed.into());
        }

        let request = store
            .find_recovery_request(account_to_recover)?
            .filter(|r| !request_expired(r, now))
            .ok_or_else(|| StateError::NoRecoveryRequest(account_to_recover.clone()))?;
        if &request.new_owner_authority != new_owner {
            return Err(StateError::RecoveryAuthorityMismatch.into());
        }

        let known = store
            .owner_history_of(account_to_recover)?
            .iter()
            .filter(|h| !self.history_stale(h, now))
            .any(|h| &h.previous_owner_authority == recent_owner);
        if !known {
            return Err(StateError::RecentAuthorityNotFound.into());
        }

        store.remove_recovery_request(account_to_recover)?;
        account.last_account_recovery = now;
        update_owner_authority(store, &mut account, new_owner.clone(), now)?;

        tracing::info!(account = %account_to_recover, "account recovered");
        events.push(LedgerEvent::AccountRecovered {
            account: account_to_recover.clone(),
        });
        Ok(())
    }

    /// Schedule a change of recovery partner one recovery period from now.
    /// Asking for the current partner again withdraws a pending change.
    pub fn change_recovery_account<S>(
        &self,
        store: &mut S,
        account_to_recover: &AccountName,
        new_recovery_account: &AccountName,
        now: Timestamp,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + RecoveryStore + ?Sized,
    {
        require_account(store, new_recovery_account)?;
        let account = require_account(store, account_to_recover)?;

        let pending = store.find_change_request(account_to_recover)?;
        if pending.is_some() && account.recovery_account.as_ref() == Some(new_recovery_account) {
            store.remove_change_request(account_to_recover)?;
            return Ok(());
        }
        store.put_change_request(&ChangeRecoveryAccountRequest {
            account_to_recover: account_to_recover.clone(),
            recovery_account: new_recovery_account.clone(),
            effective_on: now.plus_secs(self.recovery_period),
        })?;
        Ok(())
    }

    /// Per-block housekeeping: expire stale requests, forget owner
    /// authorities older than the recovery period and apply partner changes
    /// that have come due.
    pub fn process_maintenance<S>(
        &self,
        store: &mut S,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + RecoveryStore + ?Sized,
    {
        while let Some(request) = store.first_recovery_request()? {
            if !request_expired(&request, now) {
                break;
            }
            store.remove_recovery_request(&request.account_to_recover)?;
            events.push(LedgerEvent::RecoveryRequestExpired {
                account: request.account_to_recover,
            });
        }

        while let Some(entry) = store.oldest_owner_history()? {
            if !self.history_stale(&entry, now) {
                break;
            }
            store.remove_owner_history(entry.id)?;
        }

        while let Some(change) = store.first_change_request()? {
            if change.effective_on > now {
                break;
            }
            let mut account = store.get_account(&change.account_to_recover)?;
            account.recovery_account = Some(change.recovery_account.clone());
            store.put_account(&account)?;
            store.remove_change_request(&change.account_to_recover)?;
            events.push(LedgerEvent::RecoveryAccountChanged {
                account: change.account_to_recover,
                recovery_account: change.recovery_account,
            });
        }
        Ok(())
    }

    /// A replaced owner authority stops proving ownership once the recovery
    /// period after it was replaced has passed.
    fn history_stale(&self, entry: &OwnerAuthorityHistory, now: Timestamp) -> bool {
        entry.last_valid_time.plus_secs(self.recovery_period) < now
    }
}

fn request_expired(request: &AccountRecoveryRequest, now: Timestamp) -> bool {
    request.expires <= now
}
