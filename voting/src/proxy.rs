//! Proxy chains and witness approval weights.

use covenant_store::{require_account, Account, AccountStore, WitnessStore};
use covenant_types::asset::checked_add;
use covenant_types::params::MAX_PROXY_RECURSION_DEPTH;
use covenant_types::{
    AccountName, ChainParams, LedgerError, LedgerEvent, StateError, ValidationError,
};
use std::collections::BTreeSet;

/// Weight moving through a proxy chain, indexed by how far below the
/// account it originated. Slot 0 is the account's own shares, slot `i + 1`
/// is its `proxied_vsf_votes[i]`.
pub type ProxyDelta = [i64; MAX_PROXY_RECURSION_DEPTH + 1];

/// Maintains witness vote totals as accounts vote, proxy and change stake.
#[derive(Clone, Debug)]
pub struct ProxyVoteGraph {
    max_witness_votes: u16,
}

impl ProxyVoteGraph {
    pub fn new(max_witness_votes: u16) -> Self {
        Self { max_witness_votes }
    }

    pub fn from_params(params: &ChainParams) -> Self {
        Self::new(params.max_account_witness_votes)
    }

    /// Point `account` at a new proxy, or back at itself with `None`.
    pub fn set_proxy<S>(
        &self,
        store: &mut S,
        account: &AccountName,
        new_proxy: Option<&AccountName>,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + WitnessStore + ?Sized,
    {
        if new_proxy == Some(account) {
            return Err(ValidationError::SelfProxy.into());
        }
        let current = require_account(store, account)?;
        if current.proxy.as_ref() == new_proxy {
            return Err(StateError::ProxyUnchanged.into());
        }
        if let Some(proxy_name) = new_proxy {
            require_account(store, proxy_name)?;
            let below = proxier_depth(store, account)?;
            check_chain_above(store, account, proxy_name, below)?;
        }

        let mut delta = full_weight(&current);
        for slot in delta.iter_mut() {
            *slot = -*slot;
        }
        self.adjust_proxied_witness_votes_by_depth(store, &current, &delta, events)?;

        let Some(proxy_name) = new_proxy else {
            let mut updated = store.get_account(account)?;
            updated.proxy = None;
            store.put_account(&updated)?;
            tracing::debug!(account = %account, "proxy cleared");
            return Ok(());
        };

        self.clear_witness_votes(store, account)?;
        let mut updated = store.get_account(account)?;
        updated.proxy = Some(proxy_name.clone());
        updated.witnesses_voted_for = 0;
        store.put_account(&updated)?;

        for slot in delta.iter_mut() {
            *slot = -*slot;
        }
        self.adjust_proxied_witness_votes_by_depth(store, &updated, &delta, events)?;
        tracing::debug!(account = %account, proxy = %proxy_name, "proxy set");
        Ok(())
    }

    /// Approve or withdraw approval of `witness` with the account's full
    /// weight: its own shares plus everything proxied to it.
    pub fn cast_witness_vote<S>(
        &self,
        store: &mut S,
        account: &AccountName,
        witness: &AccountName,
        approve: bool,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + WitnessStore + ?Sized,
    {
        let mut voter = require_account(store, account)?;
        if voter.proxy.is_some() {
            return Err(StateError::VotingThroughProxy.into());
        }
        let mut target = match store.find_witness(witness)? {
            Some(w) => w,
            None if store.account_exists(witness)? => {
                return Err(ValidationError::NotAWitness(witness.clone()).into())
            }
            None => return Err(ValidationError::UnknownAccount(witness.clone()).into()),
        };

        let weight = voter.witness_vote_weight()?;
        let exists = store.has_witness_vote(account, witness)?;
        let delta = match (exists, approve) {
            (false, true) => {
                if voter.witnesses_voted_for >= self.max_witness_votes {
                    return Err(StateError::TooManyWitnessVotes.into());
                }
                store.insert_witness_vote(account, witness)?;
                voter.witnesses_voted_for += 1;
                weight
            }
            (true, false) => {
                store.remove_witness_vote(account, witness)?;
                voter.witnesses_voted_for -= 1;
                -weight
            }
            (true, true) => return Err(StateError::VoteAlreadyCast(witness.clone()).into()),
            (false, false) => return Err(StateError::VoteNotFound(witness.clone()).into()),
        };
        store.put_account(&voter)?;

        target.votes = checked_add(target.votes, delta)?;
        store.put_witness(&target)?;
        events.push(LedgerEvent::WitnessVotesChanged {
            witness: witness.clone(),
            delta,
            votes: target.votes,
        });
        Ok(())
    }

    /// Propagate a change in `account`'s own vesting shares.
    pub fn adjust_proxied_witness_votes<S>(
        &self,
        store: &mut S,
        account: &Account,
        delta: i64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + WitnessStore + ?Sized,
    {
        if delta == 0 {
            return Ok(());
        }
        let mut by_depth: ProxyDelta = [0; MAX_PROXY_RECURSION_DEPTH + 1];
        by_depth[0] = delta;
        self.adjust_proxied_witness_votes_by_depth(store, account, &by_depth, events)
    }

    /// Walk from `account` to its root, adding `delta[i]` to each ancestor's
    /// slot `i + depth`. Weight pushed past the deepest slot is dropped. At
    /// the root the surviving slots are summed onto every approved witness.
    pub fn adjust_proxied_witness_votes_by_depth<S>(
        &self,
        store: &mut S,
        account: &Account,
        delta: &ProxyDelta,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + WitnessStore + ?Sized,
    {
        let mut depth = 0usize;
        let mut root = account.name.clone();
        let mut cursor = account.proxy.clone();

        while let Some(proxy_name) = cursor {
            if depth >= MAX_PROXY_RECURSION_DEPTH {
                return Ok(());
            }
            let mut proxy = store.get_account(&proxy_name)?;
            for i in (0..MAX_PROXY_RECURSION_DEPTH - depth).rev() {
                let slot = &mut proxy.proxied_vsf_votes[i + depth];
                *slot = checked_add(*slot, delta[i])?;
            }
            store.put_account(&proxy)?;
            cursor = proxy.proxy;
            root = proxy.name;
            depth += 1;
        }

        let total = delta[..=MAX_PROXY_RECURSION_DEPTH - depth]
            .iter()
            .try_fold(0i64, |acc, d| checked_add(acc, *d))?;
        self.adjust_witness_votes(store, &root, total, events)
    }

    /// Apply `delta` to every witness `voter` approves.
    fn adjust_witness_votes<S>(
        &self,
        store: &mut S,
        voter: &AccountName,
        delta: i64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + WitnessStore + ?Sized,
    {
        if delta == 0 {
            return Ok(());
        }
        for name in store.witness_votes_of(voter)? {
            let Some(mut witness) = store.find_witness(&name)? else {
                continue;
            };
            witness.votes = checked_add(witness.votes, delta)?;
            store.put_witness(&witness)?;
            events.push(LedgerEvent::WitnessVotesChanged {
                witness: name,
                delta,
                votes: witness.votes,
            });
        }
        Ok(())
    }

    fn clear_witness_votes<S>(&self, store: &mut S, account: &AccountName) -> Result<(), LedgerError>
    where
        S: AccountStore + WitnessStore + ?Sized,
    {
        for witness in store.witness_votes_of(account)? {
            store.remove_witness_vote(account, &witness)?;
        }
        Ok(())
    }
}

/// Length in hops of the longest proxy chain ending at `account`, capped one
/// past the limit.
fn proxier_depth<S>(store: &S, account: &AccountName) -> Result<usize, LedgerError>
where
    S: AccountStore + ?Sized,
{
    let mut level = vec![account.clone()];
    let mut depth = 0;
    while depth <= MAX_PROXY_RECURSION_DEPTH {
        let mut next = Vec::new();
        for name in &level {
            next.extend(store.proxiers_of(name)?);
        }
        if next.is_empty() {
            break;
        }
        depth += 1;
        level = next;
    }
    Ok(depth)
}

/// Walk up from `proxy_name` as if `account` already pointed at it. The
/// deepest account below `account` sits `below` hops under it, and no
/// account may end up more than `MAX_PROXY_RECURSION_DEPTH` hops from its
/// root.
fn check_chain_above<S>(
    store: &S,
    account: &AccountName,
    proxy_name: &AccountName,
    below: usize,
) -> Result<(), LedgerError>
where
    S: AccountStore + ?Sized,
{
    let mut seen = BTreeSet::from([account.clone()]);
    let mut hops = below;
    let mut cursor = Some(proxy_name.clone());
    while let Some(next) = cursor {
        if !seen.insert(next.clone()) {
            return Err(StateError::ProxyLoop.into());
        }
        hops += 1;
        if hops > MAX_PROXY_RECURSION_DEPTH {
            return Err(StateError::ProxyChainTooLong.into());
        }
        cursor = store.get_account(&next)?.proxy;
    }
    Ok(())
}

/// Everything `account` contributes to its chain, by originating depth.
fn full_weight(account: &Account) -> ProxyDelta {
    let mut delta: ProxyDelta = [0; MAX_PROXY_RECURSION_DEPTH + 1];
    delta[0] = account.vesting_shares;
    delta[1..].copy_from_slice(&account.proxied_vsf_votes);
    delta
}
