//! Recompute vote weights from scratch and compare with the stored totals.

use covenant_store::{Account, AccountStore, WitnessStore};
use covenant_types::asset::checked_add;
use covenant_types::params::MAX_PROXY_RECURSION_DEPTH;
use covenant_types::{AccountName, LedgerError};
use std::collections::BTreeMap;

/// Check every account's per-depth proxied weight and every witness's vote
/// total against a full recount. Proxied accounts must hold no direct votes.
pub fn audit_vote_weights<S>(store: &S) -> Result<(), LedgerError>
where
    S: AccountStore + WitnessStore + ?Sized,
{
    let accounts: BTreeMap<AccountName, Account> = store
        .iter_accounts()?
        .into_iter()
        .map(|a| (a.name.clone(), a))
        .collect();

    let mut proxied: BTreeMap<&AccountName, [i64; MAX_PROXY_RECURSION_DEPTH]> = BTreeMap::new();
    for account in accounts.values() {
        let mut cursor = account.proxy.as_ref();
        let mut hop = 0;
        while let Some(proxy) = cursor {
            if hop >= MAX_PROXY_RECURSION_DEPTH {
                break;
            }
            let slots = proxied
                .entry(proxy)
                .or_insert([0; MAX_PROXY_RECURSION_DEPTH]);
            slots[hop] = checked_add(slots[hop], account.vesting_shares)?;
            hop += 1;
            cursor = accounts.get(proxy).and_then(|a| a.proxy.as_ref());
        }
    }

    let mut votes: BTreeMap<AccountName, i64> = BTreeMap::new();
    for account in accounts.values() {
        let expected = proxied
            .get(&account.name)
            .copied()
            .unwrap_or([0; MAX_PROXY_RECURSION_DEPTH]);
        if account.proxied_vsf_votes != expected {
            return Err(violation(format!(
                "{} proxied votes {:?}, recount {:?}",
                account.name, account.proxied_vsf_votes, expected
            )));
        }

        let approved = store.witness_votes_of(&account.name)?;
        if account.proxy.is_some() && !approved.is_empty() {
            return Err(violation(format!(
                "{} votes directly while proxied",
                account.name
            )));
        }
        if usize::from(account.witnesses_voted_for) != approved.len() {
            return Err(violation(format!(
                "{} counts {} witness votes, holds {}",
                account.name,
                account.witnesses_voted_for,
                approved.len()
            )));
        }
        let weight = account.witness_vote_weight()?;
        for witness in approved {
            let total = votes.entry(witness).or_insert(0);
            *total = checked_add(*total, weight)?;
        }
    }

    for witness in store.iter_witnesses()? {
        let expected = votes.get(&witness.owner).copied().unwrap_or(0);
        if witness.votes != expected {
            return Err(violation(format!(
                "witness {} holds {} votes, recount {}",
                witness.owner, witness.votes, expected
            )));
        }
    }
    Ok(())
}

fn violation(detail: String) -> LedgerError {
    LedgerError::InvariantViolation(detail)
}
