//! Full-state consistency checks.
//!
//! These recount every derived quantity from the primary records. They are
//! too slow to run per block in production but cheap enough for tests and
//! for the `verify` replay mode.

use covenant_store::{Account, LedgerStore};
use covenant_types::asset::checked_add;
use covenant_types::params::{MAX_PROXY_RECURSION_DEPTH, PERCENT_100};
use covenant_types::{AccountName, LedgerError};
use covenant_voting::audit_vote_weights;
use std::collections::{BTreeMap, BTreeSet};

/// Check every state invariant, returning the first violation found.
pub fn validate_invariants<S: LedgerStore + ?Sized>(store: &S) -> Result<(), LedgerError> {
    let accounts: BTreeMap<AccountName, Account> = store
        .iter_accounts()?
        .into_iter()
        .map(|a| (a.name.clone(), a))
        .collect();

    check_delegations(store, &accounts)?;
    check_routes(store, &accounts)?;
    check_proxy_forest(&accounts)?;
    for account in accounts.values() {
        if account.vesting_shares - account.delegated_vesting_shares - account.to_withdraw < 0 {
            return Err(violation(format!(
                "{} commits more shares than it holds",
                account.name
            )));
        }
    }
    audit_vote_weights(store)?;
    check_supply(store, &accounts)
}

fn check_delegations<S: LedgerStore + ?Sized>(
    store: &S,
    accounts: &BTreeMap<AccountName, Account>,
) -> Result<(), LedgerError> {
    let mut delegated: BTreeMap<AccountName, i64> = BTreeMap::new();
    let mut received: BTreeMap<AccountName, i64> = BTreeMap::new();
    for d in store.iter_delegations()? {
        let out = delegated.entry(d.delegator).or_insert(0);
        *out = checked_add(*out, d.vesting_shares)?;
        let inc = received.entry(d.delegatee).or_insert(0);
        *inc = checked_add(*inc, d.vesting_shares)?;
    }
    for e in store.iter_expirations()? {
        let out = delegated.entry(e.delegator).or_insert(0);
        *out = checked_add(*out, e.vesting_shares)?;
    }

    for account in accounts.values() {
        let expected = delegated.get(&account.name).copied().unwrap_or(0);
        if account.delegated_vesting_shares != expected {
            return Err(violation(format!(
                "{} delegated {}, recount {}",
                account.name, account.delegated_vesting_shares, expected
            )));
        }
        let expected = received.get(&account.name).copied().unwrap_or(0);
        if account.received_vesting_shares != expected {
            return Err(violation(format!(
                "{} received {}, recount {}",
                account.name, account.received_vesting_shares, expected
            )));
        }
    }
    Ok(())
}

fn check_routes<S: LedgerStore + ?Sized>(
    store: &S,
    accounts: &BTreeMap<AccountName, Account>,
) -> Result<(), LedgerError> {
    for account in accounts.values() {
        let routes = store.routes_from(&account.name)?;
        if routes.len() != usize::from(account.withdraw_routes) {
            return Err(violation(format!(
                "{} counts {} routes, holds {}",
                account.name,
                account.withdraw_routes,
                routes.len()
            )));
        }
        let total: u32 = routes.iter().map(|r| u32::from(r.percent)).sum();
        if total > u32::from(PERCENT_100) {
            return Err(violation(format!(
                "{} routes {} basis points",
                account.name, total
            )));
        }
    }
    Ok(())
}

fn check_proxy_forest(accounts: &BTreeMap<AccountName, Account>) -> Result<(), LedgerError> {
    for account in accounts.values() {
        let mut seen = BTreeSet::from([&account.name]);
        let mut cursor = account.proxy.as_ref();
        let mut depth = 0;
        while let Some(proxy) = cursor {
            depth += 1;
            if depth > MAX_PROXY_RECURSION_DEPTH {
                return Err(violation(format!("{} proxy chain too long", account.name)));
            }
            if !seen.insert(proxy) {
                return Err(violation(format!("{} proxy chain loops", account.name)));
            }
            let next = accounts.get(proxy).ok_or_else(|| {
                violation(format!("{} proxies to missing {}", account.name, proxy))
            })?;
            cursor = next.proxy.as_ref();
        }
    }
    Ok(())
}

fn check_supply<S: LedgerStore + ?Sized>(
    store: &S,
    accounts: &BTreeMap<AccountName, Account>,
) -> Result<(), LedgerError> {
    let globals = store.globals()?;

    let mut steem = checked_add(
        globals.total_vesting_fund_steem,
        globals.pending_rewarded_vesting_steem,
    )?;
    let mut sbd = 0i64;
    let mut vests = 0i64;
    let mut pending_vests = 0i64;
    for account in accounts.values() {
        steem = checked_add(steem, account.balance)?;
        steem = checked_add(steem, account.reward_steem_balance)?;
        sbd = checked_add(sbd, account.sbd_balance)?;
        sbd = checked_add(sbd, account.reward_sbd_balance)?;
        vests = checked_add(vests, account.vesting_shares)?;
        pending_vests = checked_add(pending_vests, account.reward_vesting_balance)?;
    }
    for fund in store.iter_reward_funds()? {
        steem = checked_add(steem, fund.reward_balance)?;
    }

    if steem != globals.current_supply {
        return Err(violation(format!(
            "STEEM held {} != current supply {}",
            steem, globals.current_supply
        )));
    }
    if sbd != globals.current_sbd_supply {
        return Err(violation(format!(
            "SBD held {} != current SBD supply {}",
            sbd, globals.current_sbd_supply
        )));
    }
    if vests != globals.total_vesting_shares {
        return Err(violation(format!(
            "vesting shares held {} != total {}",
            vests, globals.total_vesting_shares
        )));
    }
    if pending_vests != globals.pending_rewarded_vesting_shares {
        return Err(violation(format!(
            "pending reward vests {} != total {}",
            pending_vests, globals.pending_rewarded_vesting_shares
        )));
    }
    Ok(())
}

fn violation(detail: String) -> LedgerError {
    tracing::warn!(%detail, "invariant violated");
    LedgerError::InvariantViolation(detail)
}
