//! The global vesting pool.

use covenant_store::{AccountStore, GlobalStore, WitnessStore};
use covenant_types::asset::checked_add;
use covenant_types::{AccountName, LedgerError, LedgerEvent};
use covenant_voting::ProxyVoteGraph;

/// Convert `steem` into vesting shares for `to` at the current pool price.
///
/// The STEEM must already have left the payer's liquid balance. The new
/// shares count toward `to`'s vote weight immediately. Returns the shares
/// created.
pub fn create_vesting<S>(
    store: &mut S,
    graph: &ProxyVoteGraph,
    to: &AccountName,
    steem: i64,
    events: &mut Vec<LedgerEvent>,
) -> Result<i64, LedgerError>
where
    S: AccountStore + GlobalStore + WitnessStore + ?Sized,
{
    let mut globals = store.globals()?;
    let vests = globals.vesting_share_price().to_vests(steem)?;

    let mut account = store.get_account(to)?;
    account.vesting_shares = checked_add(account.vesting_shares, vests)?;
    store.put_account(&account)?;

    globals.total_vesting_fund_steem = checked_add(globals.total_vesting_fund_steem, steem)?;
    globals.total_vesting_shares = checked_add(globals.total_vesting_shares, vests)?;
    store.put_globals(&globals)?;

    graph.adjust_proxied_witness_votes(store, &account, vests, events)?;
    Ok(vests)
}
