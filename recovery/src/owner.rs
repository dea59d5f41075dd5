//! Owner authority replacement with history.

use covenant_store::{Account, AccountStore, RecoveryStore};
use covenant_types::{Authority, LedgerError, Timestamp};

/// Install `new_owner` on `account`, keeping the superseded owner in the
/// history so it can still be used to recover the account.
pub fn update_owner_authority<S>(
    store: &mut S,
    account: &mut Account,
    new_owner: Authority,
    now: Timestamp,
) -> Result<(), LedgerError>
where
    S: AccountStore + RecoveryStore + ?Sized,
{
    store.insert_owner_history(&account.name, &account.owner, now)?;
    account.owner = new_owner;
    account.last_owner_update = now;
    store.put_account(account)?;
    Ok(())
}
