//! Stateful checks on authorities submitted in operations.

use covenant_store::AccountStore;
use covenant_types::{Authority, LedgerError, ValidationError};

/// Every account named in `authority` must exist.
pub fn validate_authority_accounts<S: AccountStore + ?Sized>(
    store: &S,
    authority: &Authority,
) -> Result<(), LedgerError> {
    for account in authority.account_auths.keys() {
        if !store.account_exists(account)? {
            return Err(ValidationError::UnknownAccount(account.clone()).into());
        }
    }
    Ok(())
}
