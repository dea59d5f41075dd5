//! Where authorities are looked up.

use covenant_store::{AccountStore, StoreError};
use covenant_types::{AccountName, Authority, AuthorityTier};

/// Read access to account authorities.
pub trait AuthoritySource {
    /// `None` when the account does not exist.
    fn authority(
        &self,
        account: &AccountName,
        tier: AuthorityTier,
    ) -> Result<Option<Authority>, StoreError>;
}

impl<S: AccountStore + ?Sized> AuthoritySource for S {
    fn authority(
        &self,
        account: &AccountName,
        tier: AuthorityTier,
    ) -> Result<Option<Authority>, StoreError> {
        Ok(self
            .find_account(account)?
            .map(|a| a.authority(tier).clone()))
    }
}
