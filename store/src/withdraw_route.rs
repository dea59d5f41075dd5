//! Power-down payout routes.

use crate::StoreError;
use covenant_types::AccountName;
use serde::{Deserialize, Serialize};

/// Share of each power-down payment sent from `from_account` to `to_account`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawRoute {
    pub from_account: AccountName,
    pub to_account: AccountName,
    /// Basis points of each payment.
    pub percent: u16,
    /// Deposit as vesting shares instead of converting to liquid.
    pub auto_vest: bool,
}

pub trait WithdrawRouteStore {
    fn find_route(
        &self,
        from: &AccountName,
        to: &AccountName,
    ) -> Result<Option<WithdrawRoute>, StoreError>;
    fn put_route(&mut self, route: &WithdrawRoute) -> Result<(), StoreError>;
    fn remove_route(&mut self, from: &AccountName, to: &AccountName) -> Result<(), StoreError>;
    /// Routes of one account ordered by destination name.
    fn routes_from(&self, from: &AccountName) -> Result<Vec<WithdrawRoute>, StoreError>;
}
