//! Vesting operations: power-up, power-down, routes and delegation.

use covenant_types::{AccountName, Asset};
use serde::{Deserialize, Serialize};

/// Convert liquid STEEM into vesting shares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToVestingOp {
    pub from: AccountName,
    /// Defaults to `from`.
    pub to: Option<AccountName>,
    pub amount: Asset,
}

impl TransferToVestingOp {
    pub fn recipient(&self) -> &AccountName {
        self.to.as_ref().unwrap_or(&self.from)
    }
}

/// Start, replace or (with zero) cancel a power-down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawVestingOp {
    pub account: AccountName,
    pub vesting_shares: Asset,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetWithdrawVestingRouteOp {
    pub from_account: AccountName,
    pub to_account: AccountName,
    /// Basis points of each payment sent to `to_account`.
    pub percent: u16,
    /// Deposit as vesting shares instead of liquid STEEM.
    pub auto_vest: bool,
}

/// Set the delegation from `delegator` to `delegatee` to exactly `vesting_shares`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateVestingSharesOp {
    pub delegator: AccountName,
    pub delegatee: AccountName,
    pub vesting_shares: Asset,
}
