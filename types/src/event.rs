//! Events emitted by state transitions.
//!
//! Handlers never perform I/O. They push events into the list returned from
//! transaction and block application, and downstream consumers (history
//! indexers, notification services) read them from there.

use crate::asset::Asset;
use crate::authority::AuthorityTier;
use crate::name::AccountName;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// One payment of a power-down reached a destination.
    FillVestingWithdraw {
        from: AccountName,
        to: AccountName,
        withdrawn: Asset,
        deposited: Asset,
    },
    /// A cancelled delegation's reserve was released back to the delegator.
    ReturnVestingDelegation {
        account: AccountName,
        vesting_shares: Asset,
    },
    /// A witness vote total moved.
    WitnessVotesChanged {
        witness: AccountName,
        delta: i64,
        votes: i64,
    },
    AccountCreated {
        account: AccountName,
        creator: AccountName,
    },
    AuthorityUpdated {
        account: AccountName,
        tier: AuthorityTier,
    },
    AccountRecovered {
        account: AccountName,
    },
    RecoveryRequestExpired {
        account: AccountName,
    },
    RecoveryAccountChanged {
        account: AccountName,
        recovery_account: AccountName,
    },
    RewardBalanceClaimed {
        account: AccountName,
        steem: Asset,
        sbd: Asset,
        vests: Asset,
    },
}

impl LedgerEvent {
    /// The account the event is primarily about.
    pub fn account(&self) -> &AccountName {
        match self {
            LedgerEvent::FillVestingWithdraw { from, .. } => from,
            LedgerEvent::ReturnVestingDelegation { account, .. } => account,
            LedgerEvent::WitnessVotesChanged { witness, .. } => witness,
            LedgerEvent::AccountCreated { account, .. } => account,
            LedgerEvent::AuthorityUpdated { account, .. } => account,
            LedgerEvent::AccountRecovered { account } => account,
            LedgerEvent::RecoveryRequestExpired { account } => account,
            LedgerEvent::RecoveryAccountChanged { account, .. } => account,
            LedgerEvent::RewardBalanceClaimed { account, .. } => account,
        }
    }
}
