//! Abstract storage traits for the governance core.
//!
//! The state machine depends only on these traits. Each trait covers one
//! table and the secondary orderings the handlers scan (by name, by
//! delegation pair, by expiration time, by withdrawal time). Writes take
//! `&mut self`: a single execution context owns the store while a block
//! applies, and [`UndoSession`] lets it stage and roll back mutations.

pub mod account;
pub mod delegation;
pub mod global;
pub mod recovery;
pub mod reward_fund;
pub mod session;
pub mod transaction;
pub mod withdraw_route;
pub mod witness;

pub use account::{require_account, Account, AccountStore};
pub use covenant_types::StoreError;
pub use delegation::{DelegationStore, VestingDelegation, VestingDelegationExpiration};
pub use global::{GlobalProperties, GlobalStore};
pub use recovery::{
    AccountRecoveryRequest, ChangeRecoveryAccountRequest, OwnerAuthorityHistory, RecoveryStore,
};
pub use reward_fund::{CurveKind, RewardFund, RewardFundStore};
pub use session::UndoSession;
pub use transaction::TransactionStore;
pub use withdraw_route::{WithdrawRoute, WithdrawRouteStore};
pub use witness::{Witness, WitnessStore};

/// Everything the state machine needs from a backend.
pub trait LedgerStore:
    AccountStore
    + DelegationStore
    + GlobalStore
    + RecoveryStore
    + RewardFundStore
    + TransactionStore
    + WithdrawRouteStore
    + WitnessStore
    + UndoSession
{
}

impl<T> LedgerStore for T where
    T: AccountStore
        + DelegationStore
        + GlobalStore
        + RecoveryStore
        + RewardFundStore
        + TransactionStore
        + WithdrawRouteStore
        + WitnessStore
        + UndoSession
{
}
