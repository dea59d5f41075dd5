//! Covenant operations and transactions.
//!
//! Operations:
//! - **AccountCreate** / **ClaimAccount** / **CreateClaimedAccount**: open accounts
//! - **AccountUpdate**: replace authorities, memo key or metadata
//! - **WitnessUpdate**: register or update a witness
//! - **AccountWitnessVote** / **AccountWitnessProxy**: witness approval and proxying
//! - **TransferToVesting** / **WithdrawVesting** / **SetWithdrawVestingRoute**: power up and down
//! - **DelegateVestingShares**: lend vesting shares
//! - **RequestAccountRecovery** / **RecoverAccount** / **ChangeRecoveryAccount**: recovery
//! - **ClaimRewardBalance**: collect pending rewards

pub mod account;
pub mod authorities;
pub mod recovery;
pub mod reward;
pub mod transaction;
pub mod validation;
pub mod vesting;
pub mod witness;

pub use authorities::required_authorities;
pub use transaction::{SignedTransaction, Transaction, TransactionSignature};
pub use validation::{validate_expiration, validate_operation, validate_transaction};

use serde::{Deserialize, Serialize};

/// Every state transition a transaction can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    AccountCreate(account::AccountCreateOp),
    AccountUpdate(account::AccountUpdateOp),
    WitnessUpdate(witness::WitnessUpdateOp),
    AccountWitnessVote(witness::AccountWitnessVoteOp),
    AccountWitnessProxy(witness::AccountWitnessProxyOp),
    TransferToVesting(vesting::TransferToVestingOp),
    WithdrawVesting(vesting::WithdrawVestingOp),
    SetWithdrawVestingRoute(vesting::SetWithdrawVestingRouteOp),
    DelegateVestingShares(vesting::DelegateVestingSharesOp),
    ClaimAccount(account::ClaimAccountOp),
    CreateClaimedAccount(account::CreateClaimedAccountOp),
    RequestAccountRecovery(recovery::RequestAccountRecoveryOp),
    RecoverAccount(recovery::RecoverAccountOp),
    ChangeRecoveryAccount(recovery::ChangeRecoveryAccountOp),
    ClaimRewardBalance(reward::ClaimRewardBalanceOp),
}

impl Operation {
    /// Short name used in logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccountCreate(_) => "account_create",
            Self::AccountUpdate(_) => "account_update",
            Self::WitnessUpdate(_) => "witness_update",
            Self::AccountWitnessVote(_) => "account_witness_vote",
            Self::AccountWitnessProxy(_) => "account_witness_proxy",
            Self::TransferToVesting(_) => "transfer_to_vesting",
            Self::WithdrawVesting(_) => "withdraw_vesting",
            Self::SetWithdrawVestingRoute(_) => "set_withdraw_vesting_route",
            Self::DelegateVestingShares(_) => "delegate_vesting_shares",
            Self::ClaimAccount(_) => "claim_account",
            Self::CreateClaimedAccount(_) => "create_claimed_account",
            Self::RequestAccountRecovery(_) => "request_account_recovery",
            Self::RecoverAccount(_) => "recover_account",
            Self::ChangeRecoveryAccount(_) => "change_recovery_account",
            Self::ClaimRewardBalance(_) => "claim_reward_balance",
        }
    }
}
