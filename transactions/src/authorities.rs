//! Which authorities each operation needs.

use crate::Operation;
use covenant_authority::RequiredAuthorities;

/// The authorities `op` must be signed with.
pub fn required_authorities(op: &Operation) -> RequiredAuthorities {
    match op {
        Operation::AccountCreate(op) => RequiredAuthorities::active(op.creator.clone()),
        Operation::AccountUpdate(op) => {
            if op.owner.is_some() {
                RequiredAuthorities::owner(op.account.clone())
            } else {
                RequiredAuthorities::active(op.account.clone())
            }
        }
        Operation::WitnessUpdate(op) => RequiredAuthorities::active(op.owner.clone()),
        Operation::AccountWitnessVote(op) => RequiredAuthorities::active(op.account.clone()),
        Operation::AccountWitnessProxy(op) => RequiredAuthorities::active(op.account.clone()),
        Operation::TransferToVesting(op) => RequiredAuthorities::active(op.from.clone()),
        Operation::WithdrawVesting(op) => RequiredAuthorities::active(op.account.clone()),
        Operation::SetWithdrawVestingRoute(op) => {
            RequiredAuthorities::active(op.from_account.clone())
        }
        Operation::DelegateVestingShares(op) => RequiredAuthorities::active(op.delegator.clone()),
        Operation::ClaimAccount(op) => RequiredAuthorities::active(op.creator.clone()),
        Operation::CreateClaimedAccount(op) => RequiredAuthorities::active(op.creator.clone()),
        Operation::RequestAccountRecovery(op) => {
            RequiredAuthorities::active(op.recovery_account.clone())
        }
        Operation::RecoverAccount(op) => {
            let mut required = RequiredAuthorities::new();
            required.other.push(op.new_owner_authority.clone());
            required.other.push(op.recent_owner_authority.clone());
            required
        }
        Operation::ChangeRecoveryAccount(op) => {
            RequiredAuthorities::owner(op.account_to_recover.clone())
        }
        Operation::ClaimRewardBalance(op) => RequiredAuthorities::posting(op.account.clone()),
    }
}
