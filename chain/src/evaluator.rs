//! Operation dispatch.

use crate::account;
use crate::chain::Chain;
use covenant_store::LedgerStore;
use covenant_transactions::Operation;
use covenant_types::{LedgerError, LedgerEvent, Timestamp};
use covenant_voting::update_witness;

impl<S: LedgerStore> Chain<S> {
    /// Apply one already-authorised operation at head time `now`.
    pub(crate) fn apply_operation(
        &mut self,
        op: &Operation,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        let store = &mut self.store;
        match op {
            Operation::AccountCreate(op) => {
                account::account_create(store, &self.graph, op, now, events)
            }
            Operation::AccountUpdate(op) => account::account_update(
                store,
                op,
                self.params.owner_update_limit,
                now,
                events,
            ),
            Operation::WitnessUpdate(op) => {
                update_witness(store, &op.owner, &op.url, op.block_signing_key, now).map(|_| ())
            }
            Operation::AccountWitnessVote(op) => {
                self.graph
                    .cast_witness_vote(store, &op.account, &op.witness, op.approve, events)
            }
            Operation::AccountWitnessProxy(op) => {
                self.graph
                    .set_proxy(store, &op.account, op.proxy.as_ref(), events)
            }
            Operation::TransferToVesting(op) => {
                account::transfer_to_vesting(store, &self.graph, op, events).map(|_| ())
            }
            Operation::WithdrawVesting(op) => {
                self.withdrawals
                    .set_withdraw(store, &op.account, op.vesting_shares.amount, now)
            }
            Operation::SetWithdrawVestingRoute(op) => self.withdrawals.set_route(
                store,
                &op.from_account,
                &op.to_account,
                op.percent,
                op.auto_vest,
            ),
            Operation::DelegateVestingShares(op) => self.delegations.delegate(
                store,
                &op.delegator,
                &op.delegatee,
                op.vesting_shares.amount,
                now,
            ),
            Operation::ClaimAccount(op) => account::claim_account(store, op),
            Operation::CreateClaimedAccount(op) => {
                account::create_claimed_account(store, op, now, events)
            }
            Operation::RequestAccountRecovery(op) => self.recovery.request_account_recovery(
                store,
                &op.recovery_account,
                &op.account_to_recover,
                &op.new_owner_authority,
                now,
            ),
            Operation::RecoverAccount(op) => self.recovery.recover_account(
                store,
                &op.account_to_recover,
                &op.new_owner_authority,
                &op.recent_owner_authority,
                now,
                events,
            ),
            Operation::ChangeRecoveryAccount(op) => self.recovery.change_recovery_account(
                store,
                &op.account_to_recover,
                &op.new_recovery_account,
                now,
            ),
            Operation::ClaimRewardBalance(op) => self.rewards.claim_reward_balance(
                store,
                &self.graph,
                &op.account,
                op.reward_steem.amount,
                op.reward_sbd.amount,
                op.reward_vests.amount,
                events,
            ),
        }
    }
}
