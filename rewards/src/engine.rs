//! Reward fund accrual and pending reward balances.

use crate::curve::RewardCurve;
use covenant_store::{
    require_account, AccountStore, GlobalStore, RewardFund, RewardFundStore, WitnessStore,
};
use covenant_types::asset::{checked_add, checked_sub, mul_div};
use covenant_types::{
    AccountName, Asset, ChainParams, LedgerError, LedgerEvent, StateError, Symbol, Timestamp,
    ValidationError,
};
use covenant_voting::ProxyVoteGraph;

/// Decays fund claims, credits rewards and pays out claimed balances.
#[derive(Clone, Debug)]
pub struct RewardAccrualEngine {
    decay_time: u64,
}

impl RewardAccrualEngine {
    pub fn new(decay_time: u64) -> Self {
        Self { decay_time }
    }

    pub fn from_params(params: &ChainParams) -> Self {
        Self::new(params.recent_rshares_decay_time)
    }

    /// Decay a fund's recent claims linearly over the time since its last
    /// update. Claims older than the full decay time vanish entirely.
    pub fn decay_recent_claims<S>(
        &self,
        store: &mut S,
        fund: &str,
        now: Timestamp,
    ) -> Result<RewardFund, LedgerError>
    where
        S: RewardFundStore + ?Sized,
    {
        let mut state = store.get_reward_fund(fund)?;
        let elapsed = state.last_update.elapsed_since(now);
        if elapsed >= self.decay_time {
            state.recent_claims = 0;
        } else if self.decay_time > 0 {
            let decay = state
                .recent_claims
                .checked_mul(u128::from(elapsed))
                .ok_or(StateError::Overflow)?
                / u128::from(self.decay_time);
            state.recent_claims -= decay;
        }
        state.last_update = now;
        store.put_reward_fund(&state)?;
        Ok(state)
    }

    /// Decay every fund. Runs once per block.
    pub fn decay_all<S>(&self, store: &mut S, now: Timestamp) -> Result<(), LedgerError>
    where
        S: RewardFundStore + ?Sized,
    {
        for fund in store.iter_reward_funds()? {
            self.decay_recent_claims(store, &fund.name, now)?;
        }
        Ok(())
    }

    /// Add the claim earned by `rshares` under the fund's own curve.
    pub fn credit_content_reward<S>(
        &self,
        store: &mut S,
        fund: &str,
        rshares: u128,
    ) -> Result<u128, LedgerError>
    where
        S: RewardFundStore + ?Sized,
    {
        let curve = store.get_reward_fund(fund)?.author_reward_curve;
        self.credit_content_reward_with(store, fund, rshares, &curve)
    }

    /// Add the claim earned by `rshares` under an explicit curve.
    pub fn credit_content_reward_with<S, C>(
        &self,
        store: &mut S,
        fund: &str,
        rshares: u128,
        curve: &C,
    ) -> Result<u128, LedgerError>
    where
        S: RewardFundStore + ?Sized,
        C: RewardCurve + ?Sized,
    {
        let mut state = store.get_reward_fund(fund)?;
        let claim = curve.evaluate(rshares, state.content_constant)?;
        state.recent_claims = state
            .recent_claims
            .checked_add(claim)
            .ok_or(StateError::Overflow)?;
        store.put_reward_fund(&state)?;
        Ok(claim)
    }

    /// Pay out the fund's share for `claim` and deduct it from the balance.
    pub fn payout_share<S>(
        &self,
        store: &mut S,
        fund: &str,
        claim: u128,
    ) -> Result<i64, LedgerError>
    where
        S: RewardFundStore + ?Sized,
    {
        let mut state = store.get_reward_fund(fund)?;
        if state.recent_claims == 0 || state.reward_balance <= 0 {
            return Ok(0);
        }
        let claim = claim.min(state.recent_claims);
        let balance = u128::try_from(state.reward_balance).map_err(|_| StateError::Overflow)?;
        let share = balance
            .checked_mul(claim)
            .ok_or(StateError::Overflow)?
            / state.recent_claims;
        let share = i64::try_from(share).map_err(|_| StateError::Overflow)?;
        state.reward_balance = checked_sub(state.reward_balance, share)?;
        store.put_reward_fund(&state)?;
        tracing::trace!(fund, share, "reward payout");
        Ok(share)
    }

    /// Credit pending rewards. `vesting_steem` is converted to pending vests
    /// at the current price and set aside until claimed.
    pub fn credit_account_reward<S>(
        &self,
        store: &mut S,
        account: &AccountName,
        steem: i64,
        sbd: i64,
        vesting_steem: i64,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + GlobalStore + ?Sized,
    {
        if steem < 0 || sbd < 0 || vesting_steem < 0 {
            return Err(ValidationError::NegativeAmount.into());
        }
        let mut state = require_account(store, account)?;
        let mut globals = store.globals()?;
        let vests = globals.vesting_share_price().to_vests(vesting_steem)?;

        state.reward_steem_balance = checked_add(state.reward_steem_balance, steem)?;
        state.reward_sbd_balance = checked_add(state.reward_sbd_balance, sbd)?;
        state.reward_vesting_balance = checked_add(state.reward_vesting_balance, vests)?;
        state.reward_vesting_steem = checked_add(state.reward_vesting_steem, vesting_steem)?;
        globals.pending_rewarded_vesting_shares =
            checked_add(globals.pending_rewarded_vesting_shares, vests)?;
        globals.pending_rewarded_vesting_steem =
            checked_add(globals.pending_rewarded_vesting_steem, vesting_steem)?;

        store.put_account(&state)?;
        store.put_globals(&globals)?;
        Ok(())
    }

    /// Move pending rewards into spendable balances and vesting shares.
    #[allow(clippy::too_many_arguments)]
    pub fn claim_reward_balance<S>(
        &self,
        store: &mut S,
        graph: &ProxyVoteGraph,
        account: &AccountName,
        steem: i64,
        sbd: i64,
        vests: i64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + GlobalStore + WitnessStore + ?Sized,
    {
        if steem < 0 || sbd < 0 || vests < 0 {
            return Err(ValidationError::NegativeAmount.into());
        }
        if steem == 0 && sbd == 0 && vests == 0 {
            return Err(ValidationError::NothingToClaim.into());
        }
        let mut state = require_account(store, account)?;
        if steem > state.reward_steem_balance {
            return Err(StateError::ClaimExceedsPending(Symbol::Steem).into());
        }
        if sbd > state.reward_sbd_balance {
            return Err(StateError::ClaimExceedsPending(Symbol::Sbd).into());
        }
        if vests > state.reward_vesting_balance {
            return Err(StateError::ClaimExceedsPending(Symbol::Vests).into());
        }

        let vesting_steem = if vests == state.reward_vesting_balance {
            state.reward_vesting_steem
        } else {
            mul_div(state.reward_vesting_steem, vests, state.reward_vesting_balance)?
        };

        state.reward_steem_balance -= steem;
        state.balance = checked_add(state.balance, steem)?;
        state.reward_sbd_balance -= sbd;
        state.sbd_balance = checked_add(state.sbd_balance, sbd)?;
        state.reward_vesting_balance -= vests;
        state.reward_vesting_steem = checked_sub(state.reward_vesting_steem, vesting_steem)?;
        state.vesting_shares = checked_add(state.vesting_shares, vests)?;
        store.put_account(&state)?;

        let mut globals = store.globals()?;
        globals.total_vesting_shares = checked_add(globals.total_vesting_shares, vests)?;
        globals.total_vesting_fund_steem =
            checked_add(globals.total_vesting_fund_steem, vesting_steem)?;
        globals.pending_rewarded_vesting_shares =
            checked_sub(globals.pending_rewarded_vesting_shares, vests)?;
        globals.pending_rewarded_vesting_steem =
            checked_sub(globals.pending_rewarded_vesting_steem, vesting_steem)?;
        store.put_globals(&globals)?;

        graph.adjust_proxied_witness_votes(store, &state, vests, events)?;
        events.push(LedgerEvent::RewardBalanceClaimed {
            account: account.clone(),
            steem: Asset::steem(steem),
            sbd: Asset::sbd(sbd),
            vests: Asset::vests(vests),
        });
        Ok(())
    }
}
