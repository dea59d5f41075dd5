//! Power-down scheduling and withdraw routes.

use covenant_store::{
    require_account, AccountStore, GlobalStore, WithdrawRoute, WithdrawRouteStore, WitnessStore,
};
use covenant_types::asset::{checked_add, checked_sub, mul_div};
use covenant_types::params::PERCENT_100;
use covenant_types::{
    AccountName, Asset, ChainParams, LedgerError, LedgerEvent, StateError, Timestamp,
    ValidationError,
};
use covenant_voting::ProxyVoteGraph;

/// Starts, replaces and cancels power-downs, and pays them out.
#[derive(Clone, Debug)]
pub struct WithdrawalScheduler {
    intervals: u32,
    interval_seconds: u64,
    max_routes: u16,
}

impl WithdrawalScheduler {
    pub fn new(intervals: u32, interval_seconds: u64, max_routes: u16) -> Self {
        Self {
            intervals,
            interval_seconds,
            max_routes,
        }
    }

    pub fn from_params(params: &ChainParams) -> Self {
        Self::new(
            params.vesting_withdraw_intervals,
            params.vesting_withdraw_interval_seconds,
            params.max_withdraw_routes,
        )
    }

    /// Begin powering down `vesting_shares`, replacing any active schedule.
    /// Zero cancels the active power-down.
    pub fn set_withdraw<S>(
        &self,
        store: &mut S,
        account: &AccountName,
        vesting_shares: i64,
        now: Timestamp,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + ?Sized,
    {
        if vesting_shares < 0 {
            return Err(ValidationError::NegativeAmount.into());
        }
        let mut state = require_account(store, account)?;
        let available = checked_sub(state.vesting_shares, state.delegated_vesting_shares)?;
        if vesting_shares > available {
            return Err(StateError::InsufficientAvailableStake {
                available,
                requested: vesting_shares,
            }
            .into());
        }

        if vesting_shares == 0 {
            if state.vesting_withdraw_rate == 0 {
                return Err(StateError::WithdrawUnchanged.into());
            }
            state.vesting_withdraw_rate = 0;
            state.to_withdraw = 0;
            state.next_vesting_withdrawal = Timestamp::MAX;
            tracing::debug!(account = %account, "power-down cancelled");
        } else {
            let rate = (vesting_shares / i64::from(self.intervals.max(1))).max(1);
            if rate == state.vesting_withdraw_rate {
                return Err(StateError::WithdrawUnchanged.into());
            }
            state.vesting_withdraw_rate = rate;
            state.to_withdraw = vesting_shares;
            state.next_vesting_withdrawal = now.plus_secs(self.interval_seconds);
            tracing::debug!(account = %account, vesting_shares, rate, "power-down started");
        }
        store.put_account(&state)?;
        Ok(())
    }

    /// Create, change or (with `percent == 0`) delete the route from `from` to `to`.
    pub fn set_route<S>(
        &self,
        store: &mut S,
        from: &AccountName,
        to: &AccountName,
        percent: u16,
        auto_vest: bool,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + WithdrawRouteStore + ?Sized,
    {
        if percent > PERCENT_100 {
            return Err(ValidationError::PercentOverflow(u32::from(percent)).into());
        }
        let mut owner = require_account(store, from)?;
        require_account(store, to)?;

        let others: u32 = store
            .routes_from(from)?
            .iter()
            .filter(|r| &r.to_account != to)
            .map(|r| u32::from(r.percent))
            .sum();
        let total = others + u32::from(percent);
        if total > u32::from(PERCENT_100) {
            return Err(ValidationError::PercentOverflow(total).into());
        }

        match store.find_route(from, to)? {
            None => {
                if percent == 0 {
                    return Err(ValidationError::EmptyRoute.into());
                }
                if owner.withdraw_routes >= self.max_routes {
                    return Err(ValidationError::TooManyRoutes(self.max_routes).into());
                }
                owner.withdraw_routes += 1;
                store.put_account(&owner)?;
            }
            Some(_) if percent == 0 => {
                store.remove_route(from, to)?;
                owner.withdraw_routes = owner.withdraw_routes.saturating_sub(1);
                store.put_account(&owner)?;
                return Ok(());
            }
            Some(_) => {}
        }
        store.put_route(&WithdrawRoute {
            from_account: from.clone(),
            to_account: to.clone(),
            percent,
            auto_vest,
        })?;
        Ok(())
    }

    /// Pay one installment to every account whose payment is due at `now`.
    /// Returns the number of accounts paid.
    pub fn tick<S>(
        &self,
        store: &mut S,
        graph: &ProxyVoteGraph,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<usize, LedgerError>
    where
        S: AccountStore + GlobalStore + WithdrawRouteStore + WitnessStore + ?Sized,
    {
        let due = store.withdrawals_due(now)?;
        for name in &due {
            self.pay_installment(store, graph, name, events)?;
        }
        Ok(due.len())
    }

    fn pay_installment<S>(
        &self,
        store: &mut S,
        graph: &ProxyVoteGraph,
        name: &AccountName,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(), LedgerError>
    where
        S: AccountStore + GlobalStore + WithdrawRouteStore + WitnessStore + ?Sized,
    {
        let account = store.get_account(name)?;
        let withdrawn = account
            .vesting_shares
            .min(account.vesting_withdraw_rate)
            .min(account.to_withdraw)
            .max(0);
        let routes = store.routes_from(name)?;
        let mut globals = store.globals()?;
        let mut routed = 0i64;

        // Auto-vest routes first: the shares stay in the pool and keep
        // their exact amount.
        for route in routes.iter().filter(|r| r.auto_vest) {
            let deposit = mul_div(withdrawn, i64::from(route.percent), i64::from(PERCENT_100))?;
            routed = checked_add(routed, deposit)?;
            if deposit == 0 {
                continue;
            }
            let mut to = store.get_account(&route.to_account)?;
            to.vesting_shares = checked_add(to.vesting_shares, deposit)?;
            store.put_account(&to)?;
            graph.adjust_proxied_witness_votes(store, &to, deposit, events)?;
            events.push(LedgerEvent::FillVestingWithdraw {
                from: name.clone(),
                to: route.to_account.clone(),
                withdrawn: Asset::vests(deposit),
                deposited: Asset::vests(deposit),
            });
        }

        for route in routes.iter().filter(|r| !r.auto_vest) {
            let deposit = mul_div(withdrawn, i64::from(route.percent), i64::from(PERCENT_100))?;
            routed = checked_add(routed, deposit)?;
            if deposit == 0 {
                continue;
            }
            let steem = globals.vesting_share_price().to_steem(deposit)?;
            let mut to = store.get_account(&route.to_account)?;
            to.balance = checked_add(to.balance, steem)?;
            store.put_account(&to)?;
            globals.total_vesting_fund_steem = checked_sub(globals.total_vesting_fund_steem, steem)?;
            globals.total_vesting_shares = checked_sub(globals.total_vesting_shares, deposit)?;
            events.push(LedgerEvent::FillVestingWithdraw {
                from: name.clone(),
                to: route.to_account.clone(),
                withdrawn: Asset::vests(deposit),
                deposited: Asset::steem(steem),
            });
        }

        let to_convert = checked_sub(withdrawn, routed)?;
        let steem = globals.vesting_share_price().to_steem(to_convert)?;
        globals.total_vesting_fund_steem = checked_sub(globals.total_vesting_fund_steem, steem)?;
        globals.total_vesting_shares = checked_sub(globals.total_vesting_shares, to_convert)?;
        store.put_globals(&globals)?;

        // Routes may point back at the account itself, so reload it.
        let mut account = store.get_account(name)?;
        account.vesting_shares = checked_sub(account.vesting_shares, withdrawn)?;
        account.balance = checked_add(account.balance, steem)?;
        account.to_withdraw = checked_sub(account.to_withdraw, withdrawn)?;
        if account.to_withdraw <= 0 || account.vesting_shares == 0 {
            account.vesting_withdraw_rate = 0;
            account.to_withdraw = 0;
            account.next_vesting_withdrawal = Timestamp::MAX;
            tracing::debug!(account = %name, "power-down complete");
        } else {
            account.next_vesting_withdrawal =
                account.next_vesting_withdrawal.plus_secs(self.interval_seconds);
        }
        store.put_account(&account)?;
        graph.adjust_proxied_witness_votes(store, &account, -withdrawn, events)?;

        events.push(LedgerEvent::FillVestingWithdraw {
            from: name.clone(),
            to: name.clone(),
            withdrawn: Asset::vests(withdrawn),
            deposited: Asset::steem(steem),
        });
        Ok(())
    }
}
