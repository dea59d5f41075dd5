//! Prometheus metrics for block application.
//!
//! [`ChainMetrics`] owns its own [`Registry`] so several chains (or tests)
//! can run in one process without colliding on metric names.

use covenant_types::LedgerEvent;
use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

pub struct ChainMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub blocks_applied: IntCounter,
    pub blocks_rejected: IntCounter,
    pub transactions_applied: IntCounter,
    pub transactions_rejected: IntCounter,
    /// Applied operations, labelled by operation name.
    pub operations_applied: IntCounterVec,
    pub power_down_fills: IntCounter,
    pub delegation_returns: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub head_block: IntGauge,
    pub account_count: IntGauge,
}

impl ChainMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let blocks_applied = register_int_counter_with_registry!(
            Opts::new("covenant_blocks_applied_total", "Blocks applied to the state"),
            registry
        )?;
        let blocks_rejected = register_int_counter_with_registry!(
            Opts::new(
                "covenant_blocks_rejected_total",
                "Blocks rolled back because a transaction or maintenance failed"
            ),
            registry
        )?;
        let transactions_applied = register_int_counter_with_registry!(
            Opts::new("covenant_transactions_applied_total", "Transactions applied"),
            registry
        )?;
        let transactions_rejected = register_int_counter_with_registry!(
            Opts::new("covenant_transactions_rejected_total", "Transactions rejected"),
            registry
        )?;
        let operations_applied = register_int_counter_vec_with_registry!(
            Opts::new("covenant_operations_applied_total", "Operations applied by kind"),
            &["op"],
            registry
        )?;
        let power_down_fills = register_int_counter_with_registry!(
            Opts::new(
                "covenant_power_down_fills_total",
                "Power-down payments delivered to a destination"
            ),
            registry
        )?;
        let delegation_returns = register_int_counter_with_registry!(
            Opts::new(
                "covenant_delegation_returns_total",
                "Cancelled delegation reserves released"
            ),
            registry
        )?;
        let head_block = register_int_gauge_with_registry!(
            Opts::new("covenant_head_block", "Number of the last applied block"),
            registry
        )?;
        let account_count = register_int_gauge_with_registry!(
            Opts::new("covenant_account_count", "Accounts in the state"),
            registry
        )?;

        Ok(Self {
            registry,
            blocks_applied,
            blocks_rejected,
            transactions_applied,
            transactions_rejected,
            operations_applied,
            power_down_fills,
            delegation_returns,
            head_block,
            account_count,
        })
    }

    /// Count the maintenance events of an applied block.
    pub fn observe_events(&self, events: &[LedgerEvent]) {
        for event in events {
            match event {
                LedgerEvent::FillVestingWithdraw { .. } => self.power_down_fills.inc(),
                LedgerEvent::ReturnVestingDelegation { .. } => self.delegation_returns.inc(),
                _ => {}
            }
        }
    }

    /// Encode every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_types::{AccountName, Asset};

    #[test]
    fn counts_fills_and_returns() {
        let metrics = ChainMetrics::new().unwrap();
        let alice = AccountName::new("alice").unwrap();
        metrics.observe_events(&[
            LedgerEvent::FillVestingWithdraw {
                from: alice.clone(),
                to: alice.clone(),
                withdrawn: Asset::vests(1),
                deposited: Asset::steem(0),
            },
            LedgerEvent::ReturnVestingDelegation {
                account: alice.clone(),
                vesting_shares: Asset::vests(1),
            },
            LedgerEvent::AccountRecovered { account: alice },
        ]);
        assert_eq!(metrics.power_down_fills.get(), 1);
        assert_eq!(metrics.delegation_returns.get(), 1);
    }

    #[test]
    fn text_encoding_names_metrics() {
        let metrics = ChainMetrics::new().unwrap();
        metrics.blocks_applied.inc();
        metrics.operations_applied.with_label_values(&["account_create"]).inc();
        let text = metrics.encode().unwrap();
        assert!(text.contains("covenant_blocks_applied_total 1"));
        assert!(text.contains("op=\"account_create\""));
    }

    #[test]
    fn independent_registries() {
        let a = ChainMetrics::new().unwrap();
        let b = ChainMetrics::new().unwrap();
        a.head_block.set(10);
        assert_eq!(b.head_block.get(), 0);
    }
}
