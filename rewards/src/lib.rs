//! Reward accrual for the covenant ledger.
//!
//! Reward funds hold a STEEM balance and a decaying sum of recent claims.
//! Content earns a claim through a reward curve; its payout is its share of
//! the balance in proportion to that claim. Payouts land in an account's
//! pending reward balances and become spendable once claimed.

pub mod curve;
pub mod engine;

pub use curve::{isqrt, RewardCurve};
pub use engine::RewardAccrualEngine;
