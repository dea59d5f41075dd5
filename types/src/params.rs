//! Chain parameters.
//!
//! Every value here changes consensus results: two nodes replaying the same
//! history must run with identical parameters. `mainnet()` carries the values
//! the live network uses; `testnet()` shortens the long waiting periods so
//! integration tests can walk through them in a handful of blocks.

use serde::{Deserialize, Serialize};

/// Basis points representing 100%.
pub const PERCENT_100: u16 = 10_000;

/// Longest proxy chain above any account. Also the number of per-depth
/// proxied-weight slots each account carries, so it is fixed at compile time.
pub const MAX_PROXY_RECURSION_DEPTH: usize = 4;

/// Longest url a witness may publish.
pub const MAX_WITNESS_URL_LENGTH: usize = 2048;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    // ── Blocks ───────────────────────────────────────────────────────────
    /// Seconds between blocks.
    pub block_interval: u64,

    /// Furthest into the future a transaction expiration may be set.
    pub max_time_until_expiration: u64,

    // ── Power-down ───────────────────────────────────────────────────────
    /// Number of payments a withdrawal is split into.
    pub vesting_withdraw_intervals: u32,

    /// Seconds between withdrawal payments.
    pub vesting_withdraw_interval_seconds: u64,

    /// Maximum withdraw routes per account.
    pub max_withdraw_routes: u16,

    // ── Delegation ───────────────────────────────────────────────────────
    /// Seconds a cancelled delegation stays reserved against the delegator.
    pub delegation_return_period: u64,

    // ── Voting ───────────────────────────────────────────────────────────
    /// Maximum witnesses a single account may approve.
    pub max_account_witness_votes: u16,

    // ── Authorities ──────────────────────────────────────────────────────
    /// Levels of account-in-authority nesting followed during signature checks.
    pub max_sig_check_depth: u32,

    /// Accounts visited per signature check before the check fails closed.
    pub max_sig_check_accounts: usize,

    /// Keys plus accounts allowed in one authority.
    pub max_authority_membership: usize,

    // ── Recovery ─────────────────────────────────────────────────────────
    /// Minimum seconds between two owner authority changes.
    pub owner_update_limit: u64,

    /// How long a superseded owner authority can still be used to recover.
    pub owner_auth_recovery_period: u64,

    /// Lifetime of a recovery request.
    pub account_recovery_request_expiration_period: u64,

    // ── Rewards ──────────────────────────────────────────────────────────
    /// Time constant of the recent-claims decay.
    pub recent_rshares_decay_time: u64,
}

impl ChainParams {
    pub fn mainnet() -> Self {
        Self {
            block_interval: 3,
            max_time_until_expiration: 3_600,
            vesting_withdraw_intervals: 13,
            vesting_withdraw_interval_seconds: 60 * 60 * 24 * 7,
            max_withdraw_routes: 10,
            delegation_return_period: 60 * 60 * 24 * 5,
            max_account_witness_votes: 30,
            max_sig_check_depth: 2,
            max_sig_check_accounts: 125,
            max_authority_membership: 40,
            owner_update_limit: 60 * 60,
            owner_auth_recovery_period: 60 * 60 * 24 * 30,
            account_recovery_request_expiration_period: 60 * 60 * 24,
            recent_rshares_decay_time: 60 * 60 * 24 * 15,
        }
    }

    /// Short periods for local networks. Interval counts and structural limits
    /// match mainnet.
    pub fn testnet() -> Self {
        Self {
            vesting_withdraw_interval_seconds: 60,
            delegation_return_period: 60 * 60,
            owner_update_limit: 60,
            owner_auth_recovery_period: 60 * 10,
            account_recovery_request_expiration_period: 60 * 5,
            ..Self::mainnet()
        }
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::mainnet()
    }
}
