//! Reward claims.

use covenant_types::{AccountName, Asset};
use serde::{Deserialize, Serialize};

/// Move pending rewards into spendable balances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRewardBalanceOp {
    pub account: AccountName,
    pub reward_steem: Asset,
    pub reward_sbd: Asset,
    pub reward_vests: Asset,
}
