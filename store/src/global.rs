//! Chain-wide dynamic properties.

use crate::StoreError;
use covenant_types::{Timestamp, VestingPrice};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalProperties {
    pub head_block_number: u64,
    pub time: Timestamp,
    /// Raw STEEM in existence, liquid or vested.
    pub current_supply: i64,
    pub current_sbd_supply: i64,
    /// Raw STEEM backing all vesting shares.
    pub total_vesting_fund_steem: i64,
    pub total_vesting_shares: i64,
    /// Reward vests credited to accounts but not yet claimed.
    pub pending_rewarded_vesting_shares: i64,
    pub pending_rewarded_vesting_steem: i64,
    /// Raw STEEM charged by `account_create` and `claim_account`.
    pub account_creation_fee: i64,
}

impl GlobalProperties {
    pub fn vesting_share_price(&self) -> VestingPrice {
        VestingPrice::from_totals(self.total_vesting_fund_steem, self.total_vesting_shares)
    }
}

pub trait GlobalStore {
    fn globals(&self) -> Result<GlobalProperties, StoreError>;
    fn put_globals(&mut self, globals: &GlobalProperties) -> Result<(), StoreError>;
}
