//! Reward funds.

use crate::StoreError;
use covenant_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Shape of the curve mapping content rshares to reward claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Linear,
    Quadratic,
    ConvergentLinear,
    SquareRoot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardFund {
    pub name: String,
    /// Raw STEEM available for payouts.
    pub reward_balance: i64,
    /// Decaying sum of curve-evaluated claims.
    pub recent_claims: u128,
    pub last_update: Timestamp,
    pub content_constant: u128,
    pub author_reward_curve: CurveKind,
    /// Basis points of a payout reserved for curators.
    pub percent_curation_rewards: u16,
}

pub trait RewardFundStore {
    fn find_reward_fund(&self, name: &str) -> Result<Option<RewardFund>, StoreError>;
    fn put_reward_fund(&mut self, fund: &RewardFund) -> Result<(), StoreError>;
    /// All funds ordered by name.
    fn iter_reward_funds(&self) -> Result<Vec<RewardFund>, StoreError>;

    fn get_reward_fund(&self, name: &str) -> Result<RewardFund, StoreError> {
        self.find_reward_fund(name)?
            .ok_or_else(|| StoreError::NotFound(format!("reward fund {name}")))
    }
}
