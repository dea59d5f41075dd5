//! Witness registration, approval votes and proxies.

use covenant_types::{AccountName, PublicKey};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessUpdateOp {
    pub owner: AccountName,
    pub url: String,
    pub block_signing_key: PublicKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWitnessVoteOp {
    pub account: AccountName,
    pub witness: AccountName,
    /// `false` withdraws an existing approval.
    pub approve: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWitnessProxyOp {
    pub account: AccountName,
    /// `None` clears the proxy.
    pub proxy: Option<AccountName>,
}
