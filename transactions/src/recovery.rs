//! Account recovery operations.

use covenant_types::{AccountName, Authority};
use serde::{Deserialize, Serialize};

/// Filed by the recovery partner. A zero-threshold authority cancels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAccountRecoveryOp {
    pub recovery_account: AccountName,
    pub account_to_recover: AccountName,
    pub new_owner_authority: Authority,
    pub extensions: Vec<String>,
}

/// Signed by both the requested new owner and a recent owner authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverAccountOp {
    pub account_to_recover: AccountName,
    pub new_owner_authority: Authority,
    pub recent_owner_authority: Authority,
    pub extensions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecoveryAccountOp {
    pub account_to_recover: AccountName,
    pub new_recovery_account: AccountName,
    pub extensions: Vec<String>,
}
