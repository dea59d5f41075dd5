//! Account lifecycle operations.

use covenant_types::{AccountName, Asset, Authority, PublicKey};
use serde::{Deserialize, Serialize};

/// Create an account, paying the creation fee into its vesting shares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreateOp {
    pub fee: Asset,
    pub creator: AccountName,
    pub new_account_name: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub posting: Authority,
    pub memo_key: PublicKey,
    /// Empty, or a JSON document.
    pub json_metadata: String,
}

/// Replace any of an account's authorities, memo key or metadata.
///
/// Changing `owner` needs the owner authority; everything else needs active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdateOp {
    pub account: AccountName,
    pub owner: Option<Authority>,
    pub active: Option<Authority>,
    pub posting: Option<Authority>,
    pub memo_key: Option<PublicKey>,
    /// Empty leaves the metadata unchanged.
    pub json_metadata: String,
}

/// Pay the creation fee now for an account to be created later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAccountOp {
    pub creator: AccountName,
    pub fee: Asset,
    pub extensions: Vec<String>,
}

/// Create an account from a previously claimed slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClaimedAccountOp {
    pub creator: AccountName,
    pub new_account_name: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub posting: Authority,
    pub memo_key: PublicKey,
    pub json_metadata: String,
    pub extensions: Vec<String>,
}
