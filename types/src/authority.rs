//! Weighted-threshold authorities.

use crate::error::ValidationError;
use crate::keys::PublicKey;
use crate::name::AccountName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Privilege tier of an authority, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityTier {
    Owner,
    Active,
    Posting,
}

impl fmt::Display for AuthorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityTier::Owner => write!(f, "owner"),
            AuthorityTier::Active => write!(f, "active"),
            AuthorityTier::Posting => write!(f, "posting"),
        }
    }
}

/// A set of keys and accounts that must jointly reach `weight_threshold`.
///
/// Maps are ordered so that iteration, and therefore signature consumption, is
/// identical on every node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub weight_threshold: u32,
    #[serde(default)]
    pub account_auths: BTreeMap<AccountName, u16>,
    #[serde(default)]
    pub key_auths: BTreeMap<PublicKey, u16>,
}

impl Authority {
    pub fn new(weight_threshold: u32) -> Self {
        Self {
            weight_threshold,
            ..Self::default()
        }
    }

    /// Threshold 1 satisfied by a single key.
    pub fn single_key(key: PublicKey) -> Self {
        Self::new(1).with_key(key, 1)
    }

    pub fn with_key(mut self, key: PublicKey, weight: u16) -> Self {
        self.key_auths.insert(key, weight);
        self
    }

    pub fn with_account(mut self, account: AccountName, weight: u16) -> Self {
        self.account_auths.insert(account, weight);
        self
    }

    pub fn num_auths(&self) -> usize {
        self.account_auths.len() + self.key_auths.len()
    }

    /// Satisfied without any signature.
    pub fn is_open(&self) -> bool {
        self.weight_threshold == 0
    }

    /// No combination of members can reach the threshold.
    pub fn is_impossible(&self) -> bool {
        let total: u64 = self
            .account_auths
            .values()
            .chain(self.key_auths.values())
            .map(|w| u64::from(*w))
            .sum();
        total < u64::from(self.weight_threshold)
    }

    /// Structural checks that need no chain state.
    pub fn validate(&self, max_membership: usize) -> Result<(), ValidationError> {
        if self.num_auths() > max_membership {
            return Err(ValidationError::AuthorityTooLarge {
                members: self.num_auths(),
                max: max_membership,
            });
        }
        Ok(())
    }
}
