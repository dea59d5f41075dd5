//! Authorities a transaction must satisfy.

use covenant_types::{AccountName, Authority};
use std::collections::BTreeSet;

/// The union of what every operation in a transaction requires.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredAuthorities {
    pub owner: BTreeSet<AccountName>,
    pub active: BTreeSet<AccountName>,
    pub posting: BTreeSet<AccountName>,
    /// Explicit authorities that are not any account's current authority,
    /// such as the two owner authorities proven during recovery.
    pub other: Vec<Authority>,
}

impl RequiredAuthorities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(account: AccountName) -> Self {
        let mut required = Self::new();
        required.owner.insert(account);
        required
    }

    pub fn active(account: AccountName) -> Self {
        let mut required = Self::new();
        required.active.insert(account);
        required
    }

    pub fn posting(account: AccountName) -> Self {
        let mut required = Self::new();
        required.posting.insert(account);
        required
    }

    pub fn merge(&mut self, other: RequiredAuthorities) {
        self.owner.extend(other.owner);
        self.active.extend(other.active);
        self.posting.extend(other.posting);
        self.other.extend(other.other);
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
            && self.active.is_empty()
            && self.posting.is_empty()
            && self.other.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_unions_tiers() {
        let alice = AccountName::new("alice").unwrap();
        let bob = AccountName::new("bob").unwrap();
        let mut required = RequiredAuthorities::active(alice.clone());
        required.merge(RequiredAuthorities::active(alice.clone()));
        required.merge(RequiredAuthorities::owner(bob.clone()));
        assert_eq!(required.active.len(), 1);
        assert!(required.owner.contains(&bob));
        assert!(!required.is_empty());
        assert!(RequiredAuthorities::new().is_empty());
    }
}
