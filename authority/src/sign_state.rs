//! Iterative evaluation of weighted authorities against a signer set.

use crate::source::AuthoritySource;
use covenant_store::StoreError;
use covenant_types::{AccountName, Authority, AuthorityTier, ChainParams, PublicKey};
use std::collections::{BTreeMap, BTreeSet};

/// Signature bookkeeping for one transaction.
///
/// Tracks which supplied keys were actually needed and which accounts have
/// already been shown to approve, so that a nested account appearing in
/// several authorities is only walked once. Account members are resolved
/// through `member_tier`, which is active unless set otherwise.
pub struct SignState<'a, S: AuthoritySource + ?Sized> {
    source: &'a S,
    /// Supplied keys and whether any satisfied authority consumed them.
    provided: BTreeMap<PublicKey, bool>,
    approved_by: BTreeSet<AccountName>,
    member_tier: AuthorityTier,
    max_depth: u32,
    max_accounts: usize,
    visited: usize,
}

struct Frame {
    threshold: u64,
    total: u64,
    depth: u32,
    accounts: Vec<(AccountName, u16)>,
    next_account: usize,
    /// Member whose authority is being walked one level down.
    pending: Option<(AccountName, u16)>,
}

enum Start {
    Satisfied,
    Open(Frame),
}

enum Action {
    Finish(bool),
    Descend(Authority, u32),
}

impl<'a, S: AuthoritySource + ?Sized> SignState<'a, S> {
    pub fn new(source: &'a S, signers: &BTreeSet<PublicKey>, params: &ChainParams) -> Self {
        Self {
            source,
            provided: signers.iter().map(|k| (*k, false)).collect(),
            approved_by: BTreeSet::new(),
            member_tier: AuthorityTier::Active,
            max_depth: params.max_sig_check_depth,
            max_accounts: params.max_sig_check_accounts,
            visited: 0,
        }
    }

    /// Resolve account members through `tier` instead of active authority.
    pub fn with_member_tier(mut self, tier: AuthorityTier) -> Self {
        self.member_tier = tier;
        self
    }

    /// Check one tier of an account. Unknown accounts are never satisfied.
    pub fn check_account(
        &mut self,
        account: &AccountName,
        tier: AuthorityTier,
    ) -> Result<bool, StoreError> {
        if tier == self.member_tier && self.approved_by.contains(account) {
            return Ok(true);
        }
        match self.source.authority(account, tier)? {
            Some(authority) => self.check_authority(&authority),
            None => Ok(false),
        }
    }

    /// Check an explicit authority, walking account members down to the
    /// configured depth with an explicit stack.
    pub fn check_authority(&mut self, root: &Authority) -> Result<bool, StoreError> {
        let mut stack = match self.start(root, 0) {
            Start::Satisfied => return Ok(true),
            Start::Open(frame) => vec![frame],
        };
        let mut returned: Option<bool> = None;

        while let Some(frame) = stack.last_mut() {
            if let Some(satisfied) = returned.take() {
                if let Some((member, weight)) = frame.pending.take() {
                    if satisfied {
                        self.approved_by.insert(member);
                        frame.total += u64::from(weight);
                    }
                }
            }

            match self.next_action(frame)? {
                Action::Finish(result) => {
                    stack.pop();
                    if stack.is_empty() {
                        return Ok(result);
                    }
                    returned = Some(result);
                }
                Action::Descend(authority, depth) => match self.start(&authority, depth) {
                    Start::Satisfied => returned = Some(true),
                    Start::Open(child) => stack.push(child),
                },
            }
        }
        Ok(false)
    }

    /// Whether any supplied key went unused. Also forgets the unused keys.
    pub fn remove_unused_signatures(&mut self) -> bool {
        let before = self.provided.len();
        self.provided.retain(|_, used| *used);
        self.provided.len() != before
    }

    /// Apply the key members of an authority. Keys are consumed only until
    /// the threshold is reached.
    fn start(&mut self, authority: &Authority, depth: u32) -> Start {
        let threshold = u64::from(authority.weight_threshold);
        let mut total = 0u64;
        for (key, weight) in &authority.key_auths {
            if let Some(used) = self.provided.get_mut(key) {
                *used = true;
                total += u64::from(*weight);
                if total >= threshold {
                    return Start::Satisfied;
                }
            }
        }
        Start::Open(Frame {
            threshold,
            total,
            depth,
            accounts: authority
                .account_auths
                .iter()
                .map(|(name, weight)| (name.clone(), *weight))
                .collect(),
            next_account: 0,
            pending: None,
        })
    }

    fn next_action(&mut self, frame: &mut Frame) -> Result<Action, StoreError> {
        if frame.total >= frame.threshold {
            return Ok(Action::Finish(true));
        }
        while let Some((member, weight)) = frame.accounts.get(frame.next_account).cloned() {
            frame.next_account += 1;

            if self.approved_by.contains(&member) {
                frame.total += u64::from(weight);
                if frame.total >= frame.threshold {
                    return Ok(Action::Finish(true));
                }
                continue;
            }
            if frame.depth >= self.max_depth {
                continue;
            }
            if self.visited >= self.max_accounts {
                tracing::debug!(limit = self.max_accounts, "signature check account budget exhausted");
                return Ok(Action::Finish(false));
            }
            self.visited += 1;

            if let Some(authority) = self.source.authority(&member, self.member_tier)? {
                frame.pending = Some((member, weight));
                return Ok(Action::Descend(authority, frame.depth + 1));
            }
        }
        Ok(Action::Finish(frame.total >= frame.threshold))
    }
}
