//! Transaction-level authority verification.

use crate::required::RequiredAuthorities;
use crate::sign_state::SignState;
use crate::source::AuthoritySource;
use covenant_types::{AuthorityError, AuthorityTier, ChainParams, LedgerError, PublicKey};
use std::collections::BTreeSet;

/// Check that `signers` satisfy everything in `required` and nothing more.
///
/// Posting requirements are checked on their own: a transaction needing
/// posting authority may not also need owner, active or explicit
/// authorities. Account members met during the posting check resolve
/// through their posting authority, everywhere else through active.
///
/// After all requirements pass, any signer whose key was not consumed makes
/// the transaction fail with `IrrelevantSignature`.
pub fn verify_authority<S: AuthoritySource + ?Sized>(
    source: &S,
    required: &RequiredAuthorities,
    signers: &BTreeSet<PublicKey>,
    params: &ChainParams,
) -> Result<(), LedgerError> {
    if !required.posting.is_empty() {
        if !required.active.is_empty() || !required.owner.is_empty() || !required.other.is_empty()
        {
            return Err(AuthorityError::PostingMixedWithActive.into());
        }
        let mut state =
            SignState::new(source, signers, params).with_member_tier(AuthorityTier::Posting);
        for account in &required.posting {
            let satisfied = state.check_account(account, AuthorityTier::Posting)?
                || state.check_account(account, AuthorityTier::Active)?
                || state.check_account(account, AuthorityTier::Owner)?;
            if !satisfied {
                return Err(AuthorityError::MissingPostingAuth(account.clone()).into());
            }
        }
        return reject_unused(&mut state);
    }

    let mut state = SignState::new(source, signers, params);

    for authority in &required.other {
        if !state.check_authority(authority)? {
            return Err(AuthorityError::MissingOtherAuth.into());
        }
    }
    for account in &required.active {
        let satisfied = state.check_account(account, AuthorityTier::Active)?
            || state.check_account(account, AuthorityTier::Owner)?;
        if !satisfied {
            return Err(AuthorityError::MissingActiveAuth(account.clone()).into());
        }
    }
    for account in &required.owner {
        if !state.check_account(account, AuthorityTier::Owner)? {
            return Err(AuthorityError::MissingOwnerAuth(account.clone()).into());
        }
    }
    reject_unused(&mut state)
}

fn reject_unused<S: AuthoritySource + ?Sized>(state: &mut SignState<'_, S>) -> Result<(), LedgerError> {
    if state.remove_unused_signatures() {
        tracing::debug!("transaction rejected: irrelevant signature");
        return Err(AuthorityError::IrrelevantSignature.into());
    }
    Ok(())
}
