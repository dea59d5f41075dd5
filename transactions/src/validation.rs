//! Stateless validation.
//!
//! Everything here can be decided from the transaction alone. Checks that
//! need accounts, balances or the vote graph run when the operation is
//! applied.

use crate::{Operation, Transaction};
use covenant_types::params::{MAX_WITNESS_URL_LENGTH, PERCENT_100};
use covenant_types::{Asset, Authority, ChainParams, Symbol, Timestamp, ValidationError};

/// Validate every operation and the envelope itself.
pub fn validate_transaction(tx: &Transaction, params: &ChainParams) -> Result<(), ValidationError> {
    if tx.operations.is_empty() {
        return Err(ValidationError::EmptyTransaction);
    }
    no_extensions(&tx.extensions)?;
    for op in &tx.operations {
        validate_operation(op, params)?;
    }
    Ok(())
}

/// A transaction is live from now until its expiration, which may be at
/// most `max_time_until_expiration` ahead of the head block.
pub fn validate_expiration(
    tx: &Transaction,
    now: Timestamp,
    params: &ChainParams,
) -> Result<(), ValidationError> {
    if tx.expiration < now {
        return Err(ValidationError::TransactionExpired);
    }
    if tx.expiration > now.plus_secs(params.max_time_until_expiration) {
        return Err(ValidationError::ExpirationTooFar);
    }
    Ok(())
}

pub fn validate_operation(op: &Operation, params: &ChainParams) -> Result<(), ValidationError> {
    let max = params.max_authority_membership;
    match op {
        Operation::AccountCreate(op) => {
            non_negative(&op.fee, Symbol::Steem)?;
            for auth in [&op.owner, &op.active, &op.posting] {
                authority(auth, max)?;
            }
            json_metadata(&op.json_metadata)
        }
        Operation::AccountUpdate(op) => {
            for auth in [&op.owner, &op.active, &op.posting].into_iter().flatten() {
                authority(auth, max)?;
            }
            json_metadata(&op.json_metadata)
        }
        Operation::WitnessUpdate(op) => {
            if op.url.is_empty() || op.url.len() > MAX_WITNESS_URL_LENGTH {
                return Err(ValidationError::InvalidUrl);
            }
            Ok(())
        }
        Operation::AccountWitnessVote(_) => Ok(()),
        Operation::AccountWitnessProxy(op) => {
            if op.proxy.as_ref() == Some(&op.account) {
                return Err(ValidationError::SelfProxy);
            }
            Ok(())
        }
        Operation::TransferToVesting(op) => {
            non_negative(&op.amount, Symbol::Steem)?;
            if op.amount.is_zero() {
                return Err(ValidationError::ZeroAmount);
            }
            Ok(())
        }
        Operation::WithdrawVesting(op) => non_negative(&op.vesting_shares, Symbol::Vests),
        Operation::SetWithdrawVestingRoute(op) => {
            if op.percent > PERCENT_100 {
                return Err(ValidationError::PercentOverflow(u32::from(op.percent)));
            }
            Ok(())
        }
        Operation::DelegateVestingShares(op) => {
            non_negative(&op.vesting_shares, Symbol::Vests)?;
            if op.delegator == op.delegatee {
                return Err(ValidationError::SelfDelegation);
            }
            Ok(())
        }
        Operation::ClaimAccount(op) => {
            non_negative(&op.fee, Symbol::Steem)?;
            no_extensions(&op.extensions)
        }
        Operation::CreateClaimedAccount(op) => {
            for auth in [&op.owner, &op.active, &op.posting] {
                authority(auth, max)?;
            }
            json_metadata(&op.json_metadata)?;
            no_extensions(&op.extensions)
        }
        Operation::RequestAccountRecovery(op) => {
            op.new_owner_authority.validate(max)?;
            no_extensions(&op.extensions)
        }
        Operation::RecoverAccount(op) => {
            authority(&op.new_owner_authority, max)?;
            authority(&op.recent_owner_authority, max)?;
            no_extensions(&op.extensions)
        }
        Operation::ChangeRecoveryAccount(op) => no_extensions(&op.extensions),
        Operation::ClaimRewardBalance(op) => {
            non_negative(&op.reward_steem, Symbol::Steem)?;
            non_negative(&op.reward_sbd, Symbol::Sbd)?;
            non_negative(&op.reward_vests, Symbol::Vests)?;
            if op.reward_steem.is_zero() && op.reward_sbd.is_zero() && op.reward_vests.is_zero() {
                return Err(ValidationError::NothingToClaim);
            }
            Ok(())
        }
    }
}

fn non_negative(asset: &Asset, expected: Symbol) -> Result<(), ValidationError> {
    if asset.symbol != expected {
        return Err(ValidationError::WrongSymbol {
            expected,
            found: asset.symbol,
        });
    }
    if asset.is_negative() {
        return Err(ValidationError::NegativeAmount);
    }
    Ok(())
}

fn authority(auth: &Authority, max_membership: usize) -> Result<(), ValidationError> {
    auth.validate(max_membership)?;
    if auth.is_impossible() {
        return Err(ValidationError::ImpossibleAuthority);
    }
    Ok(())
}

fn json_metadata(metadata: &str) -> Result<(), ValidationError> {
    if metadata.is_empty() {
        return Ok(());
    }
    serde_json::from_str::<serde_json::Value>(metadata)
        .map(|_| ())
        .map_err(|e| ValidationError::MalformedMetadata(e.to_string()))
}

fn no_extensions(extensions: &[String]) -> Result<(), ValidationError> {
    if !extensions.is_empty() {
        return Err(ValidationError::UnsupportedExtensions);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_must_be_json() {
        assert!(json_metadata("").is_ok());
        assert!(json_metadata(r#"{"profile":{"name":"a"}}"#).is_ok());
        assert!(matches!(
            json_metadata("{not json"),
            Err(ValidationError::MalformedMetadata(_))
        ));
    }

    #[test]
    fn symbol_checked_before_sign() {
        assert_eq!(
            non_negative(&Asset::sbd(-1), Symbol::Steem),
            Err(ValidationError::WrongSymbol {
                expected: Symbol::Steem,
                found: Symbol::Sbd
            })
        );
        assert_eq!(
            non_negative(&Asset::steem(-1), Symbol::Steem),
            Err(ValidationError::NegativeAmount)
        );
    }
}
