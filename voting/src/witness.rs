//! Witness registration.

use covenant_store::{require_account, AccountStore, Witness, WitnessStore};
use covenant_types::params::MAX_WITNESS_URL_LENGTH;
use covenant_types::{AccountName, LedgerError, PublicKey, Timestamp, ValidationError};

/// Register `owner` as a witness, or update the url and signing key of an
/// existing registration. Votes already cast are kept.
pub fn update_witness<S>(
    store: &mut S,
    owner: &AccountName,
    url: &str,
    signing_key: PublicKey,
    now: Timestamp,
) -> Result<Witness, LedgerError>
where
    S: AccountStore + WitnessStore + ?Sized,
{
    if url.is_empty() || url.len() > MAX_WITNESS_URL_LENGTH {
        return Err(ValidationError::InvalidUrl.into());
    }
    require_account(store, owner)?;

    let witness = match store.find_witness(owner)? {
        Some(mut existing) => {
            existing.url = url.to_string();
            existing.signing_key = signing_key;
            existing
        }
        None => {
            tracing::info!(witness = %owner, "witness registered");
            Witness {
                owner: owner.clone(),
                url: url.to_string(),
                signing_key,
                votes: 0,
                created: now,
            }
        }
    };
    store.put_witness(&witness)?;
    Ok(witness)
}
