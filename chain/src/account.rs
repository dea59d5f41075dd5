//! Account lifecycle: creation, claimed creation, updates, fees and power-up.

use covenant_authority::validate_authority_accounts;
use covenant_recovery::update_owner_authority;
use covenant_store::{require_account, Account, LedgerStore};
use covenant_transactions::account::{
    AccountCreateOp, AccountUpdateOp, ClaimAccountOp, CreateClaimedAccountOp,
};
use covenant_transactions::vesting::TransferToVestingOp;
use covenant_types::asset::{checked_add, checked_sub};
use covenant_types::{
    AccountName, Authority, AuthorityTier, LedgerError, LedgerEvent, PublicKey, StateError,
    Timestamp,
};
use covenant_vesting::create_vesting;
use covenant_voting::ProxyVoteGraph;

/// Charge the creation fee from `creator`, who must pay exactly the current fee.
fn charge_fee(creator: &mut Account, paid: i64, expected: i64) -> Result<(), LedgerError> {
    if paid != expected {
        return Err(StateError::FeeMismatch { expected, paid }.into());
    }
    if creator.balance < paid {
        return Err(StateError::InsufficientFeeBalance {
            available: creator.balance,
            fee: paid,
        }
        .into());
    }
    creator.balance -= paid;
    Ok(())
}

/// Write a new account after the name and authority checks both creation
/// paths share.
#[allow(clippy::too_many_arguments)]
fn open_account<S: LedgerStore + ?Sized>(
    store: &mut S,
    creator: &AccountName,
    name: &AccountName,
    owner: &Authority,
    active: &Authority,
    posting: &Authority,
    memo_key: PublicKey,
    json_metadata: &str,
    now: Timestamp,
) -> Result<(), LedgerError> {
    if store.account_exists(name)? {
        return Err(StateError::DuplicateAccountName(name.clone()).into());
    }
    for auth in [owner, active, posting] {
        validate_authority_accounts(store, auth)?;
    }
    let mut account = Account::new(
        name.clone(),
        owner.clone(),
        active.clone(),
        posting.clone(),
        memo_key,
        now,
    );
    account.json_metadata = json_metadata.to_string();
    account.recovery_account = (*creator != AccountName::temp()).then(|| creator.clone());
    store.put_account(&account)?;
    tracing::debug!(account = %name, creator = %creator, "account created");
    Ok(())
}

pub fn account_create<S: LedgerStore + ?Sized>(
    store: &mut S,
    graph: &ProxyVoteGraph,
    op: &AccountCreateOp,
    now: Timestamp,
    events: &mut Vec<LedgerEvent>,
) -> Result<(), LedgerError> {
    let mut creator = require_account(store, &op.creator)?;
    let fee = store.globals()?.account_creation_fee;
    charge_fee(&mut creator, op.fee.amount, fee)?;
    store.put_account(&creator)?;

    open_account(
        store,
        &op.creator,
        &op.new_account_name,
        &op.owner,
        &op.active,
        &op.posting,
        op.memo_key,
        &op.json_metadata,
        now,
    )?;
    if op.fee.amount > 0 {
        create_vesting(store, graph, &op.new_account_name, op.fee.amount, events)?;
    }
    events.push(LedgerEvent::AccountCreated {
        account: op.new_account_name.clone(),
        creator: op.creator.clone(),
    });
    Ok(())
}

/// Pay the creation fee into `null` and bank one account creation for later.
pub fn claim_account<S: LedgerStore + ?Sized>(
    store: &mut S,
    op: &ClaimAccountOp,
) -> Result<(), LedgerError> {
    let mut creator = require_account(store, &op.creator)?;
    let fee = store.globals()?.account_creation_fee;
    charge_fee(&mut creator, op.fee.amount, fee)?;
    creator.pending_claimed_accounts = checked_add(creator.pending_claimed_accounts, 1)?;
    store.put_account(&creator)?;

    let mut null = require_account(store, &AccountName::null())?;
    null.balance = checked_add(null.balance, op.fee.amount)?;
    store.put_account(&null)?;
    Ok(())
}

pub fn create_claimed_account<S: LedgerStore + ?Sized>(
    store: &mut S,
    op: &CreateClaimedAccountOp,
    now: Timestamp,
    events: &mut Vec<LedgerEvent>,
) -> Result<(), LedgerError> {
    let mut creator = require_account(store, &op.creator)?;
    if creator.pending_claimed_accounts <= 0 {
        return Err(StateError::NoPendingClaimedAccounts.into());
    }
    creator.pending_claimed_accounts -= 1;
    store.put_account(&creator)?;

    open_account(
        store,
        &op.creator,
        &op.new_account_name,
        &op.owner,
        &op.active,
        &op.posting,
        op.memo_key,
        &op.json_metadata,
        now,
    )?;
    events.push(LedgerEvent::AccountCreated {
        account: op.new_account_name.clone(),
        creator: op.creator.clone(),
    });
    Ok(())
}

pub fn account_update<S: LedgerStore + ?Sized>(
    store: &mut S,
    op: &AccountUpdateOp,
    owner_update_limit: u64,
    now: Timestamp,
    events: &mut Vec<LedgerEvent>,
) -> Result<(), LedgerError> {
    let mut account = require_account(store, &op.account)?;

    if let Some(owner) = &op.owner {
        if account.last_owner_update.elapsed_since(now) <= owner_update_limit {
            return Err(StateError::OwnerUpdateTooSoon.into());
        }
        validate_authority_accounts(store, owner)?;
        update_owner_authority(store, &mut account, owner.clone(), now)?;
        events.push(LedgerEvent::AuthorityUpdated {
            account: op.account.clone(),
            tier: AuthorityTier::Owner,
        });
    }
    if let Some(active) = &op.active {
        validate_authority_accounts(store, active)?;
        account.active = active.clone();
        events.push(LedgerEvent::AuthorityUpdated {
            account: op.account.clone(),
            tier: AuthorityTier::Active,
        });
    }
    if let Some(posting) = &op.posting {
        validate_authority_accounts(store, posting)?;
        account.posting = posting.clone();
        events.push(LedgerEvent::AuthorityUpdated {
            account: op.account.clone(),
            tier: AuthorityTier::Posting,
        });
    }
    if let Some(memo_key) = op.memo_key {
        account.memo_key = memo_key;
    }
    if !op.json_metadata.is_empty() {
        account.json_metadata = op.json_metadata.clone();
    }
    store.put_account(&account)?;
    Ok(())
}

/// Move liquid STEEM from `from` into the recipient's vesting shares.
pub fn transfer_to_vesting<S: LedgerStore + ?Sized>(
    store: &mut S,
    graph: &ProxyVoteGraph,
    op: &TransferToVestingOp,
    events: &mut Vec<LedgerEvent>,
) -> Result<i64, LedgerError> {
    let mut from = require_account(store, &op.from)?;
    require_account(store, op.recipient())?;
    let amount = op.amount.amount;
    if from.balance < amount {
        return Err(StateError::InsufficientBalance {
            available: from.balance,
            requested: amount,
        }
        .into());
    }
    from.balance = checked_sub(from.balance, amount)?;
    store.put_account(&from)?;
    create_vesting(store, graph, op.recipient(), amount, events)
}
