mod support;

use covenant_crypto::keypair_from_seed;
use covenant_store::{DelegationStore, RecoveryStore};
use covenant_transactions::account::{
    AccountCreateOp, AccountUpdateOp, ClaimAccountOp, CreateClaimedAccountOp,
};
use covenant_transactions::recovery::{RecoverAccountOp, RequestAccountRecoveryOp};
use covenant_transactions::vesting::{DelegateVestingSharesOp, WithdrawVestingOp};
use covenant_transactions::Operation;
use covenant_types::{AccountName, Asset, Authority, LedgerEvent, PublicKey, StateError};
use support::{name, seed_for, Harness, FEE};

fn open(key: PublicKey) -> (Authority, Authority, Authority) {
    (
        Authority::single_key(key),
        Authority::single_key(key),
        Authority::single_key(key),
    )
}

#[test]
fn account_create_vests_fee_into_new_account() {
    let mut h = Harness::new();
    let dave = keypair_from_seed(&seed_for("dave"));
    let (owner, active, posting) = open(dave.public);
    let events = h
        .apply(
            Operation::AccountCreate(AccountCreateOp {
                fee: Asset::steem(FEE),
                creator: name("alice"),
                new_account_name: name("dave"),
                owner,
                active,
                posting,
                memo_key: dave.public,
                json_metadata: r#"{"profile":{}}"#.into(),
            }),
            &["alice"],
        )
        .unwrap();

    let created = h.account("dave");
    assert_eq!(created.vesting_shares, 3_000_000);
    assert_eq!(created.balance, 0);
    assert_eq!(created.recovery_account, Some(name("alice")));
    assert_eq!(h.account("alice").balance, 100_000 - FEE);
    assert!(events.contains(&LedgerEvent::AccountCreated {
        account: name("dave"),
        creator: name("alice"),
    }));

    let tx = h.tx_with(
        vec![Operation::WithdrawVesting(WithdrawVestingOp {
            account: name("dave"),
            vesting_shares: Asset::vests(1_300_000),
        })],
        &[&dave],
    );
    h.block(vec![tx]).unwrap();
    assert_eq!(h.account("dave").vesting_withdraw_rate, 100_000);
}

#[test]
fn claimed_account_flow() {
    let mut h = Harness::new();
    let claim = |fee| {
        Operation::ClaimAccount(ClaimAccountOp {
            creator: name("bob"),
            fee: Asset::steem(fee),
            extensions: Vec::new(),
        })
    };
    let dave = keypair_from_seed(&seed_for("dave"));
    let (owner, active, posting) = open(dave.public);
    let create = Operation::CreateClaimedAccount(CreateClaimedAccountOp {
        creator: name("bob"),
        new_account_name: name("dave"),
        owner,
        active,
        posting,
        memo_key: dave.public,
        json_metadata: String::new(),
        extensions: Vec::new(),
    });

    assert_eq!(
        h.apply(create.clone(), &["bob"]),
        Err(StateError::NoPendingClaimedAccounts.into())
    );
    assert_eq!(
        h.apply(claim(FEE - 1), &["bob"]),
        Err(StateError::FeeMismatch {
            expected: FEE,
            paid: FEE - 1
        }
        .into())
    );

    h.apply(claim(FEE), &["bob"]).unwrap();
    assert_eq!(h.account("bob").pending_claimed_accounts, 1);
    assert_eq!(h.account("bob").balance, 50_000 - FEE);
    assert_eq!(h.account("null").balance, FEE);

    h.apply(create.clone(), &["bob"]).unwrap();
    let created = h.account("dave");
    assert_eq!(created.vesting_shares, 0);
    assert_eq!(created.recovery_account, Some(name("bob")));
    assert_eq!(h.account("bob").pending_claimed_accounts, 0);

    assert_eq!(
        h.apply(create, &["bob"]),
        Err(StateError::NoPendingClaimedAccounts.into())
    );
}

#[test]
fn power_down_pays_thirteen_installments() {
    let mut h = Harness::new();
    assert_eq!(h.account("alice").vesting_shares, 10_000_000);
    h.apply(
        Operation::WithdrawVesting(WithdrawVestingOp {
            account: name("alice"),
            vesting_shares: Asset::vests(6_500_000),
        }),
        &["alice"],
    )
    .unwrap();
    let started = h.account("alice");
    assert_eq!(started.vesting_withdraw_rate, 500_000);
    assert_eq!(started.next_vesting_withdrawal, h.now().plus_secs(60));

    let mut fills = 0;
    for _ in 0..13 {
        h.skip(57);
        let events = h.block(vec![]).unwrap();
        fills += events
            .iter()
            .filter(|e| matches!(e, LedgerEvent::FillVestingWithdraw { .. }))
            .count();
    }
    assert_eq!(fills, 13);

    let alice = h.account("alice");
    assert_eq!(alice.vesting_shares, 3_500_000);
    assert_eq!(alice.balance, 100_000 + 6_500);
    assert_eq!(alice.vesting_withdraw_rate, 0);
    assert_eq!(alice.to_withdraw, 0);

    h.skip(57);
    assert!(h.block(vec![]).unwrap().is_empty());
}

#[test]
fn cancelled_delegation_returns_after_period() {
    let mut h = Harness::new();
    let delegate = |amount| {
        Operation::DelegateVestingShares(DelegateVestingSharesOp {
            delegator: name("alice"),
            delegatee: name("carol"),
            vesting_shares: Asset::vests(amount),
        })
    };
    h.apply(delegate(1_000_000), &["alice"]).unwrap();
    assert_eq!(h.account("carol").received_vesting_shares, 1_000_000);

    h.apply(delegate(0), &["alice"]).unwrap();
    let cancelled_at = h.now();
    assert_eq!(h.account("carol").received_vesting_shares, 0);
    assert_eq!(h.account("alice").delegated_vesting_shares, 1_000_000);
    assert!(h
        .chain
        .store()
        .find_delegation(&name("alice"), &name("carol"))
        .unwrap()
        .is_none());

    h.skip(3_600 - 10);
    assert!(h.block(vec![]).unwrap().is_empty());
    assert_eq!(h.account("alice").delegated_vesting_shares, 1_000_000);

    h.skip(4);
    let events = h.block(vec![]).unwrap();
    assert_eq!(h.now(), cancelled_at.plus_secs(3_600));
    assert_eq!(
        events,
        vec![LedgerEvent::ReturnVestingDelegation {
            account: name("alice"),
            vesting_shares: Asset::vests(1_000_000),
        }]
    );
    assert_eq!(h.account("alice").delegated_vesting_shares, 0);
}

#[test]
fn stolen_account_is_recovered_by_partner() {
    let mut h = Harness::new();
    let thief = keypair_from_seed(&[66; 32]);
    let rescue = keypair_from_seed(&[77; 32]);
    let original = Authority::single_key(h.key("alice").public);

    h.apply(
        Operation::AccountUpdate(AccountUpdateOp {
            account: name("alice"),
            owner: Some(Authority::single_key(thief.public)),
            active: Some(Authority::single_key(thief.public)),
            posting: None,
            memo_key: None,
            json_metadata: String::new(),
        }),
        &["alice"],
    )
    .unwrap();

    h.apply(
        Operation::RequestAccountRecovery(RequestAccountRecoveryOp {
            recovery_account: name("bob"),
            account_to_recover: name("alice"),
            new_owner_authority: Authority::single_key(rescue.public),
            extensions: Vec::new(),
        }),
        &["bob"],
    )
    .unwrap();
    assert!(h
        .chain
        .store()
        .find_recovery_request(&name("alice"))
        .unwrap()
        .is_some());

    let recover = Operation::RecoverAccount(RecoverAccountOp {
        account_to_recover: name("alice"),
        new_owner_authority: Authority::single_key(rescue.public),
        recent_owner_authority: original,
        extensions: Vec::new(),
    });
    let tx = h.tx_with(vec![recover], &[&rescue, h.key("alice")]);
    let events = h.block(vec![tx]).unwrap();

    assert!(events.contains(&LedgerEvent::AccountRecovered {
        account: name("alice")
    }));
    let alice = h.account("alice");
    assert_eq!(alice.owner, Authority::single_key(rescue.public));
    assert_eq!(alice.last_account_recovery, h.now());
    assert!(h
        .chain
        .store()
        .find_recovery_request(&name("alice"))
        .unwrap()
        .is_none());
}

#[test]
fn unused_recovery_request_expires() {
    let mut h = Harness::new();
    let rescue = keypair_from_seed(&[77; 32]);
    h.apply(
        Operation::RequestAccountRecovery(RequestAccountRecoveryOp {
            recovery_account: name("alice"),
            account_to_recover: name("carol"),
            new_owner_authority: Authority::single_key(rescue.public),
            extensions: Vec::new(),
        }),
        &["alice"],
    )
    .unwrap();

    h.skip(300 - 3);
    let events = h.block(vec![]).unwrap();
    assert_eq!(
        events,
        vec![LedgerEvent::RecoveryRequestExpired {
            account: AccountName::new("carol").unwrap()
        }]
    );
}
