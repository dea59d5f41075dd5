use covenant_nullables::NullStore;
use covenant_recovery::{update_owner_authority, AccountRecoveryFlow};
use covenant_store::{Account, AccountStore, RecoveryStore, Witness, WitnessStore};
use covenant_types::{
    AccountName, Authority, LedgerEvent, PublicKey, StateError, Timestamp, ValidationError,
};

const T0: u64 = 10_000_000;
const EXPIRATION: u64 = 86_400;
const UPDATE_LIMIT: u64 = 3_600;
const RECOVERY_PERIOD: u64 = 2_592_000;

fn name(s: &str) -> AccountName {
    AccountName::new(s).unwrap()
}

fn key_auth(seed: u8) -> Authority {
    Authority::single_key(PublicKey([seed; 32]))
}

fn at(offset: u64) -> Timestamp {
    Timestamp::new(T0 + offset)
}

fn flow() -> AccountRecoveryFlow {
    AccountRecoveryFlow::new(EXPIRATION, UPDATE_LIMIT, RECOVERY_PERIOD)
}

fn put(store: &mut NullStore, n: &str, owner: Authority, partner: Option<&str>) {
    let mut account = Account::new(
        name(n),
        owner,
        key_auth(90),
        key_auth(91),
        PublicKey([92; 32]),
        Timestamp::new(T0),
    );
    account.recovery_account = partner.map(name);
    store.put_account(&account).unwrap();
}

/// alice (partner bob) had owner key 1 stolen and replaced by the thief's key 2.
fn compromised() -> NullStore {
    let mut store = NullStore::new();
    put(&mut store, "alice", key_auth(1), Some("bob"));
    put(&mut store, "bob", key_auth(10), None);
    put(&mut store, "carol", key_auth(20), None);
    let mut alice = store.get_account(&name("alice")).unwrap();
    update_owner_authority(&mut store, &mut alice, key_auth(2), at(0)).unwrap();
    store
}

fn owner(store: &NullStore, n: &str) -> Authority {
    store.get_account(&name(n)).unwrap().owner
}

#[test]
fn owner_update_records_history() {
    let store = compromised();
    let history = store.owner_history_of(&name("alice")).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].previous_owner_authority, key_auth(1));
    assert_eq!(history[0].last_valid_time, at(0));
    assert_eq!(owner(&store, "alice"), key_auth(2));
    assert_eq!(store.get_account(&name("alice")).unwrap().last_owner_update, at(0));
}

#[test]
fn partner_recovers_account() {
    let mut store = compromised();
    let f = flow();
    let mut events = Vec::new();
    f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &key_auth(3), at(10))
        .unwrap();
    let request = store.find_recovery_request(&name("alice")).unwrap().unwrap();
    assert_eq!(request.expires, at(10 + EXPIRATION));

    f.recover_account(&mut store, &name("alice"), &key_auth(3), &key_auth(1), at(20), &mut events)
        .unwrap();

    assert_eq!(owner(&store, "alice"), key_auth(3));
    let alice = store.get_account(&name("alice")).unwrap();
    assert_eq!(alice.last_account_recovery, at(20));
    assert_eq!(alice.last_owner_update, at(20));
    assert!(store.find_recovery_request(&name("alice")).unwrap().is_none());
    // The thief's authority is now history too.
    let history = store.owner_history_of(&name("alice")).unwrap();
    assert!(history.iter().any(|h| h.previous_owner_authority == key_auth(2)));
    assert_eq!(events, vec![LedgerEvent::AccountRecovered { account: name("alice") }]);
}

#[test]
fn second_recovery_within_limit_is_rejected() {
    let mut store = compromised();
    let f = flow();
    let mut events = Vec::new();
    f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &key_auth(3), at(10))
        .unwrap();
    f.recover_account(&mut store, &name("alice"), &key_auth(3), &key_auth(1), at(20), &mut events)
        .unwrap();

    f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &key_auth(4), at(30))
        .unwrap();
    assert_eq!(
        f.recover_account(&mut store, &name("alice"), &key_auth(4), &key_auth(2), at(40), &mut events),
        Err(StateError::RecoveryWindowNotElapsed.into())
    );
    f.recover_account(
        &mut store,
        &name("alice"),
        &key_auth(4),
        &key_auth(2),
        at(20 + UPDATE_LIMIT + 1),
        &mut events,
    )
    .unwrap();
    assert_eq!(owner(&store, "alice"), key_auth(4));
}

#[test]
fn request_cannot_be_used_once_expired() {
    let mut store = compromised();
    let f = flow();
    let mut events = Vec::new();
    f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &key_auth(3), at(10))
        .unwrap();

    // Maintenance has not run yet, so the request is still stored.
    let deadline = at(10 + EXPIRATION);
    assert!(store.find_recovery_request(&name("alice")).unwrap().is_some());
    assert_eq!(
        f.recover_account(&mut store, &name("alice"), &key_auth(3), &key_auth(1), deadline, &mut events),
        Err(StateError::NoRecoveryRequest(name("alice")).into())
    );
    f.recover_account(
        &mut store,
        &name("alice"),
        &key_auth(3),
        &key_auth(1),
        at(10 + EXPIRATION - 1),
        &mut events,
    )
    .unwrap();
    assert_eq!(owner(&store, "alice"), key_auth(3));
}

#[test]
fn stale_history_no_longer_proves_ownership() {
    let mut store = compromised();
    let f = flow();
    let mut events = Vec::new();
    f.request_account_recovery(
        &mut store,
        &name("bob"),
        &name("alice"),
        &key_auth(3),
        at(RECOVERY_PERIOD - 10),
    )
    .unwrap();

    assert_eq!(
        f.recover_account(
            &mut store,
            &name("alice"),
            &key_auth(3),
            &key_auth(1),
            at(RECOVERY_PERIOD + 1),
            &mut events,
        ),
        Err(StateError::RecentAuthorityNotFound.into())
    );
    assert_eq!(store.owner_history_of(&name("alice")).unwrap().len(), 1);
    f.recover_account(
        &mut store,
        &name("alice"),
        &key_auth(3),
        &key_auth(1),
        at(RECOVERY_PERIOD),
        &mut events,
    )
    .unwrap();
    assert_eq!(owner(&store, "alice"), key_auth(3));
}

#[test]
fn recovery_checks_request_and_history() {
    let mut store = compromised();
    let f = flow();
    let mut events = Vec::new();

    assert_eq!(
        f.recover_account(&mut store, &name("alice"), &key_auth(3), &key_auth(1), at(5), &mut events),
        Err(StateError::NoRecoveryRequest(name("alice")).into())
    );
    f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &key_auth(3), at(10))
        .unwrap();
    assert_eq!(
        f.recover_account(&mut store, &name("alice"), &key_auth(5), &key_auth(1), at(20), &mut events),
        Err(StateError::RecoveryAuthorityMismatch.into())
    );
    assert_eq!(
        f.recover_account(&mut store, &name("alice"), &key_auth(3), &key_auth(7), at(20), &mut events),
        Err(StateError::RecentAuthorityNotFound.into())
    );
    assert_eq!(owner(&store, "alice"), key_auth(2));
}

#[test]
fn only_the_partner_may_request() {
    let mut store = compromised();
    assert_eq!(
        flow().request_account_recovery(&mut store, &name("carol"), &name("alice"), &key_auth(3), at(10)),
        Err(StateError::NotRecoveryPartner(name("carol")).into())
    );
}

#[test]
fn top_witness_serves_accounts_without_partner() {
    let mut store = compromised();
    for (n, votes) in [("bob", 10), ("carol", 50)] {
        store
            .put_witness(&Witness {
                owner: name(n),
                url: "https://w.example".into(),
                signing_key: PublicKey([1; 32]),
                votes,
                created: at(0),
            })
            .unwrap();
    }
    let f = flow();
    assert_eq!(
        f.request_account_recovery(&mut store, &name("bob"), &name("carol"), &key_auth(3), at(1)),
        Err(StateError::NotRecoveryPartner(name("bob")).into())
    );
    f.request_account_recovery(&mut store, &name("carol"), &name("bob"), &key_auth(3), at(1))
        .unwrap();
}

#[test]
fn zero_threshold_cancels_or_is_rejected() {
    let mut store = compromised();
    let f = flow();
    let open = Authority::new(0);
    assert_eq!(
        f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &open, at(1)),
        Err(StateError::NoRecoveryRequest(name("alice")).into())
    );
    f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &key_auth(3), at(1))
        .unwrap();
    f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &open, at(2))
        .unwrap();
    assert!(store.find_recovery_request(&name("alice")).unwrap().is_none());
}

#[test]
fn impossible_or_unknown_authorities_are_rejected() {
    let mut store = compromised();
    let f = flow();
    assert_eq!(
        f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &Authority::new(5), at(1)),
        Err(ValidationError::ImpossibleAuthority.into())
    );
    let via_ghost = Authority::new(1).with_account(name("ghost"), 1);
    assert_eq!(
        f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &via_ghost, at(1)),
        Err(ValidationError::UnknownAccount(name("ghost")).into())
    );
}

#[test]
fn expired_request_cannot_be_used() {
    let mut store = compromised();
    let f = flow();
    let mut events = Vec::new();
    f.request_account_recovery(&mut store, &name("bob"), &name("alice"), &key_auth(3), at(10))
        .unwrap();

    f.process_maintenance(&mut store, at(10 + EXPIRATION - 1), &mut events)
        .unwrap();
    assert!(store.find_recovery_request(&name("alice")).unwrap().is_some());

    f.process_maintenance(&mut store, at(10 + EXPIRATION), &mut events)
        .unwrap();
    assert_eq!(events, vec![LedgerEvent::RecoveryRequestExpired { account: name("alice") }]);
    assert_eq!(
        f.recover_account(
            &mut store,
            &name("alice"),
            &key_auth(3),
            &key_auth(1),
            at(10 + EXPIRATION + 1),
            &mut events
        ),
        Err(StateError::NoRecoveryRequest(name("alice")).into())
    );
}

#[test]
fn old_owner_history_is_pruned() {
    let mut store = compromised();
    let f = flow();
    let mut events = Vec::new();
    f.process_maintenance(&mut store, at(RECOVERY_PERIOD), &mut events)
        .unwrap();
    assert_eq!(store.owner_history_of(&name("alice")).unwrap().len(), 1);
    f.process_maintenance(&mut store, at(RECOVERY_PERIOD + 1), &mut events)
        .unwrap();
    assert!(store.owner_history_of(&name("alice")).unwrap().is_empty());
}

#[test]
fn partner_change_takes_a_recovery_period() {
    let mut store = compromised();
    let f = flow();
    let mut events = Vec::new();
    f.change_recovery_account(&mut store, &name("alice"), &name("carol"), at(0))
        .unwrap();

    f.process_maintenance(&mut store, at(RECOVERY_PERIOD - 1), &mut events)
        .unwrap();
    assert_eq!(
        store.get_account(&name("alice")).unwrap().recovery_account,
        Some(name("bob"))
    );

    f.process_maintenance(&mut store, at(RECOVERY_PERIOD), &mut events)
        .unwrap();
    assert_eq!(
        store.get_account(&name("alice")).unwrap().recovery_account,
        Some(name("carol"))
    );
    assert!(events.contains(&LedgerEvent::RecoveryAccountChanged {
        account: name("alice"),
        recovery_account: name("carol"),
    }));
}

#[test]
fn retargeting_restarts_and_reverting_withdraws() {
    let mut store = compromised();
    let f = flow();
    f.change_recovery_account(&mut store, &name("alice"), &name("carol"), at(0))
        .unwrap();
    put(&mut store, "dave", key_auth(30), None);
    f.change_recovery_account(&mut store, &name("alice"), &name("dave"), at(100))
        .unwrap();
    let pending = store.find_change_request(&name("alice")).unwrap().unwrap();
    assert_eq!(pending.recovery_account, name("dave"));
    assert_eq!(pending.effective_on, at(100 + RECOVERY_PERIOD));

    f.change_recovery_account(&mut store, &name("alice"), &name("bob"), at(200))
        .unwrap();
    assert!(store.find_change_request(&name("alice")).unwrap().is_none());

    assert_eq!(
        f.change_recovery_account(&mut store, &name("alice"), &name("ghost"), at(300)),
        Err(ValidationError::UnknownAccount(name("ghost")).into())
    );
}
