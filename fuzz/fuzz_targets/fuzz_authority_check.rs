#![no_main]

use arbitrary::Arbitrary;
use covenant_authority::{verify_authority, RequiredAuthorities};
use covenant_nullables::NullStore;
use covenant_store::{Account, AccountStore};
use covenant_types::{AccountName, Authority, ChainParams, PublicKey, Timestamp};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;

const NAMES: [&str; 4] = ["alice", "bob", "carol", "dave"];

#[derive(Debug, Arbitrary)]
struct Member {
    account: bool,
    index: u8,
    weight: u16,
}

#[derive(Debug, Arbitrary)]
struct Input {
    /// Threshold and members of each account's active authority.
    accounts: [(u32, Vec<Member>); 4],
    required: u8,
    signers: Vec<u8>,
}

fn key(index: u8) -> PublicKey {
    PublicKey([index % 8; 32])
}

fn name(index: u8) -> AccountName {
    // Fixed, valid names.
    AccountName::new(NAMES[usize::from(index) % NAMES.len()]).unwrap()
}

// Arbitrary nested account authorities, including cycles, must resolve
// without panicking or recursing past the depth limit.
fuzz_target!(|input: Input| {
    let mut store = NullStore::new();
    for (i, (threshold, members)) in input.accounts.iter().enumerate() {
        let mut active = Authority::new(*threshold % 4);
        for m in members.iter().take(8) {
            active = if m.account {
                active.with_account(name(m.index), m.weight)
            } else {
                active.with_key(key(m.index), m.weight)
            };
        }
        let account = Account::new(
            name(i as u8),
            Authority::single_key(key(i as u8)),
            active,
            Authority::single_key(key(i as u8)),
            key(i as u8),
            Timestamp::EPOCH,
        );
        if store.put_account(&account).is_err() {
            return;
        }
    }

    let required = RequiredAuthorities::active(name(input.required));
    let signers: BTreeSet<PublicKey> = input.signers.iter().take(8).map(|i| key(*i)).collect();
    let _ = verify_authority(&store, &required, &signers, &ChainParams::mainnet());
});
