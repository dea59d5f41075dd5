use std::collections::BTreeSet;

use covenant_authority::{verify_authority, RequiredAuthorities};
use covenant_crypto::keypair_from_seed;
use covenant_nullables::NullStore;
use covenant_store::{Account, AccountStore};
use covenant_types::{AccountName, Authority, ChainParams, PublicKey, Timestamp};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn key(seed: u8) -> PublicKey {
    keypair_from_seed(&[seed; 32]).public
}

fn account(name: &str, active: Authority) -> Account {
    Account::new(
        AccountName::new(name).unwrap(),
        Authority::single_key(key(1)),
        active,
        Authority::new(1),
        key(1),
        Timestamp::EPOCH,
    )
}

fn single_key_bench(c: &mut Criterion) {
    let mut store = NullStore::new();
    store
        .put_account(&account("alice", Authority::single_key(key(2))))
        .unwrap();
    let required = RequiredAuthorities::active(AccountName::new("alice").unwrap());
    let signers: BTreeSet<_> = [key(2)].into_iter().collect();
    let params = ChainParams::mainnet();

    c.bench_function("verify_single_key", |b| {
        b.iter(|| verify_authority(&store, black_box(&required), black_box(&signers), &params))
    });
}

fn nested_multisig_bench(c: &mut Criterion) {
    let mut store = NullStore::new();
    let names = ["member-a", "member-b", "member-c", "member-d"];
    let mut root = Authority::new(names.len() as u32);
    for (i, n) in names.iter().enumerate() {
        let seed = 10 + i as u8;
        store
            .put_account(&account(n, Authority::single_key(key(seed))))
            .unwrap();
        root = root.with_account(AccountName::new(*n).unwrap(), 1);
    }
    store.put_account(&account("council", root)).unwrap();
    let required = RequiredAuthorities::active(AccountName::new("council").unwrap());
    let signers: BTreeSet<_> = (10..14).map(key).collect();
    let params = ChainParams::mainnet();

    c.bench_function("verify_nested_4_of_4", |b| {
        b.iter(|| verify_authority(&store, black_box(&required), black_box(&signers), &params))
    });
}

criterion_group!(benches, single_key_bench, nested_multisig_bench);
criterion_main!(benches);
