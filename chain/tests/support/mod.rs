#![allow(dead_code)]

use covenant_chain::{Block, Chain, ChainConfig, GenesisAccount, GenesisConfig};
use covenant_crypto::keypair_from_seed;
use covenant_nullables::NullStore;
use covenant_store::{Account, AccountStore};
use covenant_transactions::{Operation, SignedTransaction, Transaction};
use covenant_types::{AccountName, ChainParams, KeyPair, LedgerError, LedgerEvent, Timestamp};
use std::collections::BTreeMap;

pub const GENESIS_TIME: u64 = 1_000_000;
pub const FEE: i64 = 3_000;

pub fn name(s: &str) -> AccountName {
    AccountName::new(s).unwrap()
}

pub fn seed_for(account: &str) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[..account.len()].copy_from_slice(account.as_bytes());
    seed
}

/// A testnet chain with three funded accounts and a block clock.
///
/// | account | liquid | vested (STEEM) | witness | recovery partner |
/// |---------|--------|----------------|---------|------------------|
/// | alice   | 100.000 | 10.000        | yes     | bob              |
/// | bob     | 50.000  | 5.000         | yes     | none             |
/// | carol   | 10.000  | 1.000         | no      | alice            |
pub struct Harness {
    pub chain: Chain<NullStore>,
    pub time: u64,
    keys: BTreeMap<&'static str, KeyPair>,
}

impl Harness {
    pub fn new() -> Self {
        covenant_utils::init_tracing();
        let keys: BTreeMap<&'static str, KeyPair> = ["alice", "bob", "carol"]
            .into_iter()
            .map(|n| (n, keypair_from_seed(&seed_for(n))))
            .collect();
        let account = |n: &'static str, balance, vesting, witness: bool, partner: Option<&str>| {
            GenesisAccount {
                name: name(n),
                key: keys[n].public,
                balance,
                vesting,
                recovery_account: partner.map(name),
                witness_url: witness.then(|| format!("https://{n}.example")),
            }
        };
        let config = ChainConfig {
            params: ChainParams::testnet(),
            check_invariants: true,
            genesis: GenesisConfig {
                time: Timestamp::new(GENESIS_TIME),
                account_creation_fee: FEE,
                accounts: vec![
                    account("alice", 100_000, 10_000, true, Some("bob")),
                    account("bob", 50_000, 5_000, true, None),
                    account("carol", 10_000, 1_000, false, Some("alice")),
                ],
                ..GenesisConfig::default()
            },
            ..ChainConfig::default()
        };
        let chain = Chain::from_genesis(NullStore::new(), &config).unwrap();
        Self {
            chain,
            time: GENESIS_TIME,
            keys,
        }
    }

    pub fn key(&self, account: &str) -> &KeyPair {
        &self.keys[account]
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.time)
    }

    /// A transaction expiring ten minutes after the current head time.
    pub fn tx_with(&self, ops: Vec<Operation>, keys: &[&KeyPair]) -> SignedTransaction {
        let tx = Transaction::new(Timestamp::new(self.time + 600), ops);
        SignedTransaction::sign(tx, self.chain.chain_id(), keys).unwrap()
    }

    pub fn tx(&self, ops: Vec<Operation>, signers: &[&str]) -> SignedTransaction {
        let keys: Vec<&KeyPair> = signers.iter().map(|s| self.key(s)).collect();
        self.tx_with(ops, &keys)
    }

    /// Apply the next block one interval after the head.
    pub fn block(&mut self, txs: Vec<SignedTransaction>) -> Result<Vec<LedgerEvent>, LedgerError> {
        let number = self.chain.head_block_number()? + 1;
        let time = self.time + self.chain.params().block_interval;
        let events = self
            .chain
            .apply_block(&Block::new(number, Timestamp::new(time), txs))?;
        self.time = time;
        Ok(events)
    }

    /// Apply a single-operation transaction in its own block.
    pub fn apply(&mut self, op: Operation, signers: &[&str]) -> Result<Vec<LedgerEvent>, LedgerError> {
        let tx = self.tx(vec![op], signers);
        self.block(vec![tx])
    }

    /// Let `secs` pass without a block; the next block lands after the gap.
    pub fn skip(&mut self, secs: u64) {
        self.time += secs;
    }

    pub fn account(&self, n: &str) -> Account {
        self.chain.store().get_account(&name(n)).unwrap()
    }
}
