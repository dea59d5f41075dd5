//! State snapshots: an owned copy of committed state with a content hash.
//!
//! Two nodes that applied the same blocks produce byte-identical snapshots,
//! so comparing hashes is enough to detect a divergent replay.

use covenant_store::{
    Account, AccountRecoveryRequest, ChangeRecoveryAccountRequest, GlobalProperties, LedgerStore,
    OwnerAuthorityHistory, RewardFund, VestingDelegation, VestingDelegationExpiration,
    WithdrawRoute, Witness,
};
use covenant_types::{AccountName, LedgerError};
use serde::{Deserialize, Serialize};

const SNAPSHOT_VERSION: u32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Blake2b-256 over every field below.
    pub hash: [u8; 32],
    pub version: u32,
    pub globals: GlobalProperties,
    pub accounts: Vec<Account>,
    pub witnesses: Vec<Witness>,
    /// (voter, witness) approvals.
    pub witness_votes: Vec<(AccountName, AccountName)>,
    pub delegations: Vec<VestingDelegation>,
    pub expirations: Vec<VestingDelegationExpiration>,
    pub routes: Vec<WithdrawRoute>,
    pub reward_funds: Vec<RewardFund>,
    pub recovery_requests: Vec<AccountRecoveryRequest>,
    pub change_requests: Vec<ChangeRecoveryAccountRequest>,
    pub owner_history: Vec<OwnerAuthorityHistory>,
}

impl StateSnapshot {
    /// Copy the committed tables out of `store`.
    pub fn capture<S: LedgerStore + ?Sized>(store: &S) -> Result<Self, LedgerError> {
        let accounts = store.iter_accounts()?;
        let mut routes = Vec::new();
        let mut witness_votes = Vec::new();
        let mut recovery_requests = Vec::new();
        let mut change_requests = Vec::new();
        let mut owner_history = Vec::new();
        for account in &accounts {
            let name = &account.name;
            if account.withdraw_routes > 0 {
                routes.extend(store.routes_from(name)?);
            }
            for witness in store.witness_votes_of(name)? {
                witness_votes.push((name.clone(), witness));
            }
            recovery_requests.extend(store.find_recovery_request(name)?);
            change_requests.extend(store.find_change_request(name)?);
            owner_history.extend(store.owner_history_of(name)?);
        }
        let mut snapshot = Self {
            hash: [0; 32],
            version: SNAPSHOT_VERSION,
            globals: store.globals()?,
            accounts,
            witnesses: store.iter_witnesses()?,
            witness_votes,
            delegations: store.iter_delegations()?,
            expirations: store.iter_expirations()?,
            routes,
            reward_funds: store.iter_reward_funds()?,
            recovery_requests,
            change_requests,
            owner_history,
        };
        snapshot.hash = snapshot.compute_hash()?;
        Ok(snapshot)
    }

    fn compute_hash(&self) -> Result<[u8; 32], LedgerError> {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(encode(&self.globals)?);
        hasher.update(encode(&self.accounts)?);
        hasher.update(encode(&self.witnesses)?);
        hasher.update(encode(&self.witness_votes)?);
        hasher.update(encode(&self.delegations)?);
        hasher.update(encode(&self.expirations)?);
        hasher.update(encode(&self.routes)?);
        hasher.update(encode(&self.reward_funds)?);
        hasher.update(encode(&self.recovery_requests)?);
        hasher.update(encode(&self.change_requests)?);
        hasher.update(encode(&self.owner_history)?);

        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Ok(out)
    }

    pub fn verify(&self) -> Result<bool, LedgerError> {
        Ok(self.hash == self.compute_hash()?)
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn head_block_number(&self) -> u64 {
        self.globals.head_block_number
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, LedgerError> {
    bincode::serialize(value).map_err(|e| LedgerError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::{apply_genesis, GenesisAccount, GenesisConfig};
    use covenant_nullables::NullStore;
    use covenant_store::{AccountStore, RecoveryStore, WitnessStore};
    use covenant_types::{Authority, PublicKey, Timestamp};
    use covenant_voting::ProxyVoteGraph;

    fn store() -> NullStore {
        let mut store = NullStore::new();
        let genesis = GenesisConfig {
            time: Timestamp::new(50),
            accounts: vec![GenesisAccount {
                name: AccountName::new("alice").unwrap(),
                key: PublicKey([1; 32]),
                balance: 10,
                vesting: 10,
                recovery_account: None,
                witness_url: None,
            }],
            ..GenesisConfig::default()
        };
        apply_genesis(&mut store, &ProxyVoteGraph::new(30), &genesis).unwrap();
        store
    }

    #[test]
    fn identical_state_hashes_identically() {
        let a = StateSnapshot::capture(&store()).unwrap();
        let b = StateSnapshot::capture(&store()).unwrap();
        assert_eq!(a.hash, b.hash);
        assert!(a.verify().unwrap());
        assert_eq!(a.hash_hex().len(), 64);
    }

    #[test]
    fn state_change_changes_hash() {
        let mut s = store();
        let before = StateSnapshot::capture(&s).unwrap();
        let mut alice = s.get_account(&AccountName::new("alice").unwrap()).unwrap();
        alice.balance += 1;
        s.put_account(&alice).unwrap();
        assert_ne!(StateSnapshot::capture(&s).unwrap().hash, before.hash);
    }

    #[test]
    fn witness_vote_edge_changes_hash() {
        let mut s = store();
        let before = StateSnapshot::capture(&s).unwrap();
        let alice = AccountName::new("alice").unwrap();
        s.insert_witness_vote(&alice, &alice).unwrap();

        let after = StateSnapshot::capture(&s).unwrap();
        assert_eq!(after.witness_votes, vec![(alice.clone(), alice)]);
        assert_ne!(after.hash, before.hash);
    }

    #[test]
    fn recovery_request_changes_hash() {
        let mut s = store();
        let before = StateSnapshot::capture(&s).unwrap();
        let request = AccountRecoveryRequest {
            account_to_recover: AccountName::new("alice").unwrap(),
            new_owner_authority: Authority::single_key(PublicKey([2; 32])),
            expires: Timestamp::new(500),
        };
        s.put_recovery_request(&request).unwrap();
        let first = StateSnapshot::capture(&s).unwrap();
        assert_ne!(first.hash, before.hash);

        s.put_recovery_request(&AccountRecoveryRequest {
            expires: Timestamp::new(501),
            ..request
        })
        .unwrap();
        assert_ne!(StateSnapshot::capture(&s).unwrap().hash, first.hash);
    }

    #[test]
    fn tampering_fails_verification() {
        let mut snap = StateSnapshot::capture(&store()).unwrap();
        snap.globals.current_supply += 1;
        assert!(!snap.verify().unwrap());

        let restored = StateSnapshot::from_bytes(&snap.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, snap);
    }
}
