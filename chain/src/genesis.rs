//! Initial chain state.
//!
//! Genesis writes the two system accounts (`null`, which burns whatever it
//! receives, and `temp`, the shared creator for accounts without a recovery
//! partner), the configured accounts with their balances, vesting and
//! witness registrations, and the reward funds. The global supply is set to
//! exactly what was handed out.

use covenant_store::{Account, CurveKind, GlobalProperties, LedgerStore, RewardFund};
use covenant_types::asset::checked_add;
use covenant_types::{
    AccountName, Authority, LedgerError, PublicKey, StateError, Timestamp, ValidationError,
};
use covenant_vesting::create_vesting;
use covenant_voting::{update_witness, ProxyVoteGraph};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    pub time: Timestamp,
    /// Raw STEEM charged by `account_create` and `claim_account`.
    pub account_creation_fee: i64,
    pub accounts: Vec<GenesisAccount>,
    pub reward_funds: Vec<GenesisRewardFund>,
}

/// An account present from the first block. One key serves every tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub name: AccountName,
    pub key: PublicKey,
    #[serde(default)]
    pub balance: i64,
    /// Raw STEEM converted to vesting shares at genesis.
    #[serde(default)]
    pub vesting: i64,
    #[serde(default)]
    pub recovery_account: Option<AccountName>,
    /// Registers the account as a witness with this url.
    #[serde(default)]
    pub witness_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisRewardFund {
    pub name: String,
    #[serde(default)]
    pub reward_balance: i64,
    pub content_constant: u64,
    pub author_reward_curve: CurveKind,
    pub percent_curation_rewards: u16,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            time: Timestamp::EPOCH,
            account_creation_fee: 3_000,
            accounts: Vec::new(),
            reward_funds: vec![GenesisRewardFund {
                name: "post".to_string(),
                reward_balance: 0,
                content_constant: 2_000_000_000_000,
                author_reward_curve: CurveKind::ConvergentLinear,
                percent_curation_rewards: 2_500,
            }],
        }
    }
}

/// Write the genesis state into an empty store.
pub fn apply_genesis<S: LedgerStore + ?Sized>(
    store: &mut S,
    graph: &ProxyVoteGraph,
    genesis: &GenesisConfig,
) -> Result<(), LedgerError> {
    if store.account_count()? != 0 {
        return Err(LedgerError::InvalidBlock(
            "genesis applied to a non-empty store".to_string(),
        ));
    }
    let now = genesis.time;
    let mut globals = GlobalProperties {
        time: now,
        account_creation_fee: genesis.account_creation_fee,
        ..GlobalProperties::default()
    };
    store.put_globals(&globals)?;

    // Both system accounts use a key nobody holds.
    let unusable = PublicKey([0; 32]);
    let null = Account::new(
        AccountName::null(),
        Authority::new(1),
        Authority::new(1),
        Authority::new(1),
        unusable,
        now,
    );
    store.put_account(&null)?;
    let temp = Account::new(
        AccountName::temp(),
        Authority::new(1),
        Authority::new(0),
        Authority::new(0),
        unusable,
        now,
    );
    store.put_account(&temp)?;

    let mut events = Vec::new();
    let mut supply = 0i64;
    for spec in &genesis.accounts {
        if spec.balance < 0 || spec.vesting < 0 {
            return Err(ValidationError::NegativeAmount.into());
        }
        if store.account_exists(&spec.name)? {
            return Err(StateError::DuplicateAccountName(spec.name.clone()).into());
        }
        let auth = Authority::single_key(spec.key);
        let mut account = Account::new(
            spec.name.clone(),
            auth.clone(),
            auth.clone(),
            auth,
            spec.key,
            now,
        );
        account.balance = spec.balance;
        account.recovery_account = spec.recovery_account.clone();
        store.put_account(&account)?;
        supply = checked_add(supply, spec.balance)?;

        if spec.vesting > 0 {
            create_vesting(store, graph, &spec.name, spec.vesting, &mut events)?;
            supply = checked_add(supply, spec.vesting)?;
        }
        if let Some(url) = &spec.witness_url {
            update_witness(store, &spec.name, url, spec.key, now)?;
        }
    }

    for fund in &genesis.reward_funds {
        if fund.reward_balance < 0 {
            return Err(ValidationError::NegativeAmount.into());
        }
        store.put_reward_fund(&RewardFund {
            name: fund.name.clone(),
            reward_balance: fund.reward_balance,
            recent_claims: 0,
            last_update: now,
            content_constant: u128::from(fund.content_constant),
            author_reward_curve: fund.author_reward_curve,
            percent_curation_rewards: fund.percent_curation_rewards,
        })?;
        supply = checked_add(supply, fund.reward_balance)?;
    }

    globals = store.globals()?;
    globals.current_supply = supply;
    store.put_globals(&globals)?;

    tracing::info!(
        accounts = genesis.accounts.len(),
        supply,
        time = %now,
        "genesis applied"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_nullables::NullStore;
    use covenant_store::{AccountStore, GlobalStore, WitnessStore};

    fn name(s: &str) -> AccountName {
        AccountName::new(s).unwrap()
    }

    fn sample() -> GenesisConfig {
        GenesisConfig {
            time: Timestamp::new(1_000),
            accounts: vec![
                GenesisAccount {
                    name: name("alice"),
                    key: PublicKey([1; 32]),
                    balance: 5_000,
                    vesting: 1_000,
                    recovery_account: None,
                    witness_url: Some("https://alice.example".into()),
                },
                GenesisAccount {
                    name: name("bob"),
                    key: PublicKey([2; 32]),
                    balance: 0,
                    vesting: 0,
                    recovery_account: Some(name("alice")),
                    witness_url: None,
                },
            ],
            ..GenesisConfig::default()
        }
    }

    #[test]
    fn writes_accounts_supply_and_witnesses() {
        let mut store = NullStore::new();
        apply_genesis(&mut store, &ProxyVoteGraph::new(30), &sample()).unwrap();

        assert_eq!(store.account_count().unwrap(), 4);
        let alice = store.get_account(&name("alice")).unwrap();
        assert_eq!(alice.balance, 5_000);
        assert_eq!(alice.vesting_shares, 1_000_000);
        assert_eq!(
            store.get_account(&name("bob")).unwrap().recovery_account,
            Some(name("alice"))
        );
        assert!(store.find_witness(&name("alice")).unwrap().is_some());

        let globals = store.globals().unwrap();
        assert_eq!(globals.current_supply, 6_000);
        assert_eq!(globals.total_vesting_fund_steem, 1_000);
        assert_eq!(globals.time, Timestamp::new(1_000));
    }

    #[test]
    fn refuses_non_empty_store() {
        let mut store = NullStore::new();
        let graph = ProxyVoteGraph::new(30);
        apply_genesis(&mut store, &graph, &GenesisConfig::default()).unwrap();
        assert!(matches!(
            apply_genesis(&mut store, &graph, &GenesisConfig::default()),
            Err(LedgerError::InvalidBlock(_))
        ));
    }
}
